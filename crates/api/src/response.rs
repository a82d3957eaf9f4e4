//! Shared response envelope types for API handlers.

use serde::Serialize;

/// `{ "message": ... }` body returned by deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `{ "message": ..., "<key>": T }` body returned by creates and updates.
///
/// `T` is flattened, so it must serialize to an object, e.g. a struct with a
/// single `role` or `user` field.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub message: &'static str,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> MutationResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self { message, data }
    }
}
