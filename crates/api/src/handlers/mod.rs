//! HTTP handlers, one module per resource.
//!
//! Every mutating handler opens a transaction, performs the entity write,
//! appends exactly one audit entry, and commits. Any early return drops the
//! transaction, which rolls everything back.

pub mod auth;
pub mod health;
pub mod permission;
pub mod pubsub;
pub mod role;
pub mod user;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Serialize `value` into a redacted audit snapshot.
pub(crate) fn audit_snapshot<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    rbac_core::audit::snapshot(value)
        .map_err(|e| AppError::InternalError(format!("Failed to build audit snapshot: {e}")))
}
