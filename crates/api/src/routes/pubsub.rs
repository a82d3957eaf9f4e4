//! Route definitions for the `/pubsub` utility.

use axum::routing::post;
use axum::Router;

use crate::handlers::pubsub;
use crate::state::AppState;

/// Routes mounted at `/pubsub`.
///
/// ```text
/// POST /publish  -> publish
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/publish", post(pubsub::publish))
}
