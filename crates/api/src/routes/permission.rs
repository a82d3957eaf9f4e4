//! Route definitions for permissions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::permission;
use crate::state::AppState;

/// Permission routes, keyed by action string.
///
/// ```text
/// GET    /permissions            -> list_permissions   (GetPermission)
/// POST   /permissions            -> create_permission  (CreatePermission)
/// PUT    /permissions/{action}   -> update_permission  (UpdatePermission)
/// DELETE /permissions/{action}   -> delete_permission  (DeletePermission)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/permissions",
            get(permission::list_permissions).post(permission::create_permission),
        )
        .route(
            "/permissions/{action}",
            put(permission::update_permission).delete(permission::delete_permission),
        )
}
