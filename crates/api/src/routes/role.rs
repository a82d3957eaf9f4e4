//! Route definitions for roles.

use axum::routing::get;
use axum::Router;

use crate::handlers::role;
use crate::state::AppState;

/// Role routes.
///
/// ```text
/// GET    /roles        -> list_roles     (GetRole)
/// POST   /roles        -> create_role    (CreateRole)
/// GET    /roles/{id}   -> get_role       (GetRole)
/// PUT    /roles/{id}   -> update_role    (UpdateRole)
/// DELETE /roles/{id}   -> delete_role    (DeleteRole)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/roles", get(role::list_roles).post(role::create_role))
        .route(
            "/roles/{id}",
            get(role::get_role)
                .put(role::update_role)
                .delete(role::delete_role),
        )
}
