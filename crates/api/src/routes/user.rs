//! Route definitions for users.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// User routes.
///
/// ```text
/// GET    /users        -> list_users   (GetUser)
/// POST   /users        -> create_user  (CreateUser)
/// GET    /users/{id}   -> get_user     (GetUser)
/// PUT    /users/{id}   -> update_user  (UpdateUser)
/// DELETE /users/{id}   -> delete_user  (DeleteUser)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
}
