pub mod auth;
pub mod health;
pub mod permission;
pub mod pubsub;
pub mod role;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree, mounted at the root.
///
/// ```text
/// /auth/login                  login (public)
///
/// /roles                       list, create
/// /roles/{id}                  get, update, delete
///
/// /permissions                 list, create
/// /permissions/{action}        update, delete
///
/// /users                       list, create
/// /users/{id}                  get, update, delete
///
/// /pubsub/publish              publish test message (public)
/// ```
///
/// Every route except login and publish requires a Bearer token carrying
/// the route's permission action.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/pubsub", pubsub::router())
        .merge(role::router())
        .merge(permission::router())
        .merge(user::router())
}
