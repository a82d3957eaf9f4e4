#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rbac_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use rbac_api::auth::password::hash_password;
use rbac_api::config::{PubSubConfig, ServerConfig};
use rbac_api::router::build_app_router;
use rbac_api::state::AppState;
use rbac_core::permissions::ROLE_ADMIN;
use rbac_core::types::DbId;
use rbac_db::models::user::{CreateUser, User};
use rbac_db::repositories::{RoleRepo, UserRepo};
use rbac_events::PubSub;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";

/// Build a test `ServerConfig` with safe defaults and Pub/Sub off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        run_db_migration: false,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_secs: 3600,
        },
        admin: None,
        pubsub: PubSubConfig::default(),
    }
}

/// Build the production router around `pool` with the default test config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(PubSub::default()))
}

/// Build the production router with an explicit config and hub.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig, pubsub: Arc<PubSub>) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pubsub,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn admin_role_id(pool: &PgPool) -> DbId {
    RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await
        .unwrap()
        .expect("seeded admin role")
        .id
}

/// Insert a user holding `role_id` with the given email and password.
pub async fn create_user(pool: &PgPool, email: &str, password: &str, role_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15),
            phone_number: Some("555-0100".to_string()),
            password_hash: hash_password(password).unwrap(),
            role_id,
            created_by: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Insert the admin user and log in through the API, returning the token.
pub async fn admin_token(app: &Router, pool: &PgPool) -> (User, String) {
    let role_id = admin_role_id(pool).await;
    let admin = create_user(pool, ADMIN_EMAIL, ADMIN_PASSWORD, role_id).await;

    let response = post_json(
        app.clone(),
        "/auth/login",
        serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    let token = json["accessToken"].as_str().unwrap().to_string();
    (admin, token)
}

/// Mint a token carrying exactly `permissions`, without touching the database.
pub fn token_with_permissions(user_id: DbId, permissions: &[&str]) -> String {
    let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    let (token, _) = generate_access_token(
        &TokenSubject {
            user_id,
            email: "limited@example.com",
            role_id: 0,
            role: "limited",
            permissions: &permissions,
        },
        &test_config().jwt,
    )
    .unwrap();
    token
}
