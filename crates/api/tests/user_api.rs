//! HTTP-level integration tests for the `/users` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth};
use rbac_api::auth::password::verify_password;
use rbac_core::audit::entity_types;
use rbac_db::repositories::{AuditRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

fn new_user(email: &str, role_id: i64) -> serde_json::Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "phoneNumber": "555-0199",
        "dateOfBirth": "1990-12-10",
        "password": "analytical1",
        "roleId": role_id
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::admin_token(&app, &pool).await;
    let role_id = common::admin_role_id(&pool).await;

    let response = post_json_auth(
        app.clone(),
        "/users",
        new_user("Ada@Example.com", role_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "User created successfully");
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["accountStatus"], "active");
    assert_eq!(json["user"]["dateOfBirth"], "1990-12-10");
    assert!(json["user"].get("passwordHash").is_none());

    let id = json["user"]["id"].as_i64().unwrap();
    let stored = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.created_by, Some(admin.id));
    assert!(verify_password("analytical1", &stored.password_hash).unwrap());

    let audits = AuditRepo::list_for_entity(&pool, entity_types::USER, id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "CREATE");
    let snapshot = audits[0].new_data.as_ref().unwrap();
    assert_eq!(snapshot["email"], "ada@example.com");
    assert!(snapshot.get("passwordHash").is_none());

    // The new account can log in.
    let response = post_json(
        app,
        "/auth/login",
        json!({ "email": "ada@example.com", "password": "analytical1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;
    let role_id = common::admin_role_id(&pool).await;

    let response = post_json_auth(
        app,
        "/users",
        new_user("ADMIN@example.com", role_id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Email already in use");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_unknown_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = post_json_auth(app, "/users", new_user("x@example.com", 999_999), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Role 999999 does not exist"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_field_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;
    let role_id = common::admin_role_id(&pool).await;

    let mut body = new_user("short@example.com", role_id);
    body["password"] = json!("short");
    body["firstName"] = json!("");

    let response = post_json_auth(app, "/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"]["password"],
        json!(["Password must be between 8 and 20 characters long"])
    );
    assert!(json["error"]["firstName"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_and_get_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::admin_token(&app, &pool).await;

    let response = get_auth(app.clone(), "/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["users"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), &format!("/users/{}", admin.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], admin.id);
    assert!(json["user"].get("passwordHash").is_none());

    let response = get_auth(app, "/users/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "User not found");
}

/// Partial update keeps absent fields and never touches the password.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::admin_token(&app, &pool).await;
    let before = UserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();

    let response = put_json_auth(
        app,
        &format!("/users/{}", admin.id),
        json!({ "lastName": "Admin", "accountStatus": "suspended", "password": "ignored-pass" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "User updated successfully");
    assert_eq!(json["user"]["lastName"], "Admin");
    assert_eq!(json["user"]["firstName"], "Test");
    assert_eq!(json["user"]["accountStatus"], "suspended");

    let after = UserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(after.password_hash, before.password_hash);
    assert_eq!(after.updated_by, Some(admin.id));

    let audits = AuditRepo::list_for_entity(&pool, entity_types::USER, admin.id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].previous_data.as_ref().unwrap()["lastName"], "User");
    assert_eq!(audits[0].new_data.as_ref().unwrap()["lastName"], "Admin");
}

/// A user may keep their own email; taking someone else's is refused.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_user_email_uniqueness(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::admin_token(&app, &pool).await;
    let role_id = common::admin_role_id(&pool).await;
    common::create_user(&pool, "other@example.com", "other-pass-1", role_id).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/users/{}", admin.id),
        json!({ "email": common::ADMIN_EMAIL }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app,
        &format!("/users/{}", admin.id),
        json!({ "email": "other@example.com" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Email already in use");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;
    let role_id = common::admin_role_id(&pool).await;
    let victim = common::create_user(&pool, "gone@example.com", "gone-pass-1", role_id).await;

    let response = delete_auth(app.clone(), &format!("/users/{}", victim.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "User deleted successfully");

    assert!(UserRepo::find_by_id(&pool, victim.id).await.unwrap().is_none());

    let audits = AuditRepo::list_for_entity(&pool, entity_types::USER, victim.id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "DELETE");
    assert_eq!(
        audits[0].previous_data.as_ref().unwrap()["email"],
        "gone@example.com"
    );

    let audits_before = AuditRepo::count(&pool).await.unwrap();
    let response = delete_auth(app, &format!("/users/{}", victim.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "User not found");
    assert_eq!(AuditRepo::count(&pool).await.unwrap(), audits_before);
}
