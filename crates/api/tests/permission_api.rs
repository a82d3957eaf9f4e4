//! HTTP-level integration tests for the `/permissions` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use rbac_core::audit::entity_types;
use rbac_db::repositories::{AuditRepo, PermissionRepo, RolePermissionRepo};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_permissions_returns_seeded_actions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = get_auth(app, "/permissions", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let permissions = json["permissions"].as_array().unwrap();
    assert_eq!(permissions.len(), 12);
    assert!(permissions
        .iter()
        .any(|p| p["action"] == "GetUser" && p["groupName"] == "User Management"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_permission(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, token) = common::admin_token(&app, &pool).await;

    let response = post_json_auth(
        app,
        "/permissions",
        json!({
            "action": "ExportReport",
            "groupName": "Reports",
            "description": "Export a report"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Permission created successfully");
    assert_eq!(json["permission"]["action"], "ExportReport");
    assert_eq!(json["permission"]["groupName"], "Reports");

    let stored = PermissionRepo::find_by_action(&pool, "ExportReport")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.created_by, Some(admin.id));

    let audits = AuditRepo::list_for_entity(&pool, entity_types::PERMISSION, stored.id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "CREATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_duplicate_action_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = post_json_auth(
        app,
        "/permissions",
        json!({ "action": "GetRole", "groupName": "X", "description": "dup" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_permission_missing_fields_fails_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = post_json_auth(
        app,
        "/permissions",
        json!({ "action": "", "groupName": "Reports", "description": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]["action"].is_array());
}

/// Whitespace-only actions are refused instead of being stored as `""`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_permission_blank_action_fails_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;
    let audits_before = AuditRepo::count(&pool).await.unwrap();

    let response = post_json_auth(
        app,
        "/permissions",
        json!({ "action": "   ", "groupName": "Reports", "description": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["action"], json!(["Action cannot be blank"]));

    assert!(PermissionRepo::find_by_action(&pool, "")
        .await
        .unwrap()
        .is_none());
    assert_eq!(AuditRepo::count(&pool).await.unwrap(), audits_before);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_permission_by_action(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = put_json_auth(
        app,
        "/permissions/GetRole",
        json!({ "description": "Read a role" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["permission"]["action"], "GetRole");
    assert_eq!(json["permission"]["description"], "Read a role");
    assert_eq!(json["permission"]["groupName"], "Role & Permission");

    let stored = PermissionRepo::find_by_action(&pool, "GetRole")
        .await
        .unwrap()
        .unwrap();
    let audits = AuditRepo::list_for_entity(&pool, entity_types::PERMISSION, stored.id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(
        audits[0].previous_data.as_ref().unwrap()["description"],
        "Get details of a role"
    );
    assert_eq!(audits[0].new_data.as_ref().unwrap()["description"], "Read a role");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_unknown_permission_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;

    let response = put_json_auth(
        app,
        "/permissions/Nope",
        json!({ "description": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Permission not found");
}

/// Deleting a permission unlinks it from every role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_permission_unlinks_roles(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = common::admin_token(&app, &pool).await;
    let admin_role = common::admin_role_id(&pool).await;
    let permission = PermissionRepo::find_by_action(&pool, "DeleteUser")
        .await
        .unwrap()
        .unwrap();

    let response = delete_auth(app.clone(), "/permissions/DeleteUser", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Permission deleted successfully"
    );

    let actions = RolePermissionRepo::list_actions_for_role(&pool, admin_role)
        .await
        .unwrap();
    assert_eq!(actions.len(), 11);
    assert!(!actions.iter().any(|a| a == "DeleteUser"));

    let audits = AuditRepo::list_for_entity(&pool, entity_types::PERMISSION, permission.id)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "DELETE");
    assert_eq!(audits[0].previous_data.as_ref().unwrap()["action"], "DeleteUser");

    // A second delete finds nothing and leaves the ledger alone.
    let audits_before = AuditRepo::count(&pool).await.unwrap();
    let response = delete_auth(app, "/permissions/DeleteUser", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(AuditRepo::count(&pool).await.unwrap(), audits_before);
}
