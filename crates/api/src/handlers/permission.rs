//! Handlers for the `/permissions` resource.
//!
//! Permissions are addressed by their unique action string in the path.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rbac_core::audit::{entity_types, AuditAction};
use rbac_core::error::CoreError;
use rbac_db::models::audit::CreateAuditEntry;
use rbac_db::models::permission::{CreatePermission, PermissionInfo, UpdatePermission};
use rbac_db::repositories::{AuditRepo, PermissionRepo};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::audit_snapshot;
use crate::error::AppResult;
use crate::extract::{ApiPath, ValidatedJson};
use crate::middleware::rbac::{perm, RequirePermission};
use crate::response::{MessageResponse, MutationResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /permissions`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    #[validate(
        length(min = 1, max = 255, message = "Action must be 1-255 characters"),
        custom(function = "not_blank")
    )]
    pub action: String,
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub group_name: String,
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,
}

/// Request body for `PUT /permissions/{action}`. The action is immutable.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionRequest {
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub group_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionList {
    pub permissions: Vec<PermissionInfo>,
}

#[derive(Debug, Serialize)]
pub struct PermissionPayload {
    pub permission: PermissionInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    _auth: RequirePermission<perm::GetPermission>,
) -> AppResult<Json<PermissionList>> {
    let permissions = PermissionRepo::list(&state.pool)
        .await?
        .iter()
        .map(PermissionInfo::from)
        .collect();
    Ok(Json(PermissionList { permissions }))
}

/// POST /permissions
pub async fn create_permission(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::CreatePermission>,
    ValidatedJson(input): ValidatedJson<CreatePermissionRequest>,
) -> AppResult<(StatusCode, Json<MutationResponse<PermissionPayload>>)> {
    let mut tx = state.pool.begin().await?;

    let permission = PermissionRepo::create(
        &mut *tx,
        &CreatePermission {
            action: input.action.trim().to_string(),
            group_name: input.group_name,
            description: input.description,
            created_by: Some(user.user_id),
        },
    )
    .await?;
    let info = PermissionInfo::from(&permission);

    let entry = CreateAuditEntry::new(entity_types::PERMISSION, permission.id, AuditAction::Create)
        .new_data(audit_snapshot(&info)?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(action = %info.action, user_id = user.user_id, "Permission created");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(
            "Permission created successfully",
            PermissionPayload { permission: info },
        )),
    ))
}

/// PUT /permissions/{action}
pub async fn update_permission(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::UpdatePermission>,
    ApiPath(action): ApiPath<String>,
    ValidatedJson(input): ValidatedJson<UpdatePermissionRequest>,
) -> AppResult<Json<MutationResponse<PermissionPayload>>> {
    let mut tx = state.pool.begin().await?;

    let previous = PermissionRepo::find_by_action(&mut *tx, &action)
        .await?
        .ok_or_else(|| not_found(&action))?;

    let updated = PermissionRepo::update(
        &mut *tx,
        &action,
        &UpdatePermission {
            group_name: input.group_name,
            description: input.description,
            updated_by: Some(user.user_id),
        },
    )
    .await?
    .ok_or_else(|| not_found(&action))?;
    let info = PermissionInfo::from(&updated);

    let entry = CreateAuditEntry::new(entity_types::PERMISSION, updated.id, AuditAction::Update)
        .previous(audit_snapshot(&PermissionInfo::from(&previous))?)
        .new_data(audit_snapshot(&info)?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(%action, user_id = user.user_id, "Permission updated");

    Ok(Json(MutationResponse::new(
        "Permission updated successfully",
        PermissionPayload { permission: info },
    )))
}

/// DELETE /permissions/{action}
///
/// Links to roles cascade away with the permission.
pub async fn delete_permission(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::DeletePermission>,
    ApiPath(action): ApiPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let mut tx = state.pool.begin().await?;

    let previous = PermissionRepo::find_by_action(&mut *tx, &action)
        .await?
        .ok_or_else(|| not_found(&action))?;

    PermissionRepo::delete(&mut *tx, &action).await?;

    let entry = CreateAuditEntry::new(entity_types::PERMISSION, previous.id, AuditAction::Delete)
        .previous(audit_snapshot(&PermissionInfo::from(&previous))?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(%action, user_id = user.user_id, "Permission deleted");

    Ok(Json(MessageResponse {
        message: "Permission deleted successfully",
    }))
}

/// Actions are stored trimmed, so whitespace alone would become `""`.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Action cannot be blank".into()));
    }
    Ok(())
}

fn not_found(action: &str) -> CoreError {
    CoreError::NotFoundByKey {
        entity: "Permission",
        key: action.to_string(),
    }
}
