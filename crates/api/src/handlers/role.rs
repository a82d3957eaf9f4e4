//! Handlers for the `/roles` resource.
//!
//! A role's permission set is always written as a whole: the requested
//! actions are resolved first, and only when every one exists is the join
//! table replaced.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rbac_core::audit::{entity_types, AuditAction};
use rbac_core::error::CoreError;
use rbac_core::permissions::{dedup_actions, missing_actions};
use rbac_core::types::DbId;
use rbac_db::models::audit::CreateAuditEntry;
use rbac_db::models::role::{CreateRole, RoleSnapshot, RoleWithPermissions, UpdateRole};
use rbac_db::repositories::{AuditRepo, PermissionRepo, RolePermissionRepo, RoleRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use validator::{Validate, ValidationError};

use super::audit_snapshot;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ValidatedJson};
use crate::middleware::rbac::{perm, RequirePermission};
use crate::response::{MessageResponse, MutationResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /roles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(
        custom(function = "name_present"),
        length(max = 255, message = "Role name cannot exceed 255 characters")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// Initial permission actions.
    pub permissions: Option<Vec<String>>,
}

/// Request body for `PUT /roles/{id}`.
///
/// `permissions`, when present, replaces the whole set; an empty list
/// clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(
        custom(function = "name_present"),
        length(max = 255, message = "Role name cannot exceed 255 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// `{ "role": ... }` payload of create and update responses.
#[derive(Debug, Serialize)]
pub struct RolePayload {
    pub role: RoleWithPermissions,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /roles
pub async fn list_roles(
    State(state): State<AppState>,
    _auth: RequirePermission<perm::GetRole>,
) -> AppResult<Json<Vec<RoleWithPermissions>>> {
    let roles = RoleRepo::list_with_permissions(&state.pool).await?;
    Ok(Json(roles))
}

/// GET /roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    _auth: RequirePermission<perm::GetRole>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<RoleWithPermissions>> {
    let mut conn = state.pool.acquire().await?;
    let role = RoleRepo::find_with_permissions(&mut conn, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Role", id })?;
    Ok(Json(role))
}

/// POST /roles
pub async fn create_role(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::CreateRole>,
    ValidatedJson(input): ValidatedJson<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<MutationResponse<RolePayload>>)> {
    let mut tx = state.pool.begin().await?;

    let permission_ids = match &input.permissions {
        Some(actions) => resolve_permission_ids(&mut tx, actions).await?,
        None => Vec::new(),
    };

    let role = RoleRepo::create(
        &mut *tx,
        &CreateRole {
            name: input.name,
            description: input.description,
            created_by: Some(user.user_id),
        },
    )
    .await?;

    RolePermissionRepo::replace_for_role(&mut tx, role.id, &permission_ids, Some(user.user_id))
        .await?;

    let role = load_role(&mut tx, role.id).await?;
    let entry = CreateAuditEntry::new(entity_types::ROLE, role.id, AuditAction::Create)
        .new_data(audit_snapshot(&RoleSnapshot::from(&role))?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(
        role_id = role.id,
        user_id = user.user_id,
        permissions = role.permissions.len(),
        "Role created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(
            "Role created successfully",
            RolePayload { role },
        )),
    ))
}

/// PUT /roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::UpdateRole>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<MutationResponse<RolePayload>>> {
    let mut tx = state.pool.begin().await?;

    let previous = RoleRepo::find_with_permissions(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Role", id })?;

    let permission_ids = match &input.permissions {
        Some(actions) => Some(resolve_permission_ids(&mut tx, actions).await?),
        None => None,
    };

    RoleRepo::update(
        &mut *tx,
        id,
        &UpdateRole {
            name: input.name,
            description: input.description,
            updated_by: Some(user.user_id),
        },
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "Role", id })?;

    if let Some(ref ids) = permission_ids {
        RolePermissionRepo::replace_for_role(&mut tx, id, ids, Some(user.user_id)).await?;
    }

    let role = load_role(&mut tx, id).await?;
    let entry = CreateAuditEntry::new(entity_types::ROLE, id, AuditAction::Update)
        .previous(audit_snapshot(&RoleSnapshot::from(&previous))?)
        .new_data(audit_snapshot(&RoleSnapshot::from(&role))?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(
        role_id = id,
        user_id = user.user_id,
        permissions_replaced = permission_ids.is_some(),
        "Role updated"
    );

    Ok(Json(MutationResponse::new(
        "Role updated successfully",
        RolePayload { role },
    )))
}

/// DELETE /roles/{id}
///
/// Refused with 409 while any user still holds the role.
pub async fn delete_role(
    State(state): State<AppState>,
    RequirePermission { user, .. }: RequirePermission<perm::DeleteRole>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let mut tx = state.pool.begin().await?;

    let previous = RoleRepo::find_with_permissions(&mut tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Role", id })?;

    let holders = RoleRepo::count_users(&mut *tx, id).await?;
    if holders > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role is assigned to {holders} user(s)"
        ))));
    }

    RoleRepo::delete(&mut *tx, id).await?;

    let entry = CreateAuditEntry::new(entity_types::ROLE, id, AuditAction::Delete)
        .previous(audit_snapshot(&RoleSnapshot::from(&previous))?)
        .performed_by(Some(user.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(role_id = id, user_id = user.user_id, "Role deleted");

    Ok(Json(MessageResponse {
        message: "Role deleted successfully",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn name_present(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Role name is required".into()));
    }
    Ok(())
}

/// Resolve action strings to permission ids, all or nothing.
///
/// Fails with [`CoreError::MissingPermissions`] listing every unknown action
/// in request order.
async fn resolve_permission_ids(
    conn: &mut PgConnection,
    requested: &[String],
) -> AppResult<Vec<DbId>> {
    let actions = dedup_actions(requested);
    let found = PermissionRepo::find_by_actions(&mut *conn, &actions).await?;

    let missing = missing_actions(&actions, found.iter().map(|p| p.action.as_str()));
    if !missing.is_empty() {
        tracing::debug!(?missing, "Unresolved permission actions");
        return Err(AppError::Core(CoreError::MissingPermissions(missing)));
    }

    Ok(found.into_iter().map(|p| p.id).collect())
}

/// Re-read a role written earlier in the same transaction.
async fn load_role(conn: &mut PgConnection, id: DbId) -> AppResult<RoleWithPermissions> {
    RoleRepo::find_with_permissions(conn, id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role {id} vanished mid-transaction")))
}
