//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use rbac_core::audit::{entity_types, AuditAction};
use rbac_core::email::normalize_email;
use rbac_core::error::CoreError;
use rbac_core::types::DbId;
use rbac_db::models::audit::CreateAuditEntry;
use rbac_db::models::user::{AccountStatus, CreateUser, UpdateUser, UserResponse};
use rbac_db::repositories::{AuditRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use validator::Validate;

use super::audit_snapshot;
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ValidatedJson};
use crate::middleware::rbac::{perm, RequirePermission};
use crate::response::{MessageResponse, MutationResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 20, message = "First name must be 1-20 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: NaiveDate,
    #[validate(length(
        min = 8,
        max = 20,
        message = "Password must be between 8 and 20 characters long"
    ))]
    pub password: String,
    pub role_id: DbId,
}

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged;
/// the password cannot be changed here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 20, message = "First name must be 1-20 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub qualification: Option<String>,
    pub profile_pic: Option<String>,
    pub role_id: Option<DbId>,
    pub account_status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserResponse>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: RequirePermission<perm::GetUser>,
) -> AppResult<Json<UserList>> {
    let users = UserRepo::list(&state.pool)
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(UserList { users }))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: RequirePermission<perm::GetUser>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<UserPayload>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(UserPayload {
        user: UserResponse::from(&user),
    }))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    RequirePermission { user: caller, .. }: RequirePermission<perm::CreateUser>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<MutationResponse<UserPayload>>)> {
    let email = normalize_email(&input.email);
    let mut tx = state.pool.begin().await?;

    ensure_email_available(&mut tx, &email, None).await?;
    ensure_role_exists(&mut tx, input.role_id).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            date_of_birth: Some(input.date_of_birth),
            phone_number: Some(input.phone_number),
            password_hash,
            role_id: input.role_id,
            created_by: Some(caller.user_id),
        },
    )
    .await?;
    let response = UserResponse::from(&user);

    let entry = CreateAuditEntry::new(entity_types::USER, user.id, AuditAction::Create)
        .new_data(audit_snapshot(&response)?)
        .performed_by(Some(caller.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, created_by = caller.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(
            "User created successfully",
            UserPayload { user: response },
        )),
    ))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequirePermission { user: caller, .. }: RequirePermission<perm::UpdateUser>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<MutationResponse<UserPayload>>> {
    let mut tx = state.pool.begin().await?;

    let previous = UserRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    let email = input.email.as_deref().map(normalize_email);
    if let Some(ref email) = email {
        ensure_email_available(&mut tx, email, Some(id)).await?;
    }
    if let Some(role_id) = input.role_id {
        ensure_role_exists(&mut tx, role_id).await?;
    }

    let updated = UserRepo::update(
        &mut *tx,
        id,
        &UpdateUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            date_of_birth: input.date_of_birth,
            phone_number: input.phone_number,
            address: input.address,
            qualification: input.qualification,
            profile_pic: input.profile_pic,
            role_id: input.role_id,
            account_status: input.account_status,
            updated_by: Some(caller.user_id),
        },
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "User", id })?;
    let response = UserResponse::from(&updated);

    let entry = CreateAuditEntry::new(entity_types::USER, id, AuditAction::Update)
        .previous(audit_snapshot(&UserResponse::from(&previous))?)
        .new_data(audit_snapshot(&response)?)
        .performed_by(Some(caller.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(user_id = id, updated_by = caller.user_id, "User updated");

    Ok(Json(MutationResponse::new(
        "User updated successfully",
        UserPayload { user: response },
    )))
}

/// DELETE /users/{id}
///
/// Hard delete; the audit entry keeps the last snapshot.
pub async fn delete_user(
    State(state): State<AppState>,
    RequirePermission { user: caller, .. }: RequirePermission<perm::DeleteUser>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let mut tx = state.pool.begin().await?;

    let previous = UserRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    UserRepo::delete(&mut *tx, id).await?;

    let entry = CreateAuditEntry::new(entity_types::USER, id, AuditAction::Delete)
        .previous(audit_snapshot(&UserResponse::from(&previous))?)
        .performed_by(Some(caller.user_id));
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;

    tracing::info!(user_id = id, deleted_by = caller.user_id, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_email_available(
    conn: &mut PgConnection,
    email: &str,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    if UserRepo::email_in_use(&mut *conn, email, exclude_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Email already in use".into(),
        )));
    }
    Ok(())
}

async fn ensure_role_exists(conn: &mut PgConnection, role_id: DbId) -> AppResult<()> {
    if RoleRepo::find_by_id(&mut *conn, role_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role {role_id} does not exist"
        ))));
    }
    Ok(())
}
