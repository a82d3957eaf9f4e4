//! Handler for `POST /auth/login`.

use axum::extract::State;
use axum::Json;
use rbac_core::email::normalize_email;
use rbac_core::error::CoreError;
use rbac_core::types::DbId;
use rbac_db::repositories::{RolePermissionRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

const USER_NOT_FOUND: &str = "User not found";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const LOGIN_ERROR: &str = "Login error";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Token expiry as a UTC Unix timestamp.
    pub token_expiry: i64,
    pub user: LoginUser,
}

/// The caller's identity and grants, as embedded in the token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: DbId,
    pub role: String,
    pub permissions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/login
///
/// Authenticate with email + password and return a signed access token
/// carrying the role and its permission actions.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&input.email);

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(USER_NOT_FOUND.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: invalid credentials");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let Some(role) = RoleRepo::find_by_id(&state.pool, user.role_id).await? else {
        tracing::error!(
            user_id = user.id,
            role_id = user.role_id,
            "User role or permissions not found"
        );
        return Err(AppError::Core(CoreError::Internal(LOGIN_ERROR.into())));
    };
    let permissions = RolePermissionRepo::list_actions_for_role(&state.pool, role.id).await?;

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let (access_token, claims) = generate_access_token(
        &TokenSubject {
            user_id: user.id,
            email: &user.email,
            role_id: role.id,
            role: &role.name,
            permissions: &permissions,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role.name, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_expiry: claims.exp,
        user: LoginUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role_id: role.id,
            role: role.name,
            permissions,
        },
    }))
}
