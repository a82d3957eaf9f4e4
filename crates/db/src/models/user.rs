//! User entity model and DTOs.

use chrono::NaiveDate;
use rbac_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account status, stored as the `account_status` Postgres enum.
///
/// Set directly by the update endpoint; no transitions are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub address: Option<String>,
    pub qualification: Option<String>,
    pub profile_pic: Option<String>,
    pub account_status: AccountStatus,
    pub last_login_at: Option<Timestamp>,
    pub role_id: DbId,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses and audit snapshots
/// (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub qualification: Option<String>,
    pub profile_pic: Option<String>,
    pub account_status: AccountStatus,
    pub last_login_at: Option<Timestamp>,
    pub role_id: DbId,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            qualification: user.qualification.clone(),
            profile_pic: user.profile_pic.clone(),
            account_status: user.account_status,
            last_login_at: user.last_login_at,
            role_id: user.role_id,
            created_by: user.created_by,
            updated_by: user.updated_by,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role_id: DbId,
    pub created_by: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
///
/// Has no password field; profile updates never touch
/// the stored hash.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub qualification: Option<String>,
    pub profile_pic: Option<String>,
    pub role_id: Option<DbId>,
    pub account_status: Option<AccountStatus>,
    pub updated_by: Option<DbId>,
}
