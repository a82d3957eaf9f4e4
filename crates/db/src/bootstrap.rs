//! First-run provisioning of the administrator account.

use rbac_core::audit::{entity_types, snapshot, AuditAction};
use rbac_core::email::normalize_email;
use rbac_core::permissions::ROLE_ADMIN;

use crate::models::audit::CreateAuditEntry;
use crate::models::user::{CreateUser, User, UserResponse};
use crate::repositories::{AuditRepo, RoleRepo, UserRepo};
use crate::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("role 'admin' is missing; run migrations first")]
    MissingAdminRole,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("failed to snapshot admin user: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Create the administrator account unless a user with `email` exists.
///
/// `password_hash` must already be hashed. The insert and its `CREATE`
/// audit entry commit together. Returns the new user, or `None` when the
/// account was already present.
pub async fn ensure_admin(
    pool: &DbPool,
    email: &str,
    password_hash: &str,
) -> Result<Option<User>, BootstrapError> {
    let email = normalize_email(email);
    let mut tx = pool.begin().await?;

    if UserRepo::find_by_email(&mut *tx, &email).await?.is_some() {
        tracing::debug!(%email, "Admin account already present");
        return Ok(None);
    }

    let role = RoleRepo::find_by_name(&mut *tx, ROLE_ADMIN)
        .await?
        .ok_or(BootstrapError::MissingAdminRole)?;

    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email,
            date_of_birth: None,
            phone_number: None,
            password_hash: password_hash.to_string(),
            role_id: role.id,
            created_by: None,
        },
    )
    .await?;

    let entry = CreateAuditEntry::new(entity_types::USER, user.id, AuditAction::Create)
        .new_data(snapshot(&UserResponse::from(&user))?);
    AuditRepo::insert(&mut *tx, &entry).await?;

    tx.commit().await?;
    tracing::info!(user_id = user.id, email = %user.email, "Admin account created");
    Ok(Some(user))
}
