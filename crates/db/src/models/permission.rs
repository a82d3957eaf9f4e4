//! Permission entity model and DTOs.
//!
//! A permission is keyed externally by its unique `action` string
//! (e.g. `"CreateRole"`); the numeric `id` only appears in join rows.

use rbac_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A permission row from the `permissions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Permission {
    pub id: DbId,
    pub action: String,
    pub group_name: String,
    pub description: String,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public permission representation returned by the API and used as the
/// audit snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionInfo {
    pub action: String,
    pub group_name: String,
    pub description: String,
}

impl From<&Permission> for PermissionInfo {
    fn from(p: &Permission) -> Self {
        Self {
            action: p.action.clone(),
            group_name: p.group_name.clone(),
            description: p.description.clone(),
        }
    }
}

/// Permission as nested inside a role.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSummary {
    pub action: String,
    pub group_name: String,
}

/// DTO for creating a new permission.
#[derive(Debug, Clone)]
pub struct CreatePermission {
    pub action: String,
    pub group_name: String,
    pub description: String,
    pub created_by: Option<DbId>,
}

/// DTO for updating a permission. The `action` key itself is immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdatePermission {
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub updated_by: Option<DbId>,
}
