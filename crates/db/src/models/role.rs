//! Role entity model and DTOs.

use rbac_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::permission::PermissionSummary;

/// A role row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A role together with the permissions linked to it through
/// `role_permissions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleWithPermissions {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<PermissionSummary>,
}

impl RoleWithPermissions {
    pub fn new(role: Role, permissions: Vec<PermissionSummary>) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            permissions,
        }
    }

    /// Action names of the linked permissions, sorted.
    pub fn actions(&self) -> Vec<String> {
        let mut actions: Vec<String> =
            self.permissions.iter().map(|p| p.action.clone()).collect();
        actions.sort();
        actions
    }
}

/// Audit snapshot of a role: its scalar fields plus the linked action list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSnapshot {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

impl From<&RoleWithPermissions> for RoleSnapshot {
    fn from(role: &RoleWithPermissions) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            permissions: role.actions(),
        }
    }
}

/// DTO for creating a new role.
#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating an existing role. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_by: Option<DbId>,
}

/// A row from the `role_permissions` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    pub role_id: DbId,
    pub permission_id: DbId,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}
