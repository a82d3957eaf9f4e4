//! Repository for the `role_permissions` join table.

use rbac_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::permission::PermissionSummary;

/// Provides link management between roles and permissions.
pub struct RolePermissionRepo;

impl RolePermissionRepo {
    /// Permissions linked to a role, ordered by action.
    pub async fn list_summaries_for_role<'e>(
        executor: impl PgExecutor<'e>,
        role_id: DbId,
    ) -> Result<Vec<PermissionSummary>, sqlx::Error> {
        sqlx::query_as::<_, PermissionSummary>(
            "SELECT p.action, p.group_name
             FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = $1
             ORDER BY p.action",
        )
        .bind(role_id)
        .fetch_all(executor)
        .await
    }

    /// Action names linked to a role, sorted.
    pub async fn list_actions_for_role<'e>(
        executor: impl PgExecutor<'e>,
        role_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT p.action
             FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = $1
             ORDER BY p.action",
        )
        .bind(role_id)
        .fetch_all(executor)
        .await
    }

    /// Every join row as `(role_id, permission)`, ordered by role then action.
    pub async fn list_all_summaries<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<(DbId, PermissionSummary)>, sqlx::Error> {
        let rows: Vec<(DbId, String, String)> = sqlx::query_as(
            "SELECT rp.role_id, p.action, p.group_name
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             ORDER BY rp.role_id, p.action",
        )
        .fetch_all(executor)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(role_id, action, group_name)| (role_id, PermissionSummary { action, group_name }))
            .collect())
    }

    /// Replace the full permission set of a role.
    ///
    /// Deletes every existing link, then bulk-inserts `permission_ids`. Must
    /// run inside the caller's transaction so the role is never observed
    /// with a partial set.
    pub async fn replace_for_role(
        conn: &mut PgConnection,
        role_id: DbId,
        permission_ids: &[DbId],
        created_by: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *conn)
            .await?;

        if permission_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id, created_by)
             SELECT $1, UNNEST($2::BIGINT[]), $3",
        )
        .bind(role_id)
        .bind(permission_ids)
        .bind(created_by)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
