//! Repository for the `permissions` table.
//!
//! Permissions are addressed by their unique `action` string everywhere
//! outside this module.

use sqlx::PgExecutor;

use crate::models::permission::{CreatePermission, Permission, UpdatePermission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, action, group_name, description, \
    created_by, updated_by, created_at, updated_at";

/// Provides CRUD operations for permissions.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Insert a new permission, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreatePermission,
    ) -> Result<Permission, sqlx::Error> {
        let query = format!(
            "INSERT INTO permissions (action, group_name, description, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(&input.action)
            .bind(&input.group_name)
            .bind(&input.description)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a permission by its action string.
    pub async fn find_by_action<'e>(
        executor: impl PgExecutor<'e>,
        action: &str,
    ) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions WHERE action = $1");
        sqlx::query_as::<_, Permission>(&query)
            .bind(action)
            .fetch_optional(executor)
            .await
    }

    /// Resolve a batch of action strings. Unknown actions are simply absent
    /// from the result.
    pub async fn find_by_actions<'e>(
        executor: impl PgExecutor<'e>,
        actions: &[String],
    ) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM permissions WHERE action = ANY($1) ORDER BY action"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(actions)
            .fetch_all(executor)
            .await
    }

    /// List all permissions ordered by group, then action.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions ORDER BY group_name, action");
        sqlx::query_as::<_, Permission>(&query)
            .fetch_all(executor)
            .await
    }

    /// Update a permission's group and description. The action is immutable.
    ///
    /// Returns `None` if no permission has the given action.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        action: &str,
        input: &UpdatePermission,
    ) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!(
            "UPDATE permissions SET
                group_name = COALESCE($2, group_name),
                description = COALESCE($3, description),
                updated_by = COALESCE($4, updated_by)
             WHERE action = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(action)
            .bind(&input.group_name)
            .bind(&input.description)
            .bind(input.updated_by)
            .fetch_optional(executor)
            .await
    }

    /// Delete a permission by action. Its `role_permissions` rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        action: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM permissions WHERE action = $1")
            .bind(action)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
