//! Repository for the `roles` table.

use std::collections::HashMap;

use rbac_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::RolePermissionRepo;
use crate::models::role::{CreateRole, Role, RoleWithPermissions, UpdateRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_by, updated_by, created_at, updated_at";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateRole,
    ) -> Result<Role, sqlx::Error> {
        let query = format!(
            "INSERT INTO roles (name, description, created_by, updated_by)
             VALUES ($1, $2, $3, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a role by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a role by name (case-sensitive).
    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(executor).await
    }

    /// Update a role. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateRole,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_by = COALESCE($4, updated_by)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.updated_by)
            .fetch_optional(executor)
            .await
    }

    /// Delete a role. Its `role_permissions` rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of users currently assigned to the role.
    pub async fn count_users<'e>(
        executor: impl PgExecutor<'e>,
        role_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(executor)
            .await
    }

    /// Find a role by ID together with its linked permissions.
    pub async fn find_with_permissions(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<RoleWithPermissions>, sqlx::Error> {
        let Some(role) = Self::find_by_id(&mut *conn, id).await? else {
            return Ok(None);
        };
        let permissions = RolePermissionRepo::list_summaries_for_role(&mut *conn, id).await?;
        Ok(Some(RoleWithPermissions::new(role, permissions)))
    }

    /// List every role with its linked permissions, using one query for the
    /// roles and one for all join rows.
    pub async fn list_with_permissions(
        pool: &PgPool,
    ) -> Result<Vec<RoleWithPermissions>, sqlx::Error> {
        let roles = Self::list(pool).await?;
        let mut by_role = HashMap::new();
        for (role_id, summary) in RolePermissionRepo::list_all_summaries(pool).await? {
            by_role.entry(role_id).or_insert_with(Vec::new).push(summary);
        }

        Ok(roles
            .into_iter()
            .map(|role| {
                let permissions = by_role.remove(&role.id).unwrap_or_default();
                RoleWithPermissions::new(role, permissions)
            })
            .collect())
    }
}
