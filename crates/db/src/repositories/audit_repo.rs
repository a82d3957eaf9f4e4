//! Repository for the append-only `audits` table.

use rbac_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::audit::{AuditEntry, CreateAuditEntry};

/// Column list for `audits` SELECT queries.
const COLUMNS: &str = "id, entity_type, entity_id, action, previous_data, new_data, \
    performed_by, created_at";

/// Provides insert and read operations for audit entries.
///
/// There is no update or delete: the table trigger rejects both.
pub struct AuditRepo;

impl AuditRepo {
    /// Append a single audit entry.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        entry: &CreateAuditEntry,
    ) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audits
                (entity_type, entity_id, action, previous_data, new_data, performed_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(entry.action.as_str())
            .bind(&entry.previous_data)
            .bind(&entry.new_data)
            .bind(entry.performed_by)
            .fetch_one(executor)
            .await
    }

    /// All entries for one entity, oldest first.
    pub async fn list_for_entity<'e>(
        executor: impl PgExecutor<'e>,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audits
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(executor)
            .await
    }

    /// Total number of audit entries.
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM audits")
            .fetch_one(executor)
            .await
    }
}
