//! Audit ledger entity model and DTO.
//!
//! Audit entries are immutable records (no `updated_at`); the table rejects
//! UPDATE and DELETE at the database level.

use rbac_core::audit::AuditAction;
use rbac_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A single audit entry.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub action: String,
    pub previous_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub performed_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for appending an audit entry.
///
/// Constructed via [`CreateAuditEntry::new`] and enriched with
/// [`previous`](CreateAuditEntry::previous), [`new_data`](CreateAuditEntry::new_data),
/// and [`performed_by`](CreateAuditEntry::performed_by).
#[derive(Debug, Clone)]
pub struct CreateAuditEntry {
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub action: AuditAction,
    pub previous_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub performed_by: Option<DbId>,
}

impl CreateAuditEntry {
    pub fn new(entity_type: &'static str, entity_id: DbId, action: AuditAction) -> Self {
        Self {
            entity_type,
            entity_id,
            action,
            previous_data: None,
            new_data: None,
            performed_by: None,
        }
    }

    /// Attach the state before the mutation.
    pub fn previous(mut self, data: serde_json::Value) -> Self {
        self.previous_data = Some(data);
        self
    }

    /// Attach the state after the mutation.
    pub fn new_data(mut self, data: serde_json::Value) -> Self {
        self.new_data = Some(data);
        self
    }

    /// Attribute the mutation to a user.
    pub fn performed_by(mut self, user_id: Option<DbId>) -> Self {
        self.performed_by = user_id;
        self
    }
}
