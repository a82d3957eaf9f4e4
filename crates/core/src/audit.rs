//! Audit trail vocabulary and snapshot sanitisation.
//!
//! Every create, update, or delete of a user, role, or permission writes
//! exactly one audit entry. This module defines what such an entry may say;
//! persisting it is the job of `rbac_db::repositories::AuditRepo`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity types
// ---------------------------------------------------------------------------

/// Known `entity_type` values for audit entries.
pub mod entity_types {
    pub const USER: &str = "User";
    pub const ROLE: &str = "Role";
    pub const PERMISSION: &str = "Permission";
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// The stored representation (`CREATE`, `UPDATE`, `DELETE`).
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Key fragments whose values must never reach the audit ledger.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "credential",
];

/// Placeholder written in place of a redacted value.
pub const REDACTED: &str = "[REDACTED]";

/// Redact sensitive fields from a JSON snapshot, recursing into nested
/// objects and arrays.
///
/// Any key containing one of [`SENSITIVE_FIELDS`] (case-insensitive) has its
/// value replaced with [`REDACTED`].
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let redacted = map
                .iter()
                .map(|(key, val)| {
                    let lower_key = key.to_lowercase();
                    if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                        (key.clone(), serde_json::Value::String(REDACTED.to_string()))
                    } else {
                        (key.clone(), redact_sensitive_fields(val))
                    }
                })
                .collect();
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

/// Serialize a value into a redacted audit snapshot.
pub fn snapshot<T: Serialize>(value: &T) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(value).map(|v| redact_sensitive_fields(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn storage_form_matches_serialized_form() {
        for action in [AuditAction::Create, AuditAction::Update, AuditAction::Delete] {
            assert_eq!(serde_json::to_value(action).unwrap(), json!(action.as_str()));
        }
    }

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(AuditAction::Delete).unwrap(),
            json!("DELETE")
        );
    }

    #[test]
    fn password_hash_is_redacted() {
        let input = json!({ "email": "a@b.io", "passwordHash": "$argon2id$..." });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["email"], "a@b.io");
        assert_eq!(out["passwordHash"], REDACTED);
    }

    #[test]
    fn nested_values_are_redacted() {
        let input = json!({ "user": { "Password": "x" }, "list": [{ "token": "t" }] });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["user"]["Password"], REDACTED);
        assert_eq!(out["list"][0]["token"], REDACTED);
    }

    #[test]
    fn snapshot_of_struct_applies_redaction() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            secret_key: &'static str,
        }
        let out = snapshot(&Row { name: "n", secret_key: "k" }).unwrap();
        assert_eq!(out, json!({ "name": "n", "secret_key": REDACTED }));
    }
}
