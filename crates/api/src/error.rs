use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rbac_core::error::CoreError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error returned by every handler and extractor.
///
/// Domain failures arrive as [`CoreError`]; the remaining variants cover
/// storage, request parsing and field validation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request body failed validation: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Malformed input the validator never saw, e.g. unparsable JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Logged in full; the client only sees a generic message.
    #[error("internal failure: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON error body: `{ message, code }` plus optional detail fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    code: &'static str,
    /// Per-field validator messages keyed by camelCase field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_permissions: Option<Vec<String>>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            error: None,
            missing_permissions: None,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(err) => core_error_body(err),
            AppError::Database(err) => sqlx_error_body(&err),
            AppError::Validation(errors) => {
                let fields = field_messages(&errors);
                let summary = fields
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
                    .collect::<Vec<_>>()
                    .join("; ");
                let mut body =
                    ErrorBody::new("VALIDATION_ERROR", format!("Validation failed: {summary}"));
                body.error = Some(fields);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", message))
            }
            AppError::InternalError(detail) => {
                tracing::error!(%detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        };

        (status, Json(body)).into_response()
    }
}

fn core_error_body(err: CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, .. } | CoreError::NotFoundByKey { entity, .. } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} not found")),
        ),
        CoreError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", message),
        ),
        CoreError::MissingPermissions(missing) => {
            let mut body = ErrorBody::new("VALIDATION_ERROR", "Some permissions were not found");
            body.missing_permissions = Some(missing);
            (StatusCode::BAD_REQUEST, body)
        }
        CoreError::Conflict(message) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", message)),
        CoreError::Unauthorized(message) => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("UNAUTHORIZED", message),
        ),
        CoreError::Forbidden(message) => {
            (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", message))
        }
        // Messages here are written by handlers, never taken from a driver.
        CoreError::Internal(message) => {
            tracing::error!(%message, "Handler reported an internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("INTERNAL_ERROR", message),
            )
        }
    }
}

/// Map a sqlx failure onto a status and body.
///
/// Missing rows become 404. Unique violations on a `uq_*` constraint and
/// foreign-key violations become 409. Anything else is logged and hidden
/// behind a generic 500.
fn sqlx_error_body(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        );
    }

    if let Some(db_err) = err.as_database_error() {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some("23505") if constraint.starts_with("uq_") => {
                return (
                    StatusCode::CONFLICT,
                    ErrorBody::new("CONFLICT", format!("Value already exists ({constraint})")),
                );
            }
            Some("23503") => {
                return (
                    StatusCode::CONFLICT,
                    ErrorBody::new(
                        "CONFLICT",
                        format!("Record is still referenced ({constraint})"),
                    ),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Unhandled database error");
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
}

/// Flatten validator output into `{ camelCaseField: [messages] }`, sorted by field.
fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (to_camel_case(&field), messages)
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut parts = field.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
