//! Handler for `POST /pubsub/publish`, a development utility that pushes a
//! message onto the configured topic. No authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::ValidatedJson;
use crate::state::AppState;

const PUBSUB_DISABLED: &str = "Pub/Sub is not enabled";
const PUBSUB_NOT_CONFIGURED: &str = "PUBSUB_TOPIC not configured";
const PUBSUB_PUBLISH_ERROR: &str = "Failed to publish message";
const PUBSUB_PUBLISH_SUCCESS: &str = "Message published to Pub/Sub";

/// Request body for `POST /pubsub/publish`.
#[derive(Debug, Deserialize, Validate)]
pub struct PublishRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
    /// Must be a JSON object when present.
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Payload put on the topic.
#[derive(Debug, Clone, Serialize)]
pub struct PublishPayload {
    pub message: String,
    pub data: serde_json::Map<String, serde_json::Value>,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    /// `CHART` or `"unknown"`.
    pub service: String,
}

/// Response body for every outcome.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<PublishPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResponse {
    fn failure(message: &'static str, error: Option<String>) -> Self {
        Self {
            success: false,
            message,
            payload: None,
            error,
        }
    }
}

/// POST /pubsub/publish
pub async fn publish(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PublishRequest>,
) -> (StatusCode, Json<PublishResponse>) {
    let config = &state.config.pubsub;
    if !config.enabled {
        return (
            StatusCode::BAD_REQUEST,
            Json(PublishResponse::failure(PUBSUB_DISABLED, None)),
        );
    }
    let Some(topic) = config.topic.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(PublishResponse::failure(PUBSUB_NOT_CONFIGURED, None)),
        );
    };

    let payload = PublishPayload {
        message: input.message,
        data: input.data.unwrap_or_default(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: config.service.clone().unwrap_or_else(|| "unknown".into()),
    };

    match state.pubsub.publish(topic, &payload) {
        Ok(receivers) => {
            tracing::info!(%topic, receivers, "Published Pub/Sub message");
            (
                StatusCode::OK,
                Json(PublishResponse {
                    success: true,
                    message: PUBSUB_PUBLISH_SUCCESS,
                    payload: Some(payload),
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, %topic, "Failed to publish Pub/Sub message");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PublishResponse::failure(
                    PUBSUB_PUBLISH_ERROR,
                    Some(e.to_string()),
                )),
            )
        }
    }
}
