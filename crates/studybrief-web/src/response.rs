//! Webhook response envelopes
//!
//! Success and failure share one JSON shape. Failures add an `error` string
//! and always report `should_send: false` with reason `error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::any::Any;
use studybrief_core::{ConfigError, CoreError, Digest};
use thiserror::Error;
use tracing::{error, warn};

/// Reasons a webhook call ends without a digest
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Unauthorized: Invalid or missing X-AUTH-TOKEN")]
    Unauthorized,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebhookError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebhookError::Core(CoreError::InvalidDate { .. } | CoreError::InvalidTimezone { .. }) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Core(err) if err.is_upstream() => StatusCode::BAD_GATEWAY,
            WebhookError::Core(_) | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope {
    #[serde(flatten)]
    digest: Digest,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// A failed webhook call, with the date it was for when known
#[derive(Debug)]
pub struct Failure {
    pub error: WebhookError,
    pub date: String,
}

impl Failure {
    pub fn new(error: impl Into<WebhookError>, date: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            date: date.into(),
        }
    }
}

impl From<WebhookError> for Failure {
    fn from(error: WebhookError) -> Self {
        Failure::new(error, "")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let message = self.error.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), date = %self.date, error = %message, "Webhook failed");
        } else {
            warn!(status = status.as_u16(), date = %self.date, error = %message, "Webhook rejected");
        }

        let envelope = Envelope {
            digest: Digest::failed(&self.date),
            error: Some(message),
        };
        (status, Json(envelope)).into_response()
    }
}

/// Envelope for a handler that panicked
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };
    Failure::new(WebhookError::Internal(message), "").into_response()
}

/// Successful call; `no_plan` and `completed` are successes too
pub fn digest_response(digest: Digest) -> Response {
    Json(Envelope {
        digest,
        error: None,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybrief_core::DigestReason;

    #[test]
    fn test_status_mapping() {
        assert_eq!(WebhookError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            WebhookError::from(ConfigError::Missing { name: "AUTH_TOKEN" }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebhookError::from(CoreError::InvalidTimezone {
                value: "Mars/Base".to_string()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::from(CoreError::Upstream {
                status: 503,
                body: String::new()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_any_panic_payload_answers_500() {
        let response = panic_response(Box::new("plan lookup exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_envelope_flattens_digest() {
        let envelope = Envelope {
            digest: Digest::skipped("2026-03-02", DigestReason::Completed),
            error: None,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["reason"], "completed");
        assert_eq!(value["debug"]["date"], "2026-03-02");
        assert!(value.get("error").is_none());
    }
}
