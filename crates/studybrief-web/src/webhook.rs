//! The digest webhook

use crate::auth;
use crate::response::{digest_response, Failure, WebhookError};
use crate::router::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use studybrief_core::config::DEFAULT_TIMEZONE;
use studybrief_core::digest::resolve_date;
use studybrief_core::TableSource;
use tracing::info;

/// Inbound payload; an empty body means "today in the default timezone"
#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default, alias = "run_date")]
    pub date: Option<String>,

    #[serde(default)]
    pub timezone: Option<String>,
}

impl WebhookRequest {
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| WebhookError::BadRequest(e.to_string()))
    }

    pub fn timezone(&self) -> &str {
        self.timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .unwrap_or(DEFAULT_TIMEZONE)
    }
}

/// `POST /webhook`
///
/// Checks run in a fixed order: shared secret configured, shared secret
/// presented, service configured, payload valid. Only then is Notion queried.
pub async fn webhook_handler<S: TableSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Failure> {
    let expected = state.auth_token().map_err(WebhookError::from)?;
    if !auth::is_authorized(&headers, expected) {
        return Err(WebhookError::Unauthorized.into());
    }

    let builder = state.digest().map_err(WebhookError::from)?;

    let request = WebhookRequest::parse(&body)?;
    let date = resolve_date(request.date.as_deref(), request.timezone(), Utc::now())
        .map_err(|e| Failure::new(e, request.date.clone().unwrap_or_default()))?;

    info!(date = %date, timezone = request.timezone(), "Webhook request");
    let digest = builder
        .build(&date)
        .await
        .map_err(|e| Failure::new(e, date.as_str()))?;

    info!(
        date = %date,
        reason = digest.reason.as_str(),
        should_send = digest.should_send,
        "Webhook answered"
    );
    Ok(digest_response(digest))
}
