//! Web router using Axum

use crate::response::panic_response;
use crate::webhook::webhook_handler;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use studybrief_core::{
    ConfigError, CoreError, DigestBuilder, NotionClient, Settings, TableSource,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Service name reported by the root probe
pub const SERVICE_NAME: &str = "md102-study-webhook";

/// Shared handler state.
///
/// Incomplete configuration is kept as an error rather than refusing to
/// start, so the probes stay up and the webhook can say what is missing.
pub struct AppState<S = NotionClient> {
    auth_token: Result<String, ConfigError>,
    digest: Result<DigestBuilder<S>, ConfigError>,
}

impl<S: TableSource> AppState<S> {
    pub fn new(
        auth_token: Result<String, ConfigError>,
        digest: Result<DigestBuilder<S>, ConfigError>,
    ) -> Self {
        Self { auth_token, digest }
    }

    pub fn auth_token(&self) -> Result<&str, ConfigError> {
        self.auth_token.as_deref().map_err(Clone::clone)
    }

    pub fn digest(&self) -> Result<&DigestBuilder<S>, ConfigError> {
        self.digest.as_ref().map_err(Clone::clone)
    }
}

impl AppState<NotionClient> {
    /// Build the state from raw settings, logging anything missing
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let auth_token = settings.auth_token().map(str::to_string);
        if let Err(err) = &auth_token {
            warn!(error = %err, "Webhook will reject every request");
        }

        let digest = match settings.service_config() {
            Ok(config) => Ok(DigestBuilder::new(NotionClient::new(&config.notion)?, &config)),
            Err(err) => {
                warn!(error = %err, "Notion access is not configured");
                Err(err)
            }
        };

        Ok(Self::new(auth_token, digest))
    }
}

/// Create the web router
pub fn create_router<S: TableSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler::<S>))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
