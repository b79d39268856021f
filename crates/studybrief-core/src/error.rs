//! Error types for studybrief-core
//!
//! Upstream failures keep the raw status and body so the caller can decide,
//! per call site, whether to surface them or skip the item.

use thiserror::Error;

/// Core error type for studybrief operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Upstream Errors
    // ===================
    #[error("Notion API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Notion request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("Notion token is not a valid header value")]
    InvalidCredential,

    #[error("Malformed Notion response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Request Errors
    // ===================
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Unknown timezone '{value}'")]
    InvalidTimezone { value: String },
}

impl CoreError {
    /// HTTP status reported by the data service, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CoreError::Upstream { status, .. } => Some(*status),
            CoreError::Transport { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the error came from the external data service (as opposed to
    /// a malformed inbound request)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CoreError::Upstream { .. }
                | CoreError::Transport { .. }
                | CoreError::InvalidCredential
                | CoreError::Decode { .. }
        )
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(source: reqwest::Error) -> Self {
        CoreError::Transport { source }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(source: serde_json::Error) -> Self {
        CoreError::Decode { source }
    }
}

/// Required settings that were absent or empty at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Server misconfigured: {name} not set")]
    Missing { name: &'static str },

    #[error("Missing database IDs: {}", .names.join(", "))]
    MissingTables { names: Vec<&'static str> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_status_and_body() {
        let err = CoreError::Upstream {
            status: 404,
            body: "{\"object\":\"error\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Notion API error: 404 - {\"object\":\"error\"}"
        );
        assert_eq!(err.upstream_status(), Some(404));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_request_errors_are_not_upstream() {
        let err = CoreError::InvalidDate {
            value: "tomorrow".to_string(),
        };
        assert!(!err.is_upstream());
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_missing_tables_lists_every_name() {
        let err = ConfigError::MissingTables {
            names: vec!["PLAN_DB_ID", "MISTAKES_DB_ID"],
        };
        assert_eq!(
            err.to_string(),
            "Missing database IDs: PLAN_DB_ID, MISTAKES_DB_ID"
        );
    }
}
