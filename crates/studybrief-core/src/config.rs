//! Service configuration
//!
//! [`Settings`] holds the raw values as read at startup (any of them may be
//! missing). [`Settings::service_config`] turns them into an immutable
//! [`ServiceConfig`] that is handed to the client and digest builder; nothing
//! downstream reads the environment.

use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

/// Notion API root
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";

/// Value sent in the `Notion-Version` header
pub const NOTION_API_VERSION: &str = "2022-06-28";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;
pub const DEFAULT_EXAM_LABEL: &str = "MD-102";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Raw settings, one field per environment variable
#[derive(Clone, Default)]
pub struct Settings {
    pub notion_token: Option<String>,
    pub auth_token: Option<String>,
    pub plan_db_id: Option<String>,
    pub objectives_db_id: Option<String>,
    pub resources_db_id: Option<String>,
    pub practice_db_id: Option<String>,
    pub mistakes_db_id: Option<String>,
    pub notion_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fetch_concurrency: Option<usize>,
    pub exam_label: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("notion_token", &self.notion_token.as_ref().map(|_| "<redacted>"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("plan_db_id", &self.plan_db_id)
            .field("objectives_db_id", &self.objectives_db_id)
            .field("resources_db_id", &self.resources_db_id)
            .field("practice_db_id", &self.practice_db_id)
            .field("mistakes_db_id", &self.mistakes_db_id)
            .field("notion_base_url", &self.notion_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("exam_label", &self.exam_label)
            .finish()
    }
}

/// Empty strings count as unset
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Settings {
    /// Shared secret expected in the inbound auth header
    pub fn auth_token(&self) -> Result<&str, ConfigError> {
        present(&self.auth_token).ok_or(ConfigError::Missing { name: "AUTH_TOKEN" })
    }

    /// Validate everything the digest builder needs
    pub fn service_config(&self) -> Result<ServiceConfig, ConfigError> {
        let token = present(&self.notion_token).ok_or(ConfigError::Missing {
            name: "NOTION_TOKEN",
        })?;

        let tables = [
            ("PLAN_DB_ID", &self.plan_db_id),
            ("OBJECTIVES_DB_ID", &self.objectives_db_id),
            ("RESOURCES_DB_ID", &self.resources_db_id),
            ("PRACTICE_DB_ID", &self.practice_db_id),
            ("MISTAKES_DB_ID", &self.mistakes_db_id),
        ];
        let missing: Vec<&'static str> = tables
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingTables { names: missing });
        }

        let table = |value: &Option<String>| present(value).unwrap_or_default().to_string();

        Ok(ServiceConfig {
            notion: NotionConfig {
                token: token.to_string(),
                base_url: present(&self.notion_base_url)
                    .unwrap_or(DEFAULT_NOTION_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            },
            tables: TableIds {
                plan: table(&self.plan_db_id),
                objectives: table(&self.objectives_db_id),
                resources: table(&self.resources_db_id),
                practice_tests: table(&self.practice_db_id),
                mistakes: table(&self.mistakes_db_id),
            },
            fetch_concurrency: self
                .fetch_concurrency
                .unwrap_or(DEFAULT_FETCH_CONCURRENCY)
                .max(1),
            exam_label: present(&self.exam_label)
                .unwrap_or(DEFAULT_EXAM_LABEL)
                .to_string(),
        })
    }
}

/// Validated configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub notion: NotionConfig,
    pub tables: TableIds,
    /// Upper bound on in-flight per-item lookups
    pub fetch_concurrency: usize,
    /// Exam name shown in the subject and body header
    pub exam_label: String,
}

/// Connection settings for the Notion API
#[derive(Clone)]
pub struct NotionConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Database ids of the five study tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableIds {
    pub plan: String,
    pub objectives: String,
    pub resources: String,
    pub practice_tests: String,
    pub mistakes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Settings {
        Settings {
            notion_token: Some("secret_abc".to_string()),
            auth_token: Some("hook-secret".to_string()),
            plan_db_id: Some("plan".to_string()),
            objectives_db_id: Some("objectives".to_string()),
            resources_db_id: Some("resources".to_string()),
            practice_db_id: Some("practice".to_string()),
            mistakes_db_id: Some("mistakes".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_settings_use_defaults() {
        let config = complete().service_config().unwrap();
        assert_eq!(config.notion.base_url, DEFAULT_NOTION_BASE_URL);
        assert_eq!(config.notion.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch_concurrency, DEFAULT_FETCH_CONCURRENCY);
        assert_eq!(config.exam_label, "MD-102");
        assert_eq!(config.tables.practice_tests, "practice");
    }

    #[test]
    fn test_missing_notion_token_reported_first() {
        let settings = Settings {
            notion_token: Some("   ".to_string()),
            plan_db_id: None,
            ..complete()
        };
        assert_eq!(
            settings.service_config().unwrap_err(),
            ConfigError::Missing {
                name: "NOTION_TOKEN"
            }
        );
    }

    #[test]
    fn test_missing_tables_are_all_listed() {
        let settings = Settings {
            objectives_db_id: None,
            mistakes_db_id: Some(String::new()),
            ..complete()
        };
        assert_eq!(
            settings.service_config().unwrap_err(),
            ConfigError::MissingTables {
                names: vec!["OBJECTIVES_DB_ID", "MISTAKES_DB_ID"]
            }
        );
    }

    #[test]
    fn test_auth_token_required() {
        assert_eq!(complete().auth_token().unwrap(), "hook-secret");
        let settings = Settings {
            auth_token: None,
            ..complete()
        };
        assert!(settings.auth_token().is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_and_concurrency_floor() {
        let settings = Settings {
            notion_base_url: Some("http://127.0.0.1:9000/v1/".to_string()),
            fetch_concurrency: Some(0),
            ..complete()
        };
        let config = settings.service_config().unwrap();
        assert_eq!(config.notion.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.fetch_concurrency, 1);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("secret_abc"));
        assert!(!rendered.contains("hook-secret"));
    }
}
