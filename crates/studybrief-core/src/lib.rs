//! studybrief-core - Core library for studybrief
//!
//! Reads a day's study plan and its linked objectives, resources, practice
//! test and open mistakes from Notion, and renders them as a plain-text email.

pub mod config;
pub mod digest;
pub mod error;
pub mod ids;
pub mod models;
pub mod notion;
pub mod policy;

pub use config::{ServiceConfig, Settings, TableIds};
pub use digest::{DebugSummary, Digest, DigestBuilder, DigestReason};
pub use error::{ConfigError, CoreError};
pub use notion::{NotionClient, TableSource};
pub use policy::{FetchPolicies, FetchPolicy};
