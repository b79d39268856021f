//! Read-only access to the Notion databases backing the study plan
//!
//! [`TableSource`] is the seam the digest builder talks to; [`NotionClient`]
//! is the HTTP implementation.

pub mod client;
pub mod properties;

pub use client::{NotionClient, QueryBody};
pub use properties::{Page, PropertyValue};

use crate::error::CoreError;
use std::future::Future;

/// The three query shapes the digest needs
pub trait TableSource: Send + Sync {
    /// Rows whose date property equals `date` (`YYYY-MM-DD`), in service order
    fn query_by_date(
        &self,
        table_id: &str,
        property: &str,
        date: &str,
    ) -> impl Future<Output = Result<Vec<Page>, CoreError>> + Send;

    /// Rows whose text or title property equals `value` exactly
    fn query_by_text(
        &self,
        table_id: &str,
        property: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<Page>, CoreError>> + Send;

    /// Rows whose `resolved_property` checkbox is unticked, newest first
    fn query_unresolved(
        &self,
        table_id: &str,
        resolved_property: &str,
    ) -> impl Future<Output = Result<Vec<Page>, CoreError>> + Send;
}
