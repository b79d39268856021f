//! Per-call-site failure handling
//!
//! Every upstream lookup the digest makes is tagged with a [`FetchPolicy`].
//! `Required` lookups abort the digest on failure; `BestEffort` lookups log
//! the failure and continue with an empty result. [`FetchPolicies`] is the
//! single table that says which is which.

use crate::error::CoreError;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Failure aborts the request
    Required,
    /// Failure drops the item
    BestEffort,
}

impl FetchPolicy {
    /// Apply this policy to a lookup result.
    ///
    /// `site` and `item` only feed the log line.
    pub fn settle<T: Default>(
        self,
        site: &'static str,
        item: &str,
        result: Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (FetchPolicy::Required, Err(err)) => Err(err),
            (FetchPolicy::BestEffort, Err(err)) => {
                warn!(site, item, error = %err, "Skipping failed lookup");
                Ok(T::default())
            }
        }
    }
}

/// Policy of each lookup made while building a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicies {
    pub plan: FetchPolicy,
    pub objective: FetchPolicy,
    pub resource: FetchPolicy,
    pub practice_test: FetchPolicy,
    pub mistakes: FetchPolicy,
}

impl Default for FetchPolicies {
    fn default() -> Self {
        Self {
            plan: FetchPolicy::Required,
            objective: FetchPolicy::BestEffort,
            resource: FetchPolicy::BestEffort,
            practice_test: FetchPolicy::BestEffort,
            mistakes: FetchPolicy::BestEffort,
        }
    }
}
