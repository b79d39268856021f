//! Daily digest assembly
//!
//! A digest ends in one of four states, reported as [`DigestReason`]:
//! `no_plan` and `completed` stop before any secondary lookup, `ok` carries a
//! rendered email, `error` is produced by the caller when the mandatory plan
//! lookup (or anything else) fails.

pub mod builder;
pub mod calendar;
pub mod render;

pub use builder::{correlate_mistakes, DigestBuilder, MAX_MISTAKES};
pub use calendar::resolve_date;

use crate::models::{Mistake, Objective, PlanRow, PracticeTest, Resource};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestReason {
    Ok,
    NoPlan,
    Completed,
    Error,
}

impl DigestReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestReason::Ok => "ok",
            DigestReason::NoPlan => "no_plan",
            DigestReason::Completed => "completed",
            DigestReason::Error => "error",
        }
    }
}

/// Counts of what was actually resolved, for troubleshooting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebugSummary {
    pub date: String,
    pub objectives_count: usize,
    pub resources_count: usize,
    pub practice_test_found: bool,
    pub mistakes_found: usize,
}

impl DebugSummary {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }
}

/// Outcome of one digest request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub should_send: bool,
    pub subject: String,
    pub body: String,
    pub reason: DigestReason,
    pub debug: DebugSummary,
}

impl Digest {
    /// Nothing to send for `date`
    pub fn skipped(date: &str, reason: DigestReason) -> Self {
        Self {
            should_send: false,
            subject: String::new(),
            body: String::new(),
            reason,
            debug: DebugSummary::for_date(date),
        }
    }

    /// Failed digest; `date` may be empty when the request never got that far
    pub fn failed(date: &str) -> Self {
        Self::skipped(date, DigestReason::Error)
    }

    /// Render a fully assembled brief
    pub fn ready(brief: &Brief) -> Self {
        Self {
            should_send: true,
            subject: render::subject(&brief.exam_label, &brief.plan.focus_priority),
            body: render::body(brief),
            reason: DigestReason::Ok,
            debug: DebugSummary {
                date: brief.date.clone(),
                objectives_count: brief.objectives.len(),
                resources_count: brief.resources.len(),
                practice_test_found: brief.practice_test.is_some(),
                mistakes_found: brief.mistakes.len(),
            },
        }
    }
}

/// Everything gathered for one day, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub exam_label: String,
    pub date: String,
    pub plan: PlanRow,
    pub objectives: Vec<Objective>,
    pub resources: Vec<Resource>,
    pub practice_test: Option<PracticeTest>,
    pub mistakes: Vec<Mistake>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_digest_shape() {
        let digest = Digest::skipped("2026-03-02", DigestReason::NoPlan);
        let value = serde_json::to_value(&digest).unwrap();
        assert_eq!(value["should_send"], false);
        assert_eq!(value["reason"], "no_plan");
        assert_eq!(value["subject"], "");
        assert_eq!(value["debug"]["date"], "2026-03-02");
        assert_eq!(value["debug"]["objectives_count"], 0);
        assert_eq!(value["debug"]["practice_test_found"], false);
    }

    #[test]
    fn test_reason_strings_match_serde() {
        for reason in [
            DigestReason::Ok,
            DigestReason::NoPlan,
            DigestReason::Completed,
            DigestReason::Error,
        ] {
            assert_eq!(
                serde_json::to_value(reason).unwrap(),
                serde_json::Value::String(reason.as_str().to_string())
            );
        }
    }
}
