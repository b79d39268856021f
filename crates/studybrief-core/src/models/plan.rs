//! One day's row from the study plan table

use crate::notion::Page;
use serde::Serialize;

/// Column labels of the plan table
pub mod columns {
    pub const DATE: &str = "Date";
    pub const PHASE: &str = "Phase";
    pub const FOCUS_PRIORITY: &str = "Focus Priority";
    pub const SESSION_1: &str = "Session 1 (1 hr) – Learn";
    pub const SESSION_1_RESOURCES: &str = "Session 1 Resources (IDs/URLs)";
    pub const SESSION_2: &str = "Session 2 (1 hr) – Lab/Practice";
    pub const SESSION_2_RESOURCES: &str = "Session 2 Resources (IDs/URLs)";
    pub const FOCUS_OBJECTIVES: &str = "Focus objectives (IDs)";
    pub const SESSION_1_DONE: &str = "Session 1 Done";
    pub const SESSION_2_DONE: &str = "Session 2 Done";
}

/// Study plan for a single date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanRow {
    pub date: String,
    pub phase: String,
    pub focus_priority: String,
    pub session1: String,
    /// Raw reference list, kept verbatim for display
    pub session1_resources: String,
    pub session2: String,
    pub session2_resources: String,
    /// Raw objective reference list, may contain range shorthand
    pub focus_objectives: String,
    pub session1_done: bool,
    pub session2_done: bool,
}

impl PlanRow {
    pub fn from_page(page: &Page) -> Self {
        Self {
            date: page.date(columns::DATE),
            phase: page.label(columns::PHASE),
            focus_priority: page.label(columns::FOCUS_PRIORITY),
            session1: page.text(columns::SESSION_1),
            session1_resources: page.text(columns::SESSION_1_RESOURCES),
            session2: page.text(columns::SESSION_2),
            session2_resources: page.text(columns::SESSION_2_RESOURCES),
            focus_objectives: page.text(columns::FOCUS_OBJECTIVES),
            session1_done: page.checkbox(columns::SESSION_1_DONE),
            session2_done: page.checkbox(columns::SESSION_2_DONE),
        }
    }

    /// Both sessions ticked off
    pub fn is_completed(&self) -> bool {
        self.session1_done && self.session2_done
    }
}
