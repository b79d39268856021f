//! Objective, resource, practice test and mistake records

use crate::notion::Page;
use serde::Serialize;

/// Column labels of the lookup tables
pub mod columns {
    pub const OBJECTIVE_ID: &str = "Objective ID";
    pub const OBJECTIVE: &str = "Objective";
    pub const EXAM_AREA: &str = "Exam Area";
    pub const SKILL_GROUP: &str = "Skill Group";
    pub const PRIORITY: &str = "Priority";
    pub const PRIMARY_RESOURCES: &str = "Primary Resources (IDs)";

    pub const RESOURCE_ID: &str = "Resource ID";
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Type";
    pub const URL: &str = "URL";
    pub const WHY: &str = "Why it matters";

    pub const PRACTICE_DATE: &str = "Date";
    pub const PROVIDER: &str = "Provider";
    pub const TEST: &str = "Test";
    pub const PRIMARY_FOCUS: &str = "Primary Focus";
    pub const NOTES: &str = "Notes";

    pub const MISTAKE_OBJECTIVE_ID: &str = "Objective ID";
    pub const MISTAKE_SUMMARY: &str = "Mistake Summary";
    pub const CORRECT_RULE: &str = "Correct Rule";
    pub const RECOGNITION_TIP: &str = "Recognition Tip";
    pub const RESOLVED: &str = "Resolved";
}

/// A learning objective, keyed by the id it was requested with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub id: String,
    pub description: String,
    pub exam_area: String,
    pub skill_group: String,
    pub priority: String,
    /// Raw resource reference list, may contain range shorthand
    pub primary_resources: String,
}

impl Objective {
    pub fn from_page(id: &str, page: &Page) -> Self {
        Self {
            id: id.to_string(),
            description: page.text(columns::OBJECTIVE),
            exam_area: page.label(columns::EXAM_AREA),
            skill_group: page.label(columns::SKILL_GROUP),
            priority: page.label(columns::PRIORITY),
            primary_resources: page.text(columns::PRIMARY_RESOURCES),
        }
    }
}

/// A reference resource, keyed by the id it was requested with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub url: String,
    pub why: String,
}

impl Resource {
    pub fn from_page(id: &str, page: &Page) -> Self {
        Self {
            id: id.to_string(),
            name: page.text(columns::NAME),
            kind: page.label(columns::TYPE),
            url: page.url(columns::URL),
            why: page.text(columns::WHY),
        }
    }
}

/// Practice test scheduled for the day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PracticeTest {
    pub provider: String,
    pub test: String,
    pub focus: String,
    pub notes: String,
}

impl PracticeTest {
    pub fn from_page(page: &Page) -> Self {
        Self {
            provider: page.label(columns::PROVIDER),
            test: page.text(columns::TEST),
            focus: page.text(columns::PRIMARY_FOCUS),
            notes: page.text(columns::NOTES),
        }
    }
}

/// An open entry from the mistake bank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mistake {
    pub objective_id: String,
    pub summary: String,
    pub rule: String,
    pub tip: String,
    #[serde(skip)]
    pub resolved: bool,
    #[serde(skip)]
    pub created_time: Option<String>,
}

impl Mistake {
    pub fn from_page(page: &Page) -> Self {
        Self {
            objective_id: page.text(columns::MISTAKE_OBJECTIVE_ID),
            summary: page.text(columns::MISTAKE_SUMMARY),
            rule: page.text(columns::CORRECT_RULE),
            tip: page.text(columns::RECOGNITION_TIP),
            resolved: page.checkbox(columns::RESOLVED),
            created_time: page.created_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objective_keeps_requested_id() {
        let page: Page = serde_json::from_value(json!({
            "properties": {
                "Objective ID": {"type": "title", "title": [{"plain_text": "obj-01 "}]},
                "Objective": {"type": "rich_text", "rich_text": [{"plain_text": "Configure Autopilot"}]},
                "Exam Area": {"type": "select", "select": {"name": "Deploy"}},
                "Priority": {"type": "rich_text", "rich_text": [{"plain_text": "High"}]},
                "Primary Resources (IDs)": {"type": "rich_text", "rich_text": [{"plain_text": "RES-3..4"}]}
            }
        }))
        .unwrap();

        let objective = Objective::from_page("OBJ-01", &page);
        assert_eq!(objective.id, "OBJ-01");
        assert_eq!(objective.description, "Configure Autopilot");
        assert_eq!(objective.exam_area, "Deploy");
        assert_eq!(objective.skill_group, "");
        assert_eq!(objective.priority, "High");
        assert_eq!(objective.primary_resources, "RES-3..4");
    }

    #[test]
    fn test_resource_url_stored_as_text() {
        let page: Page = serde_json::from_value(json!({
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "MS Learn path"}]},
                "Type": {"type": "select", "select": {"name": "Docs"}},
                "URL": {"type": "rich_text", "rich_text": [{"plain_text": "https://learn.microsoft.com"}]}
            }
        }))
        .unwrap();

        let resource = Resource::from_page("RES-1", &page);
        assert_eq!(resource.kind, "Docs");
        assert_eq!(resource.url, "https://learn.microsoft.com");
        assert_eq!(resource.why, "");
    }

    #[test]
    fn test_mistake_carries_creation_time() {
        let page: Page = serde_json::from_value(json!({
            "created_time": "2026-02-01T08:00:00.000Z",
            "properties": {
                "Objective ID": {"type": "rich_text", "rich_text": [{"plain_text": "OBJ-02"}]},
                "Mistake Summary": {"type": "title", "title": [{"plain_text": "Mixed up rings"}]},
                "Resolved": {"type": "checkbox", "checkbox": false}
            }
        }))
        .unwrap();

        let mistake = Mistake::from_page(&page);
        assert_eq!(mistake.objective_id, "OBJ-02");
        assert_eq!(mistake.summary, "Mixed up rings");
        assert!(!mistake.resolved);
        assert_eq!(
            mistake.created_time.as_deref(),
            Some("2026-02-01T08:00:00.000Z")
        );
    }
}
