//! Notion record model and field extractors
//!
//! Notion returns each page as a map of property name to a value container
//! tagged by `"type"`. Only the property types this service reads are modelled;
//! anything else (or anything malformed) decodes as [`PropertyValue::Unsupported`]
//! so one odd column never poisons a whole query result.
//!
//! Extractors are total: absent or mismatched properties degrade to `""` / `false`.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// One run of text inside a `title` or `rich_text` array
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub plain_text: String,
}

/// Chosen option of a `select` or `status` property
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// Value of a `date` property
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
}

/// Property value container, discriminated by Notion's `type` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<TextRun>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<TextRun>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Status {
        #[serde(default)]
        status: Option<SelectOption>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Date {
        #[serde(default)]
        date: Option<DateRange>,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

/// A single database row as returned by the query endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: String,

    /// RFC 3339 creation timestamp, used only for ordering
    #[serde(default)]
    pub created_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// Look up a property by its exact column label
    pub fn prop(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn text(&self, name: &str) -> String {
        text(self.prop(name))
    }

    pub fn select(&self, name: &str) -> String {
        select(self.prop(name))
    }

    pub fn checkbox(&self, name: &str) -> bool {
        checkbox(self.prop(name))
    }

    pub fn date(&self, name: &str) -> String {
        date(self.prop(name))
    }

    pub fn url(&self, name: &str) -> String {
        url(self.prop(name))
    }

    /// Single-choice label, falling back to text for columns kept as plain text
    pub fn label(&self, name: &str) -> String {
        let chosen = self.select(name);
        if chosen.is_empty() {
            self.text(name)
        } else {
            chosen
        }
    }
}

/// Decode each property on its own so one malformed value only loses itself
fn lenient_properties<'de, D>(deserializer: D) -> Result<HashMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let value = serde_json::from_value(value).unwrap_or(PropertyValue::Unsupported);
            (name, value)
        })
        .collect())
}

fn join_runs(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|run| run.plain_text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Concatenated plain text of a `rich_text` or `title` property
pub fn text(prop: Option<&PropertyValue>) -> String {
    match prop {
        Some(PropertyValue::RichText { rich_text }) => join_runs(rich_text),
        Some(PropertyValue::Title { title }) => join_runs(title),
        _ => String::new(),
    }
}

/// Label of the chosen option of a `select` (or `status`) property
pub fn select(prop: Option<&PropertyValue>) -> String {
    match prop {
        Some(PropertyValue::Select { select: Some(option) })
        | Some(PropertyValue::Status { status: Some(option) }) => option.name.clone(),
        _ => String::new(),
    }
}

/// Checkbox state, `false` when absent
pub fn checkbox(prop: Option<&PropertyValue>) -> bool {
    matches!(prop, Some(PropertyValue::Checkbox { checkbox: true }))
}

/// Start of a `date` property
pub fn date(prop: Option<&PropertyValue>) -> String {
    match prop {
        Some(PropertyValue::Date { date: Some(range) }) => range.start.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// URL of a `url` property; some tables keep links as text, so text is read too
pub fn url(prop: Option<&PropertyValue>) -> String {
    match prop {
        Some(PropertyValue::Url { url }) => url.clone().unwrap_or_default(),
        other => text(other),
    }
}
