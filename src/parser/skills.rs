use serde_json::Value;

use crate::model::NOT_AVAILABLE;

/// The shapes `tagsAndSkills` shows up in, classified before any token is read.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillShape {
    /// `["j","a","v","a",",","s","q","l"]`, already concatenated.
    Characters(String),
    /// A list of strings and/or label-bearing objects.
    Items(Vec<SkillItem>),
    /// `"java, sql"`
    Joined(String),
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillItem {
    Plain(String),
    Label(String),
    Title(String),
    Malformed,
}

impl SkillItem {
    fn classify(value: &Value) -> Self {
        if let Some(s) = value.as_str() {
            return SkillItem::Plain(s.to_string());
        }
        if let Some(label) = value.get("label").and_then(Value::as_str) {
            return SkillItem::Label(label.to_string());
        }
        if let Some(title) = value.get("title").and_then(Value::as_str) {
            return SkillItem::Title(title.to_string());
        }
        SkillItem::Malformed
    }

    fn text(&self) -> Option<&str> {
        match self {
            SkillItem::Plain(s) | SkillItem::Label(s) | SkillItem::Title(s) => Some(s),
            SkillItem::Malformed => None,
        }
    }
}

impl SkillShape {
    pub fn classify(raw: &Value) -> Self {
        match raw {
            Value::Array(items) if !items.is_empty() && items.iter().all(is_single_char) => {
                SkillShape::Characters(items.iter().filter_map(Value::as_str).collect())
            }
            Value::Array(items) => SkillShape::Items(items.iter().map(SkillItem::classify).collect()),
            Value::String(s) => SkillShape::Joined(s.clone()),
            _ => SkillShape::Absent,
        }
    }

    /// Trimmed, non-empty skill tokens in source order.
    pub fn tokens(&self) -> Vec<String> {
        let pieces: Vec<&str> = match self {
            SkillShape::Characters(text) if text.contains(',') => text.split(',').collect(),
            SkillShape::Characters(text) => vec![text.as_str()],
            SkillShape::Items(items) => items.iter().filter_map(SkillItem::text).collect(),
            SkillShape::Joined(text) => text.split(',').collect(),
            SkillShape::Absent => Vec::new(),
        };
        pieces
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn is_single_char(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.chars().count() == 1)
}

/// Resolve a raw skills value to `"a, b, c"`, or `"N/A"` when nothing usable remains.
pub fn resolve(raw: &Value) -> String {
    let tokens = SkillShape::classify(raw).tokens();
    if tokens.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        tokens.join(", ")
    }
}
