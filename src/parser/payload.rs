use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of a search page's `jobDetails` list.
///
/// The search API is inconsistent about scalar types, so every text field is
/// decoded loosely: numbers and booleans become text, anything else is absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJobPayload {
    #[serde(default, deserialize_with = "loose_text")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub footer_placeholder_label: Option<String>,
    /// Shape varies per listing; see [`super::skills::SkillShape`].
    #[serde(default)]
    pub tags_and_skills: Value,
    #[serde(default, deserialize_with = "loose_placeholders")]
    pub placeholders: Vec<Placeholder>,
    #[serde(default, deserialize_with = "loose_text")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Experience,
    Salary,
    Location,
}

impl PlaceholderKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "experience" => Some(Self::Experience),
            "salary" => Some(Self::Salary),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub label: String,
}

pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

// Entries without a recognized `type` or a usable `label` are ignored.
fn loose_placeholders<'de, D>(deserializer: D) -> Result<Vec<Placeholder>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| {
            let kind = entry
                .get("type")
                .and_then(Value::as_str)
                .and_then(PlaceholderKind::from_tag)?;
            let label = entry.get("label").and_then(text_of)?;
            Some(Placeholder { kind, label })
        })
        .collect())
}
