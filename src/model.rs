use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for a field the payload did not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Persisted text value for a missing or empty field.
pub const NOT_SPECIFIED: &str = "Not Specified";

// ── Extracted ──

/// One job as pulled out of a search page, before any cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedJobRecord {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub footer_label: String,
    pub skills: String,
    pub experience: String,
    pub salary: String,
    pub location: String,
    pub description: String,
    pub snapshot_date: NaiveDate,
}

// ── Normalized ──

/// Final snapshot row. Text fields hold cleaned values or [`NOT_SPECIFIED`];
/// numeric fields are `None` when the source text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJobRecord {
    #[serde(rename = "Job ID")]
    pub job_id: String,
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Footer Placeholder Label")]
    pub footer_label: String,
    #[serde(rename = "Tags and Skills")]
    pub skills: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Salary")]
    pub salary: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Job Description")]
    pub description: String,
    #[serde(rename = "Scraped Date")]
    pub snapshot_date: NaiveDate,
    #[serde(rename = "Min Salary")]
    pub min_salary: Option<f64>,
    #[serde(rename = "Max Salary")]
    pub max_salary: Option<f64>,
    #[serde(rename = "Min Experience")]
    pub min_experience: Option<f64>,
    #[serde(rename = "Max Experience")]
    pub max_experience: Option<f64>,
    #[serde(rename = "Posted Days Ago")]
    pub posted_days_ago: Option<u32>,
}

impl NormalizedJobRecord {
    /// Column headers, in the order [`NormalizedJobRecord::to_row`] emits cells.
    pub const COLUMNS: [&'static str; 15] = [
        "Job ID",
        "Job Title",
        "Company Name",
        "Footer Placeholder Label",
        "Tags and Skills",
        "Experience",
        "Salary",
        "Location",
        "Job Description",
        "Scraped Date",
        "Min Salary",
        "Max Salary",
        "Min Experience",
        "Max Experience",
        "Posted Days Ago",
    ];

    /// Flatten into delimited-text cells. Absent numbers become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.job_id.clone(),
            self.title.clone(),
            self.company_name.clone(),
            self.footer_label.clone(),
            self.skills.clone(),
            self.experience.clone(),
            self.salary.clone(),
            self.location.clone(),
            self.description.clone(),
            self.snapshot_date.format("%Y-%m-%d").to_string(),
            number_cell(self.min_salary),
            number_cell(self.max_salary),
            number_cell(self.min_experience),
            number_cell(self.max_experience),
            self.posted_days_ago.map(|d| d.to_string()).unwrap_or_default(),
        ]
    }

    /// Salary midpoint, only when both bounds parsed.
    pub fn avg_salary(&self) -> Option<f64> {
        Some((self.min_salary? + self.max_salary?) / 2.0)
    }
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
