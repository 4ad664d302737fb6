use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::ShapeError;
use super::payload::{PlaceholderKind, RawJobPayload};
use super::skills;
use crate::model::{ExtractedJobRecord, NOT_AVAILABLE};

/// Pull every job out of one search page. Only a missing `jobDetails` list is
/// an error; a malformed entry is skipped and the rest of the page survives.
pub fn extract(page: &Value, snapshot_date: NaiveDate) -> Result<Vec<ExtractedJobRecord>, ShapeError> {
    let jobs = match page.get("jobDetails") {
        Some(Value::Array(jobs)) => jobs,
        Some(other) => return Err(ShapeError::MissingJobList { found: json_kind(other) }),
        None => return Err(ShapeError::MissingJobList { found: "nothing" }),
    };

    let mut records = Vec::with_capacity(jobs.len());
    for (idx, job) in jobs.iter().enumerate() {
        if !job.is_object() {
            warn!(index = idx, kind = json_kind(job), "skipping job entry that is not an object");
            continue;
        }
        match RawJobPayload::deserialize(job) {
            Ok(raw) => records.push(from_payload(raw, snapshot_date)),
            Err(e) => warn!(index = idx, error = %e, "skipping undecodable job entry"),
        }
    }
    Ok(records)
}

fn from_payload(raw: RawJobPayload, snapshot_date: NaiveDate) -> ExtractedJobRecord {
    let mut experience = None;
    let mut salary = None;
    let mut location = None;
    for placeholder in raw.placeholders {
        let slot = match placeholder.kind {
            PlaceholderKind::Experience => &mut experience,
            PlaceholderKind::Salary => &mut salary,
            PlaceholderKind::Location => &mut location,
        };
        *slot = Some(placeholder.label);
    }

    ExtractedJobRecord {
        job_id: or_na(raw.job_id),
        title: or_na(raw.title),
        company_name: or_na(raw.company_name),
        footer_label: or_na(raw.footer_placeholder_label),
        skills: skills::resolve(&raw.tags_and_skills),
        experience: or_na(experience),
        salary: or_na(salary),
        location: or_na(location),
        description: or_na(raw.job_description),
        snapshot_date,
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn full_entry() {
        let page = json!({
            "jobDetails": [{
                "jobId": "010524500123",
                "title": "Senior Rust Developer",
                "companyName": "Acme Tech",
                "footerPlaceholderLabel": "2 Days Ago",
                "tagsAndSkills": "Rust,Tokio,gRPC",
                "placeholders": [
                    {"type": "experience", "label": "4-8 Yrs"},
                    {"type": "salary", "label": "15-25 Lacs PA"},
                    {"type": "location", "label": "Bengaluru"}
                ],
                "jobDescription": "<p>Build services</p>"
            }]
        });
        let records = extract(&page, date()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.job_id, "010524500123");
        assert_eq!(r.company_name, "Acme Tech");
        assert_eq!(r.skills, "Rust, Tokio, gRPC");
        assert_eq!(r.experience, "4-8 Yrs");
        assert_eq!(r.salary, "15-25 Lacs PA");
        assert_eq!(r.location, "Bengaluru");
        assert_eq!(r.description, "<p>Build services</p>");
        assert_eq!(r.snapshot_date, date());
    }

    #[test]
    fn last_placeholder_of_a_type_wins() {
        let page = json!({
            "jobDetails": [{
                "placeholders": [
                    {"type": "location", "label": "Pune"},
                    {"type": "location", "label": "Hyderabad, Pune"}
                ]
            }]
        });
        let r = &extract(&page, date()).unwrap()[0];
        assert_eq!(r.location, "Hyderabad, Pune");
        assert_eq!(r.salary, NOT_AVAILABLE);
        assert_eq!(r.experience, NOT_AVAILABLE);
    }

    #[test]
    fn absent_fields_are_not_available() {
        let page = json!({ "jobDetails": [{}] });
        let r = &extract(&page, date()).unwrap()[0];
        for field in [
            &r.job_id,
            &r.title,
            &r.company_name,
            &r.footer_label,
            &r.skills,
            &r.experience,
            &r.salary,
            &r.location,
            &r.description,
        ] {
            assert_eq!(field, NOT_AVAILABLE);
        }
    }

    #[test]
    fn missing_job_list_is_a_shape_error() {
        assert_eq!(
            extract(&json!({ "noOfJobs": 0 }), date()),
            Err(ShapeError::MissingJobList { found: "nothing" })
        );
        assert_eq!(
            extract(&json!({ "jobDetails": null }), date()),
            Err(ShapeError::MissingJobList { found: "null" })
        );
        assert!(extract(&json!([1, 2]), date()).is_err());
    }

    #[test]
    fn empty_job_list_is_fine() {
        assert!(extract(&json!({ "jobDetails": [] }), date()).unwrap().is_empty());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let page = json!({ "jobDetails": ["oops", [1], {"title": "QA Engineer"}] });
        let records = extract(&page, date()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "QA Engineer");
    }
}
