use rayon::prelude::*;

use super::clean::{clean_text, is_blank};
use super::numeric::{parse_experience, parse_posted_days, parse_salary};
use crate::model::{ExtractedJobRecord, NormalizedJobRecord, NOT_SPECIFIED};

/// Normalize a batch. Records are independent, so they are spread across the
/// rayon pool; output order matches input order.
pub fn normalize(records: Vec<ExtractedJobRecord>) -> Vec<NormalizedJobRecord> {
    records.into_par_iter().map(normalize_one).collect()
}

pub fn normalize_one(record: ExtractedJobRecord) -> NormalizedJobRecord {
    // Numbers come from the raw labels: cleaning drops the decimal point in "2.5 Cr".
    let salary = parse_salary(&record.salary);
    let experience = parse_experience(&record.experience);
    let footer_label = text_field(&record.footer_label);
    let posted_days_ago = parse_posted_days(&footer_label);

    NormalizedJobRecord {
        job_id: text_field(&record.job_id),
        title: text_field(&record.title),
        company_name: text_field(&record.company_name),
        footer_label,
        skills: skills_field(record.skills),
        experience: text_field(&record.experience),
        salary: text_field(&record.salary),
        location: text_field(&record.location),
        description: text_field(&record.description),
        snapshot_date: record.snapshot_date,
        min_salary: salary.map(|(min, _)| min),
        max_salary: salary.map(|(_, max)| max),
        min_experience: experience.map(|(min, _)| min),
        max_experience: experience.map(|(_, max)| max),
        posted_days_ago,
    }
}

fn text_field(raw: &str) -> String {
    let cleaned = clean_text(raw);
    if is_blank(raw, &cleaned) {
        NOT_SPECIFIED.to_string()
    } else {
        cleaned
    }
}

// Skills are already tokenized and keep their original spelling.
fn skills_field(skills: String) -> String {
    if is_blank(&skills, skills.trim()) {
        NOT_SPECIFIED.to_string()
    } else {
        skills
    }
}
