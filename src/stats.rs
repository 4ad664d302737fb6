use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use itertools::Itertools;

use crate::model::{NormalizedJobRecord, NOT_SPECIFIED};
use crate::parser::clean::clean_text;

const EXPERIENCE_BINS: [(&str, f64, f64); 7] = [
    ("0-2", 0.0, 2.0),
    ("3-5", 2.0, 5.0),
    ("6-8", 5.0, 8.0),
    ("9-12", 8.0, 12.0),
    ("13-15", 12.0, 15.0),
    ("16-20", 15.0, 20.0),
    ("20+", 20.0, 30.0),
];
const BIN_SALARY_FLOOR: f64 = 100_000.0;
const BIN_SALARY_CEILING: f64 = 5_000_000.0;

/// Row filters. An absent minimum counts as 0 and an absent maximum as
/// unbounded, so a finite upper limit drops records whose maximum never parsed.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub within_days: Option<u64>,
    pub min_salary: f64,
    pub max_salary: Option<f64>,
    pub min_experience: f64,
    pub max_experience: Option<f64>,
    pub locations: Vec<String>,
    pub companies: Vec<String>,
}

pub fn apply(records: &[NormalizedJobRecord], filters: &Filters, today: NaiveDate) -> Vec<NormalizedJobRecord> {
    let cutoff = filters
        .within_days
        .and_then(|days| today.checked_sub_days(Days::new(days)));
    let locations: HashSet<String> = filters.locations.iter().map(|l| clean_text(l)).collect();
    let companies: HashSet<String> = filters.companies.iter().map(|c| clean_text(c)).collect();

    records
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.snapshot_date >= c))
        .filter(|r| locations.is_empty() || locations.contains(&r.location))
        .filter(|r| companies.is_empty() || companies.contains(&r.company_name))
        .filter(|r| in_range(r.min_salary, r.max_salary, filters.min_salary, filters.max_salary))
        .filter(|r| {
            in_range(
                r.min_experience,
                r.max_experience,
                filters.min_experience,
                filters.max_experience,
            )
        })
        .cloned()
        .collect()
}

fn in_range(min: Option<f64>, max: Option<f64>, lo: f64, hi: Option<f64>) -> bool {
    let min = min.unwrap_or(0.0);
    let max = max.unwrap_or(f64::INFINITY);
    min >= lo && hi.map_or(true, |hi| max <= hi)
}

// ── Summary ──

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryStats {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_jobs: usize,
    pub avg_min_salary: Option<f64>,
    pub avg_min_experience: Option<f64>,
    pub unique_companies: usize,
    /// Over each record's salary midpoint.
    pub salary: Option<SalaryStats>,
    pub salary_by_experience: Vec<(&'static str, f64)>,
    /// Median min salary for the most common locations among salaried records.
    pub salary_by_location: Vec<(String, f64)>,
    /// Jobs per capture date, oldest first. Empty with fewer than two dates.
    pub posting_trend: Vec<(NaiveDate, usize)>,
    pub top_companies: Vec<(String, usize)>,
    pub top_locations: Vec<(String, usize)>,
    pub top_titles: Vec<(String, usize)>,
    pub top_skills: Vec<(String, usize)>,
}

pub fn summarize(records: &[NormalizedJobRecord], top_n: usize) -> Summary {
    let midpoints: Vec<f64> = records.iter().filter_map(NormalizedJobRecord::avg_salary).collect();
    let salary = (!midpoints.is_empty()).then(|| SalaryStats {
        mean: mean(&midpoints).unwrap_or_default(),
        median: median(&midpoints).unwrap_or_default(),
        mode: mode(&midpoints).unwrap_or_default(),
    });

    let skills = records
        .iter()
        .filter(|r| r.skills != NOT_SPECIFIED)
        .flat_map(|r| r.skills.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    Summary {
        total_jobs: records.len(),
        avg_min_salary: mean(&records.iter().filter_map(|r| r.min_salary).collect::<Vec<_>>()),
        avg_min_experience: mean(&records.iter().filter_map(|r| r.min_experience).collect::<Vec<_>>()),
        unique_companies: records.iter().map(|r| &r.company_name).unique().count(),
        salary,
        salary_by_experience: salary_by_experience(records),
        salary_by_location: salary_by_location(records, top_n),
        posting_trend: posting_trend(records),
        top_companies: top_counts(records.iter().map(|r| r.company_name.as_str()), top_n),
        top_locations: top_counts(records.iter().map(|r| r.location.as_str()), top_n),
        top_titles: top_counts(records.iter().map(|r| r.title.as_str()), top_n),
        top_skills: top_counts(skills, top_n),
    }
}

/// Median minimum salary per experience band, bands without data left out.
/// Bands are open below, so a record with 0 years falls in none of them.
fn salary_by_experience(records: &[NormalizedJobRecord]) -> Vec<(&'static str, f64)> {
    let points: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| Some((r.min_experience?, r.min_salary?)))
        .filter(|(exp, sal)| {
            (0.0..=30.0).contains(exp) && (BIN_SALARY_FLOOR..=BIN_SALARY_CEILING).contains(sal)
        })
        .collect();

    EXPERIENCE_BINS
        .iter()
        .filter_map(|(label, lo, hi)| {
            let salaries: Vec<f64> = points
                .iter()
                .filter(|(exp, _)| *exp > *lo && *exp <= *hi)
                .map(|(_, sal)| *sal)
                .collect();
            median(&salaries).map(|m| (*label, m))
        })
        .collect()
}

fn salary_by_location(records: &[NormalizedJobRecord], top_n: usize) -> Vec<(String, f64)> {
    let salaried: Vec<(&str, f64)> = records
        .iter()
        .filter_map(|r| Some((r.location.as_str(), r.min_salary?)))
        .collect();

    top_counts(salaried.iter().map(|(loc, _)| *loc), top_n)
        .into_iter()
        .filter_map(|(location, _)| {
            let salaries: Vec<f64> = salaried
                .iter()
                .filter(|(loc, _)| *loc == location)
                .map(|(_, sal)| *sal)
                .collect();
            median(&salaries).map(|m| (location, m))
        })
        .collect()
}

fn posting_trend(records: &[NormalizedJobRecord]) -> Vec<(NaiveDate, usize)> {
    let trend: Vec<(NaiveDate, usize)> = records
        .iter()
        .map(|r| r.snapshot_date)
        .counts()
        .into_iter()
        .sorted()
        .collect();
    if trend.len() < 2 {
        return Vec::new();
    }
    trend
}

fn top_counts<'a>(values: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<(String, usize)> {
    values
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .take(top_n)
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties go to the smallest.
fn mode(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .sorted_by(f64::total_cmp)
        .dedup_with_count()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.total_cmp(&a.1)))
        .map(|(_, value)| value)
}

// ── Rendering ──

pub fn render_markdown(keyword: &str, summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Job market: {}\n", keyword));
    out.push_str(&format!("- Total jobs: {}\n", summary.total_jobs));
    out.push_str(&format!(
        "- Average min salary: {}\n",
        summary.avg_min_salary.map(format_inr).unwrap_or_else(|| "N/A".into())
    ));
    out.push_str(&format!(
        "- Average experience: {}\n",
        summary
            .avg_min_experience
            .map(|e| format!("{:.1} years", e))
            .unwrap_or_else(|| "N/A".into())
    ));
    out.push_str(&format!("- Unique companies: {}\n", summary.unique_companies));

    out.push_str("\n### Salary (midpoint)\n");
    match &summary.salary {
        Some(s) => {
            out.push_str(&format!("- Mean: {}\n", format_inr(s.mean)));
            out.push_str(&format!("- Median: {}\n", format_inr(s.median)));
            out.push_str(&format!("- Mode: {}\n", format_inr(s.mode)));
        }
        None => out.push_str("- No parsed salaries\n"),
    }

    out.push_str("\n### Median salary by experience\n");
    if summary.salary_by_experience.is_empty() {
        out.push_str("- Not enough data\n");
    }
    for (band, salary) in &summary.salary_by_experience {
        out.push_str(&format!("- {} years: {}\n", band, format_inr(*salary)));
    }

    out.push_str("\n### Median salary by location\n");
    if summary.salary_by_location.is_empty() {
        out.push_str("- Not enough data\n");
    }
    for (location, salary) in &summary.salary_by_location {
        out.push_str(&format!("- {}: {}\n", location, format_inr(*salary)));
    }

    out.push_str("\n### Jobs per capture date\n");
    if summary.posting_trend.is_empty() {
        out.push_str("- Not enough date points\n");
    }
    for (date, count) in &summary.posting_trend {
        out.push_str(&format!("- {}: {}\n", date, count));
    }

    for (heading, rows) in [
        ("Top companies", &summary.top_companies),
        ("Top locations", &summary.top_locations),
        ("Top job titles", &summary.top_titles),
        ("Top skills", &summary.top_skills),
    ] {
        out.push_str(&format!("\n### {}\n", heading));
        for (value, count) in rows {
            out.push_str(&format!("- {}: {}\n", value, count));
        }
    }
    out
}

/// Rupee amount in crore / lakh notation.
pub fn format_inr(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("₹{:.1} Cr", value / 10_000_000.0)
    } else if value >= 100_000.0 {
        format!("₹{:.1} L", value / 100_000.0)
    } else {
        format!("₹{}", group_thousands(value.round() as i64))
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
