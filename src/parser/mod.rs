pub mod clean;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod numeric;
pub mod payload;
pub mod skills;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{error, info};

use crate::model::NormalizedJobRecord;
use error::ShapeError;

/// Two-step pipeline: page payload → extracted records → normalized records.
pub fn process_page(page: &Value, snapshot_date: NaiveDate) -> Result<Vec<NormalizedJobRecord>, ShapeError> {
    let extracted = extract::extract(page, snapshot_date)?;
    Ok(normalize::normalize(extracted))
}

/// Run a whole capture: pages in the order given, one snapshot date for all.
/// A page with no job list is logged and dropped; the others still go through.
pub fn process_pages(pages: &[(u32, Value)], snapshot_date: NaiveDate) -> Vec<NormalizedJobRecord> {
    let mut records = Vec::new();
    for (page_no, page) in pages {
        match process_page(page, snapshot_date) {
            Ok(page_records) => {
                info!(page = page_no, jobs = page_records.len(), "processed page");
                records.extend(page_records);
            }
            Err(e) => error!(page = page_no, error = %e, "dropping page"),
        }
    }
    records
}
