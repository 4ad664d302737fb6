use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::model::NormalizedJobRecord;

const PREFIX: &str = "naukri_jobs_";
const MAX_SEQUENCE: u32 = 99;

/// `"Data Scientist (ML)"` → `"data-scientist-ml"`. `+` and `#` are spelled
/// out so `"C++"`, `"C#"` and `"C"` keep separate snapshots.
pub fn keyword_slug(keyword: &str) -> String {
    keyword
        .replace('+', " plus ")
        .replace('#', " sharp ")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// File stem of one snapshot: `naukri_jobs_<slug>_<YYYYMMDD>[_<NN>]`.
///
/// Sequence numbers are zero-padded and the first run of the day has none, so
/// plain string order of stems is also capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotName {
    pub keyword: String,
    pub date: NaiveDate,
    pub sequence: u32,
}

impl SnapshotName {
    pub fn stem(&self) -> String {
        let date = self.date.format("%Y%m%d");
        if self.sequence <= 1 {
            format!("{PREFIX}{}_{date}", self.keyword)
        } else {
            format!("{PREFIX}{}_{date}_{:02}", self.keyword, self.sequence)
        }
    }

    pub fn parse(stem: &str) -> Option<Self> {
        let rest = stem.strip_prefix(PREFIX)?;
        let mut parts = rest.split('_');
        let keyword = parts.next().filter(|k| !k.is_empty())?.to_string();
        let date = NaiveDate::parse_from_str(parts.next()?, "%Y%m%d").ok()?;
        let sequence = match parts.next() {
            Some(seq) if seq.len() == 2 => seq.parse::<u32>().ok().filter(|n| *n >= 2)?,
            Some(_) => return None,
            None => 1,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(SnapshotName { keyword, date, sequence })
    }
}

#[derive(Debug)]
pub struct SavedSnapshot {
    pub name: SnapshotName,
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Write `records` as a CSV + JSON pair. Never touches an existing file: if
/// today's name is taken the next sequence number is used.
pub fn save(dir: &Path, keyword: &str, date: NaiveDate, records: &[NormalizedJobRecord]) -> Result<SavedSnapshot> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let keyword = keyword_slug(keyword);
    anyhow::ensure!(!keyword.is_empty(), "keyword has no letters or digits");

    for sequence in 1..=MAX_SEQUENCE {
        let name = SnapshotName { keyword: keyword.clone(), date, sequence };
        let csv = dir.join(format!("{}.csv", name.stem()));
        let json = dir.join(format!("{}.json", name.stem()));
        if json.exists() {
            continue;
        }
        let Some(csv_file) = create_new(&csv)? else {
            debug!(path = %csv.display(), "snapshot name taken");
            continue;
        };
        let Some(json_file) = create_new(&json)? else {
            // Lost a race for the JSON half; leave the empty CSV so the name stays claimed.
            continue;
        };

        write_csv(csv_file, records).with_context(|| format!("Failed to write {}", csv.display()))?;
        write_json(json_file, records).with_context(|| format!("Failed to write {}", json.display()))?;
        info!(stem = %name.stem(), records = records.len(), "saved snapshot");
        return Ok(SavedSnapshot { name, csv, json });
    }
    anyhow::bail!("more than {} snapshots for {:?} on {}", MAX_SEQUENCE, keyword, date)
}

fn create_new(path: &Path) -> Result<Option<File>> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to create {}", path.display())),
    }
}

fn write_csv(file: File, records: &[NormalizedJobRecord]) -> Result<()> {
    let mut w = BufWriter::new(file);
    w.write_all(to_csv(records).as_bytes())?;
    w.flush()?;
    Ok(())
}

fn write_json(file: File, records: &[NormalizedJobRecord]) -> Result<()> {
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, records)?;
    w.flush()?;
    Ok(())
}

// ── Delimited text ──

/// Header line plus one line per record, comma separated, RFC 4180 quoting.
pub fn to_csv(records: &[NormalizedJobRecord]) -> String {
    let mut out = String::new();
    let header: Vec<String> = NormalizedJobRecord::COLUMNS.iter().map(|c| c.to_string()).collect();
    push_row(&mut out, &header);
    for r in records {
        push_row(&mut out, &r.to_row());
    }
    out
}

fn push_row(out: &mut String, row: &[String]) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

// ── Loading ──

/// Every snapshot (by its JSON file) in `dir`, sorted by stem.
pub fn list(dir: &Path) -> Result<Vec<SnapshotName>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()).and_then(SnapshotName::parse) {
            names.push(name);
        }
    }
    names.sort_by_key(SnapshotName::stem);
    Ok(names)
}

/// Path of the current snapshot for `keyword`: the latest stem whose keyword matches exactly.
pub fn latest(dir: &Path, keyword: &str) -> Result<Option<PathBuf>> {
    let slug = keyword_slug(keyword);
    Ok(list(dir)?
        .into_iter()
        .filter(|n| n.keyword == slug)
        .last()
        .map(|n| dir.join(format!("{}.json", n.stem()))))
}

pub fn load(path: &Path) -> Result<Vec<NormalizedJobRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a snapshot", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOT_SPECIFIED;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn record(title: &str) -> NormalizedJobRecord {
        NormalizedJobRecord {
            job_id: "1".into(),
            title: title.into(),
            company_name: "acme".into(),
            footer_label: NOT_SPECIFIED.into(),
            skills: "Rust, SQL".into(),
            experience: "1 3 years".into(),
            salary: "3 6 lpa".into(),
            location: "pune".into(),
            description: "says \"hi\"".into(),
            snapshot_date: date(1),
            min_salary: Some(300000.0),
            max_salary: Some(600000.0),
            min_experience: Some(1.0),
            max_experience: Some(3.0),
            posted_days_ago: None,
        }
    }

    #[test]
    fn slug() {
        assert_eq!(keyword_slug("Data Scientist"), "data-scientist");
        assert_eq!(keyword_slug("  Go / Rust_dev "), "go-rust-dev");
        assert_eq!(keyword_slug("C++"), "c-plus-plus");
        assert_eq!(keyword_slug("C#"), "c-sharp");
        assert_eq!(keyword_slug("c"), "c");
        assert_eq!(keyword_slug("***"), "");
    }

    #[test]
    fn name_roundtrip_and_order() {
        let first = SnapshotName { keyword: "rust".into(), date: date(9), sequence: 1 };
        let second = SnapshotName { sequence: 2, ..first.clone() };
        assert_eq!(first.stem(), "naukri_jobs_rust_20240709");
        assert_eq!(second.stem(), "naukri_jobs_rust_20240709_02");
        assert_eq!(SnapshotName::parse(&first.stem()), Some(first.clone()));
        assert_eq!(SnapshotName::parse(&second.stem()), Some(second.clone()));
        assert!(format!("{}.json", first.stem()) < format!("{}.json", second.stem()));
        assert_eq!(SnapshotName::parse("naukri_jobs_rust_2024079"), None);
        assert_eq!(SnapshotName::parse("naukri_jobs_rust_20240709_2"), None);
        assert_eq!(SnapshotName::parse("other_rust_20240709"), None);
    }

    #[test]
    fn csv_quotes_and_blanks() {
        let csv = to_csv(&[record("dev")]);
        let mut lines = csv.split("\r\n");
        assert!(lines.next().unwrap().starts_with("Job ID,Job Title,Company Name,"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Rust, SQL\""));
        assert!(row.contains("\"says \"\"hi\"\"\""));
        assert!(row.contains(",Not Specified,"));
        assert!(row.ends_with(",2024-07-01,300000,600000,1,3,"));
    }

    #[test]
    fn save_never_clobbers() {
        let tmp = tempfile::tempdir().unwrap();
        let first = save(tmp.path(), "Rust", date(2), &[record("a")]).unwrap();
        let second = save(tmp.path(), "rust", date(2), &[record("b"), record("c")]).unwrap();
        assert_eq!(first.name.sequence, 1);
        assert_eq!(second.name.sequence, 2);
        assert!(first.csv.exists() && second.csv.exists());
        assert_eq!(load(&first.json).unwrap().len(), 1);
        assert_eq!(load(&second.json).unwrap().len(), 2);
    }

    #[test]
    fn save_and_load_keep_types() {
        let tmp = tempfile::tempdir().unwrap();
        let saved = save(tmp.path(), "rust", date(2), &[record("a")]).unwrap();
        assert_eq!(load(&saved.json).unwrap(), vec![record("a")]);
    }

    #[test]
    fn latest_matches_keyword_exactly() {
        let tmp = tempfile::tempdir().unwrap();
        save(tmp.path(), "dev", date(1), &[record("old")]).unwrap();
        save(tmp.path(), "dev", date(3), &[record("new")]).unwrap();
        save(tmp.path(), "developer", date(5), &[record("other")]).unwrap();

        let path = latest(tmp.path(), "dev").unwrap().unwrap();
        assert_eq!(load(&path).unwrap()[0].title, "new");
        let path = latest(tmp.path(), "developer").unwrap().unwrap();
        assert_eq!(load(&path).unwrap()[0].title, "other");
        assert_eq!(latest(tmp.path(), "tester").unwrap(), None);
        assert_eq!(list(tmp.path()).unwrap().len(), 3);
    }

    #[test]
    fn symbol_keywords_do_not_share_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        save(tmp.path(), "C", date(1), &[record("plain c")]).unwrap();
        let cpp = save(tmp.path(), "C++", date(1), &[record("cpp")]).unwrap();
        assert_eq!(cpp.name.sequence, 1);
        assert_eq!(latest(tmp.path(), "c#").unwrap(), None);
        let path = latest(tmp.path(), "c++").unwrap().unwrap();
        assert_eq!(load(&path).unwrap()[0].title, "cpp");
        let path = latest(tmp.path(), "C").unwrap().unwrap();
        assert_eq!(load(&path).unwrap()[0].title, "plain c");
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list(&tmp.path().join("nope")).unwrap().is_empty());
    }
}
