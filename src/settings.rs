use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://www.naukri.com/jobapi/v3/search";

/// Run settings: built-in defaults, then `job_snapshot.toml` (if present),
/// then `JOB_SNAPSHOT_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub endpoint: String,
    pub results_per_page: u32,
    pub pages: u32,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("job_snapshot").required(false))
                .add_source(Environment::with_prefix("JOB_SNAPSHOT")),
        )
    }

    fn from_config(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .set_default("data_dir", "job_data")?
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("results_per_page", 20)?
            .set_default("pages", 5)?
            .set_default("timeout_secs", 10)?
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults() {
        let s = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("job_data"));
        assert_eq!(s.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(s.results_per_page, 20);
        assert_eq!(s.pages, 5);
        assert_eq!(s.timeout_secs, 10);
    }

    #[test]
    fn file_overrides_defaults() {
        let toml = "data_dir = \"/tmp/snaps\"\npages = 2\n";
        let s = Settings::from_config(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/tmp/snaps"));
        assert_eq!(s.pages, 2);
        assert_eq!(s.results_per_page, 20);
    }
}
