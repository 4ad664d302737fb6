mod fetch;
mod model;
mod parser;
mod settings;
mod snapshot;
mod stats;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;

use model::NormalizedJobRecord;
use settings::Settings;

#[derive(Parser)]
#[command(name = "job_snapshot", about = "Naukri job search snapshots: fetch, normalize, summarize")]
struct Cli {
    /// Snapshot directory (overrides settings)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch search pages for a keyword and save a normalized snapshot
    Scrape {
        keyword: String,
        /// Number of result pages to fetch
        #[arg(short, long)]
        pages: Option<u32>,
    },
    /// Normalize saved raw search-page JSON files into a snapshot
    Process {
        keyword: String,
        /// Raw page payloads, in page order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Summarize the current snapshot for a keyword
    Stats {
        keyword: String,
        /// Only records captured in the last N days
        #[arg(long)]
        days: Option<u64>,
        #[arg(long, default_value_t = 0.0)]
        min_salary: f64,
        #[arg(long)]
        max_salary: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        min_exp: f64,
        #[arg(long)]
        max_exp: Option<f64>,
        /// Keep only these locations (repeatable)
        #[arg(long = "location")]
        locations: Vec<String>,
        /// Keep only these companies (repeatable)
        #[arg(long = "company")]
        companies: Vec<String>,
        /// Rows per top-N list
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },
    /// List saved snapshots per keyword
    Snapshots,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    info!(data_dir = %settings.data_dir.display(), "settings loaded");

    // One capture date for the whole run.
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Scrape { keyword, pages } => {
            let pages = pages.unwrap_or(settings.pages);
            println!("Fetching {} pages for {:?}...", pages, keyword);
            let (fetched, fetch_stats) = fetch::fetch_pages(&settings, &keyword, pages).await?;
            println!(
                "Fetched {} pages ({} ok, {} errors)",
                fetch_stats.requested, fetch_stats.ok, fetch_stats.errors
            );
            let records = parser::process_pages(&fetched, today);
            save_snapshot(&settings, &keyword, today, &records)?;
        }
        Commands::Process { keyword, files } => {
            let mut pages = Vec::with_capacity(files.len());
            for (i, path) in files.iter().enumerate() {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let page: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("{} is not JSON", path.display()))?;
                pages.push((i as u32 + 1, page));
            }
            let records = parser::process_pages(&pages, today);
            save_snapshot(&settings, &keyword, today, &records)?;
        }
        Commands::Stats {
            keyword,
            days,
            min_salary,
            max_salary,
            min_exp,
            max_exp,
            locations,
            companies,
            top,
        } => {
            let Some(path) = snapshot::latest(&settings.data_dir, &keyword)? else {
                println!("No snapshot for {:?}. Run 'scrape' first.", keyword);
                return Ok(());
            };
            let records = snapshot::load(&path)?;
            println!("Loaded {} records from {}\n", records.len(), path.display());

            let filters = stats::Filters {
                within_days: days,
                min_salary,
                max_salary,
                min_experience: min_exp,
                max_experience: max_exp,
                locations,
                companies,
            };
            let filtered = stats::apply(&records, &filters, today);
            if filtered.is_empty() {
                println!("No records match the filters.");
                return Ok(());
            }
            println!("{}", stats::render_markdown(&keyword, &stats::summarize(&filtered, top)));
        }
        Commands::Snapshots => {
            let names = snapshot::list(&settings.data_dir)?;
            if names.is_empty() {
                println!("No snapshots in {}", settings.data_dir.display());
                return Ok(());
            }
            for (keyword, group) in &names.iter().group_by(|n| n.keyword.clone()) {
                let stems: Vec<String> = group.map(|n| n.stem()).collect();
                println!("{}:", keyword);
                for (i, stem) in stems.iter().enumerate() {
                    let marker = if i + 1 == stems.len() { " (current)" } else { "" };
                    println!("  {}{}", stem, marker);
                }
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn save_snapshot(
    settings: &Settings,
    keyword: &str,
    today: NaiveDate,
    records: &[NormalizedJobRecord],
) -> Result<()> {
    if records.is_empty() {
        println!("No job records extracted; nothing saved.");
        return Ok(());
    }
    let saved = snapshot::save(&settings.data_dir, keyword, today, records)?;
    println!(
        "Saved {} records as {} ({} and {})",
        records.len(),
        saved.name.stem(),
        saved.csv.display(),
        saved.json.display()
    );
    Ok(())
}
