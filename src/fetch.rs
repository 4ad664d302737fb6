use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{info, warn};

use crate::settings::Settings;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Fetch stats returned after completion.
pub struct FetchStats {
    pub requested: u32,
    pub ok: u32,
    pub errors: u32,
}

/// Fetch search pages `1..=pages` one after another. A page that fails is
/// logged and left out; the returned pages stay in fetch order.
pub async fn fetch_pages(
    settings: &Settings,
    keyword: &str,
    pages: u32,
) -> Result<(Vec<(u32, Value)>, FetchStats)> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let pb = ProgressBar::new(pages as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );

    let mut fetched = Vec::with_capacity(pages as usize);
    let mut errors = 0;
    for page_no in 1..=pages {
        let start = Instant::now();
        match fetch_one(&client, settings, keyword, page_no).await {
            Ok(body) => {
                info!(
                    page = page_no,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "fetched page"
                );
                fetched.push((page_no, body));
            }
            Err(e) => {
                warn!("Error fetching page {}: {:#}", page_no, e);
                errors += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let stats = FetchStats {
        requested: pages,
        ok: fetched.len() as u32,
        errors,
    };
    Ok((fetched, stats))
}

async fn fetch_one(
    client: &reqwest::Client,
    settings: &Settings,
    keyword: &str,
    page_no: u32,
) -> Result<Value> {
    let response = client
        .get(&settings.endpoint)
        .headers(search_headers(keyword)?)
        .query(&search_params(keyword, settings.results_per_page, page_no))
        .send()
        .await
        .context("request failed")?;

    let status = response.status();
    if !status.is_success() {
        bail!("search API returned status {}", status);
    }
    response.json::<Value>().await.context("response body is not JSON")
}

fn search_headers(keyword: &str) -> Result<reqwest::header::HeaderMap> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("appid", HeaderValue::from_static("109"));
    headers.insert("systemid", HeaderValue::from_static("Naukri"));
    headers.insert("clientid", HeaderValue::from_static("d3skt0p"));
    headers.insert(
        REFERER,
        HeaderValue::from_str(&format!(
            "https://www.naukri.com/{}-jobs?k={}",
            keyword_path(keyword),
            keyword
        ))
        .context("keyword cannot be sent in a header")?,
    );
    Ok(headers)
}

fn search_params(keyword: &str, results_per_page: u32, page_no: u32) -> Vec<(&'static str, String)> {
    vec![
        ("noOfResults", results_per_page.to_string()),
        ("urlType", "search_by_keyword".to_string()),
        ("searchType", "adv".to_string()),
        ("keyword", keyword.to_string()),
        ("pageNo", page_no.to_string()),
        ("sort", "r".to_string()),
        ("k", keyword.to_string()),
        ("seoKey", format!("{}-jobs-{}", keyword_path(keyword), page_no)),
        ("src", "jobsearchDesk".to_string()),
    ]
}

fn keyword_path(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_carry_page_and_keyword() {
        let params = search_params("Data Scientist", 20, 3);
        let get = |k: &str| params.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("pageNo"), Some("3"));
        assert_eq!(get("noOfResults"), Some("20"));
        assert_eq!(get("keyword"), Some("Data Scientist"));
        assert_eq!(get("seoKey"), Some("data-scientist-jobs-3"));
    }

    #[test]
    fn headers_identify_the_client() {
        let headers = search_headers("rust").unwrap();
        assert_eq!(headers["appid"], "109");
        assert_eq!(headers["systemid"], "Naukri");
        assert_eq!(headers[reqwest::header::REFERER], "https://www.naukri.com/rust-jobs?k=rust");
    }
}
