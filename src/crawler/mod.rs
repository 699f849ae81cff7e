//! Fetching and processing of seed URLs
//!
//! - HTTP fetching with per-domain headers and cookies
//! - The [`Pipeline`] that turns a fetched document into an artifact
//! - [`run_scrape`], which processes every configured seed concurrently
//!
//! Links found on a page are reported in its [`PageReport`], never fetched.

mod fetcher;
mod pipeline;

pub use fetcher::{build_http_client, domain_headers, fetch_url, FetchResult};
pub use pipeline::{Pipeline, SavedArtifact};

use crate::config::{Config, DomainConfig};
use crate::url::extract_domain;
use crate::{Result, ScribeError};
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Outcome for one seed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageReport {
    /// Artifact written
    Saved {
        url: String,
        path: PathBuf,
        /// Filtered links found on the page
        links: Vec<String>,
    },
    /// Already processed in this run or artifact still fresh
    Skipped { url: String },
    /// Fetch, extraction or write failed; the URL stays eligible
    Failed { url: String, error: String },
}

impl PageReport {
    pub fn url(&self) -> &str {
        match self {
            Self::Saved { url, .. } | Self::Skipped { url } | Self::Failed { url, .. } => url,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Fetches and processes every seed of the configuration
///
/// At most `crawler.parallel` seeds are in flight at once. Per-page failures
/// are reported, never returned as errors; an error means the run could not
/// start. Reports come back in seed order.
pub async fn run_scrape(config: &Config) -> Result<Vec<PageReport>> {
    let client = build_http_client(
        &config.user_agent,
        Duration::from_secs(config.crawler.timeout_secs),
    )?;
    let pipeline = Arc::new(Pipeline::from_config(config)?);
    let domains = Arc::new(config.domains.clone());
    let semaphore = Arc::new(Semaphore::new(config.crawler.parallel.max(1) as usize));

    tracing::info!(
        seeds = config.crawler.seeds.len(),
        parallel = config.crawler.parallel,
        "Starting scrape"
    );

    let mut tasks = JoinSet::new();
    for (index, seed) in config.crawler.seeds.iter().enumerate() {
        let client = client.clone();
        let pipeline = Arc::clone(&pipeline);
        let domains = Arc::clone(&domains);
        let semaphore = Arc::clone(&semaphore);
        let url = seed.clone();

        tasks.spawn(async move {
            let report = match semaphore.acquire_owned().await {
                Ok(_permit) => scrape_page(&client, &pipeline, &domains, url).await,
                Err(e) => PageReport::Failed {
                    url,
                    error: e.to_string(),
                },
            };
            (index, report)
        });
    }

    let mut reports = Vec::with_capacity(config.crawler.seeds.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, report) = joined.map_err(|e| ScribeError::Task(e.to_string()))?;
        reports.push((index, report));
    }
    reports.sort_by_key(|(index, _)| *index);
    let reports: Vec<PageReport> = reports.into_iter().map(|(_, r)| r).collect();

    let saved = reports.iter().filter(|r| r.is_saved()).count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r, PageReport::Skipped { .. }))
        .count();
    tracing::info!(
        saved,
        skipped,
        failed = reports.len() - saved - skipped,
        "Scrape finished"
    );

    Ok(reports)
}

/// Request settings configured for the host of `url`
fn domain_config<'a>(domains: &'a HashMap<String, DomainConfig>, url: &str) -> Option<&'a DomainConfig> {
    let host = Url::parse(url).ok().as_ref().and_then(extract_domain)?;
    domains
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(&host))
        .map(|(_, domain)| domain)
}

async fn scrape_page(
    client: &Client,
    pipeline: &Arc<Pipeline>,
    domains: &HashMap<String, DomainConfig>,
    url: String,
) -> PageReport {
    if !pipeline.claim(&url) {
        tracing::debug!(url = %url, "Skipping already satisfied URL");
        return PageReport::Skipped { url };
    }

    tracing::debug!(url = %url, "Fetching");
    let (final_url, body) = match fetch_url(client, &url, domain_config(domains, &url)).await {
        FetchResult::Success { final_url, body, .. } => (final_url, body),
        failed => {
            pipeline.abandon(&url);
            let message = failed.failure_message().unwrap_or_default();
            tracing::warn!(url = %url, error = %message, "Fetch failed");
            let error = ScribeError::Fetch {
                url: url.clone(),
                message,
            }
            .to_string();
            return PageReport::Failed { url, error };
        }
    };

    let worker = Arc::clone(pipeline);
    let requested = url.clone();
    let processed =
        tokio::task::spawn_blocking(move || worker.process_fetched(&requested, &final_url, &body))
            .await;

    match processed {
        Ok(Ok(saved)) => PageReport::Saved {
            url,
            path: saved.path,
            links: saved.links.into_iter().map(String::from).collect(),
        },
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "Processing failed");
            PageReport::Failed {
                url,
                error: e.to_string(),
            }
        }
        Err(join_error) => {
            pipeline.abandon(&url);
            let error = ScribeError::Task(join_error.to_string()).to_string();
            tracing::warn!(url = %url, error = %error, "Processing task failed");
            PageReport::Failed { url, error }
        }
    }
}
