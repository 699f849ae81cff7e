//! Document pipeline
//!
//! Glues extraction, the dedup cache and artifact storage together for one
//! fetched document: extract, derive the artifact path, write, then mark the
//! URL visited and record the artifact. Cache state only changes after the
//! write succeeded.

use crate::cache::{derive_filename, CrawlCache};
use crate::config::Config;
use crate::extract::{Extractor, PatternRegistry};
use crate::storage::{render_artifact, write_artifact};
use crate::url::{extract_domain, LinkFilter};
use crate::{Result, UrlError};
use chrono::Utc;
use scraper::Html;
use std::path::{Path, PathBuf};
use url::Url;

/// A document that was written to disk
#[derive(Debug, Clone)]
pub struct SavedArtifact {
    /// URL the document was fetched from
    pub url: String,
    pub title: String,
    pub path: PathBuf,
    /// Resolved and filtered links found in the document
    pub links: Vec<Url>,
}

/// Extraction, caching and storage for fetched documents
#[derive(Debug)]
pub struct Pipeline {
    extractor: Extractor,
    cache: CrawlCache,
    filter: LinkFilter,
}

impl Pipeline {
    pub fn new(extractor: Extractor, cache: CrawlCache, filter: LinkFilter) -> Self {
        Self {
            extractor,
            cache,
            filter,
        }
    }

    /// Builds a pipeline from a validated configuration
    ///
    /// Loads the artifact index of earlier runs from the output directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = PatternRegistry::from_rules(&config.rules)?;
        let cache = CrawlCache::from_config(&config.output)?;
        let filter = LinkFilter::from_config(&config.crawler)?;
        tracing::debug!(
            rules = registry.len(),
            output = %cache.output_root().display(),
            "Pipeline ready"
        );
        Ok(Self::new(Extractor::new(registry), cache, filter))
    }

    pub fn cache(&self) -> &CrawlCache {
        &self.cache
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Reserves a URL before it is fetched; false when it must be skipped
    pub fn claim(&self, url: &str) -> bool {
        self.cache.claim(url)
    }

    /// Gives up a claimed URL after a failed fetch
    pub fn abandon(&self, url: &str) {
        self.cache.release(url);
    }

    /// Processes a document fetched from a claimed URL
    pub fn process_document(&self, url: &str, html: &str) -> Result<SavedArtifact> {
        self.process_fetched(url, url, html)
    }

    /// Processes a document that `requested` redirected to `final_url`
    ///
    /// The artifact is named after the final URL and recorded for both. On
    /// failure the claim on `requested` is released and nothing is recorded.
    pub fn process_fetched(&self, requested: &str, final_url: &str, html: &str) -> Result<SavedArtifact> {
        let saved = match self.save(final_url, html) {
            Ok(saved) => saved,
            Err(e) => {
                self.cache.release(requested);
                return Err(e);
            }
        };

        self.remember(final_url, &saved.path);
        if requested != final_url {
            self.remember(requested, &saved.path);
        }

        tracing::info!(
            url = %final_url,
            path = %saved.path.display(),
            links = saved.links.len(),
            "Saved artifact"
        );
        Ok(saved)
    }

    /// Claims and processes a document in one step
    ///
    /// Returns `Ok(None)` when the URL is skipped.
    pub fn run_document(&self, url: &str, html: &str) -> Result<Option<SavedArtifact>> {
        if !self.claim(url) {
            tracing::debug!(url = %url, "Skipping already satisfied URL");
            return Ok(None);
        }
        self.process_document(url, html).map(Some)
    }

    fn save(&self, url: &str, html: &str) -> Result<SavedArtifact> {
        let page_url = Url::parse(url)?;
        let source_id = extract_domain(&page_url).ok_or(UrlError::MissingDomain)?;

        let extraction = {
            let document = Html::parse_document(html);
            self.extractor.extract(&source_id, &document, page_url.path())
        };

        let name = derive_filename(&extraction.title, url);
        let path = self.cache.resolve_artifact_path(&source_id, &name);
        let content = render_artifact(&extraction.title, url, &extraction.markdown, Utc::now());
        write_artifact(&path, &content)?;

        let links = self.filter.filter_links(&page_url, extraction.links.hrefs());

        Ok(SavedArtifact {
            url: url.to_string(),
            title: extraction.title,
            path,
            links,
        })
    }

    /// Marks a URL saved and indexes its artifact
    ///
    /// The artifact already exists at this point, so an index failure only
    /// costs a refetch in a later run.
    fn remember(&self, url: &str, path: &Path) {
        self.cache.mark_visited(url);
        if let Err(e) = self.cache.record_artifact(url, path) {
            tracing::warn!(url = %url, error = %e, "Failed to update artifact index");
        }
    }
}
