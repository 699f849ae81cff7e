//! Crawl dedup cache
//!
//! Decides whether a URL has to be fetched again and where its artifact
//! lives. The visited map is the only state shared between workers; every
//! transition on it happens under one lock, so a URL is processed at most
//! once per run.
//!
//! Which artifact belongs to which URL is remembered across runs in an
//! append-only index file below the output root. An entry is only written
//! after the artifact itself was written.

mod filename;

pub use filename::{
    derive_filename, hash_fallback, sanitize_filename, FALLBACK_HASH_LEN, MAX_FILENAME_LEN,
};

use crate::config::OutputConfig;
use crate::storage::{ensure_dir, StorageError, StorageResult};
use crate::url::visit_key;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

/// Name of the artifact index file in the output root
pub const INDEX_FILE: &str = ".page-scribe-index";

/// State of a URL in the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// A worker is fetching or processing the URL
    Claimed,
    /// The artifact was written
    Saved,
}

/// Visited set, rescrape policy and artifact locations
#[derive(Debug)]
pub struct CrawlCache {
    output_root: PathBuf,
    rescrape_after: Duration,
    force: bool,
    visited: Mutex<HashMap<String, VisitState>>,
    artifacts: Mutex<HashMap<String, PathBuf>>,
}

impl CrawlCache {
    /// Creates a cache with no knowledge of earlier runs
    pub fn new(output_root: impl Into<PathBuf>, rescrape_after: Duration, force: bool) -> Self {
        Self {
            output_root: output_root.into(),
            rescrape_after,
            force,
            visited: Mutex::new(HashMap::new()),
            artifacts: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a cache and loads the artifact index of earlier runs
    ///
    /// A missing index is not an error.
    pub fn open(
        output_root: impl Into<PathBuf>,
        rescrape_after: Duration,
        force: bool,
    ) -> StorageResult<Self> {
        let cache = Self::new(output_root, rescrape_after, force);
        let index_path = cache.index_path();

        match fs::read_to_string(&index_path) {
            Ok(content) => {
                let entries = parse_index(&content);
                tracing::debug!(
                    path = %index_path.display(),
                    entries = entries.len(),
                    "Loaded artifact index"
                );
                *cache.artifacts() = entries;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Index {
                    path: index_path,
                    source,
                })
            }
        }

        Ok(cache)
    }

    /// Opens the cache described by the `[output]` settings
    pub fn from_config(config: &OutputConfig) -> StorageResult<Self> {
        Self::open(&config.directory, config.rescrape_after, config.force)
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn rescrape_after(&self) -> Duration {
        self.rescrape_after
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_root.join(INDEX_FILE)
    }

    /// `{output_root}/{source_id}/{derived_name}.md`
    pub fn resolve_artifact_path(&self, source_id: &str, derived_name: &str) -> PathBuf {
        self.output_root
            .join(source_id)
            .join(format!("{}.md", derived_name))
    }

    /// Artifact recorded for a URL by this or an earlier run
    pub fn artifact_for(&self, url: &str) -> Option<PathBuf> {
        self.artifacts().get(&visit_key(url)).cloned()
    }

    /// True when the URL does not need to be processed
    ///
    /// Never true with force enabled. Otherwise true when the URL was already
    /// seen in this run or its artifact is younger than the rescrape interval.
    pub fn should_skip(&self, url: &str) -> bool {
        if self.force {
            return false;
        }
        let key = visit_key(url);
        self.visited().contains_key(&key) || self.has_fresh_artifact(&key)
    }

    /// Reserves a URL for processing
    ///
    /// Returns false when the URL is already claimed or saved in this run
    /// (force does not change that) or when it should be skipped. Check and
    /// insert happen under the same lock.
    pub fn claim(&self, url: &str) -> bool {
        let key = visit_key(url);
        let mut visited = self.visited();
        if visited.contains_key(&key) {
            return false;
        }
        if !self.force && self.has_fresh_artifact(&key) {
            return false;
        }
        visited.insert(key, VisitState::Claimed);
        true
    }

    /// Drops a claim so a later attempt may process the URL again
    ///
    /// Saved URLs stay saved.
    pub fn release(&self, url: &str) {
        let key = visit_key(url);
        let mut visited = self.visited();
        if visited.get(&key) == Some(&VisitState::Claimed) {
            visited.remove(&key);
        }
    }

    /// Marks a URL as saved in this run
    ///
    /// Returns true when this call made the transition; false when the URL
    /// was already saved.
    pub fn mark_visited(&self, url: &str) -> bool {
        let previous = self.visited().insert(visit_key(url), VisitState::Saved);
        previous != Some(VisitState::Saved)
    }

    pub fn visit_state(&self, url: &str) -> Option<VisitState> {
        self.visited().get(&visit_key(url)).copied()
    }

    /// Remembers the artifact of a URL and appends it to the index
    pub fn record_artifact(&self, url: &str, path: &Path) -> StorageResult<()> {
        let key = visit_key(url);
        let index_path = self.index_path();
        ensure_dir(&self.output_root)?;

        let index_err = |source: io::Error| StorageError::Index {
            path: index_path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&index_path)
            .map_err(index_err)?;
        writeln!(file, "{}\t{}", key, path.display()).map_err(index_err)?;

        self.artifacts().insert(key, path.to_path_buf());
        Ok(())
    }

    fn has_fresh_artifact(&self, key: &str) -> bool {
        let Some(path) = self.artifacts().get(key).cloned() else {
            return false;
        };
        self.is_fresh(&path)
    }

    /// True when the file exists and is younger than the rescrape interval
    ///
    /// A failed stat counts as a missing file. A modification time in the
    /// future counts as age zero.
    fn is_fresh(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "Artifact not usable");
                return false;
            }
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        age < self.rescrape_after
    }

    fn visited(&self) -> MutexGuard<'_, HashMap<String, VisitState>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn artifacts(&self) -> MutexGuard<'_, HashMap<String, PathBuf>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses index lines `key<TAB>path`; later lines win, malformed ones are skipped
fn parse_index(content: &str) -> HashMap<String, PathBuf> {
    content
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter(|(key, path)| !key.is_empty() && !path.is_empty())
        .map(|(key, path)| (key.to_string(), PathBuf::from(path)))
        .collect()
}
