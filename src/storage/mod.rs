//! Storage module for persisting artifacts
//!
//! Renders a processed document into its Markdown artifact and writes it
//! atomically below the output root. Writes to distinct paths are
//! independent; two writers on the same path resolve to last-writer-wins.

use chrono::{DateTime, SecondsFormat, Utc};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while writing artifacts or the artifact index
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to move artifact into place at {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },

    #[error("Artifact index error at {path}: {source}")]
    Index { path: PathBuf, source: io::Error },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Formats a processing timestamp as RFC 3339 UTC with second precision
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Renders the artifact document
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use page_scribe::storage::render_artifact;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let doc = render_artifact("Intro", "https://example.com/intro", "Hello", at);
/// assert!(doc.starts_with("# Intro\n\n## Metadata\n- URL: https://example.com/intro\n"));
/// ```
pub fn render_artifact(title: &str, url: &str, body: &str, scraped_at: DateTime<Utc>) -> String {
    format!(
        "# {}\n\n## Metadata\n- URL: {}\n- Scraped: {}\n\n## Content\n{}\n",
        title,
        url,
        format_timestamp(scraped_at),
        body
    )
}

/// Creates a directory and its parents
pub fn ensure_dir(dir: &Path) -> StorageResult<()> {
    std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `content` to `path` through a temporary file in the same directory
///
/// Missing parent directories are created. Readers never observe a partially
/// written artifact.
pub fn write_artifact(path: &Path, content: &str) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let write_err = |source: io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;

    tmp.persist(path).map_err(|e| StorageError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Artifact written");
    Ok(())
}
