//! Error types for the migration pipeline.
//!
//! Per-post failures are represented here so the orchestrator can decide which
//! ones skip a post, which ones count as failures, and which ones abort the
//! whole run.

use std::path::PathBuf;

/// Error type for migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
  /// Network or HTTP failure that survived every retry attempt.
  #[error("Failed to fetch {url} after {attempts} attempt(s): {message}")]
  Fetch { url: String, attempts: u32, message: String },

  /// No content region in the post page passed the locator's checks.
  #[error("No content region found in {url}")]
  Extraction { url: String },

  /// The feed or listing could not be enumerated. Fatal for the whole run.
  #[error("Failed to enumerate posts: {0}")]
  Feed(String),

  /// Writing the output document failed.
  #[error("Failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl MigrateError {
  /// Whether this error means the post should be skipped rather than counted
  /// as a failure.
  pub fn is_skip(&self) -> bool {
    matches!(self, MigrateError::Extraction { .. })
  }
}
