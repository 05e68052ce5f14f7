//! Trait definitions for fetching blog content.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for blog fetch operations (enables testing with fake
/// implementations).
#[async_trait]
pub trait BlogApi: Send + Sync {
  /// Fetch a page or feed as text.
  ///
  /// # Arguments
  /// * `url` - Absolute URL of the listing page, post page or feed.
  ///
  /// # Returns
  /// The response body. Non-success statuses are errors.
  async fn fetch_text(&self, url: &str) -> Result<String>;
}
