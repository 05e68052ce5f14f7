//! Data describing posts as they move through the migration.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Title used when a post has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Where a post was enumerated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
  /// An `<item>` of the RSS feed.
  Feed,
  /// A link found while crawling listing pages.
  Crawl,
}

/// Metadata of a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
  /// Display title; never empty.
  pub title: String,
  /// Canonical URL of the post page.
  pub url: String,
  /// Publication timestamp.
  pub published: DateTime<Utc>,
  /// Categories and tags, de-duplicated in first-seen order.
  pub categories: Vec<String>,
  /// Summary text supplied by the source, if any.
  pub summary: Option<String>,
}

impl PostMetadata {
  /// Create metadata, falling back to [`DEFAULT_TITLE`] for a blank title.
  pub fn new(title: &str, url: impl Into<String>, published: DateTime<Utc>) -> Self {
    let title = title.trim();
    Self {
      title: if title.is_empty() {
        DEFAULT_TITLE.to_string()
      } else {
        title.to_string()
      },
      url: url.into(),
      published,
      categories: Vec::new(),
      summary: None,
    }
  }

  /// Append categories, skipping blanks and ones already present.
  pub fn add_categories<I, S>(&mut self, categories: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for category in categories {
      let category = category.as_ref().trim();
      if !category.is_empty() && !self.categories.iter().any(|existing| existing == category) {
        self.categories.push(category.to_string());
      }
    }
  }

  /// Whether the title is the fallback rather than one from the source.
  pub fn has_default_title(&self) -> bool {
    self.title == DEFAULT_TITLE
  }
}

/// A post enumerated from the feed or a listing page, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
  pub url: String,
  pub source: PostSource,
  /// Metadata known before fetching (feed items carry it, crawled links don't).
  pub metadata: Option<PostMetadata>,
}

impl PostRef {
  /// A post discovered by crawling, known only by its URL.
  pub fn crawled(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      source: PostSource::Crawl,
      metadata: None,
    }
  }

  /// A post described by a feed item.
  pub fn from_feed(metadata: PostMetadata) -> Self {
    Self {
      url: metadata.url.clone(),
      source: PostSource::Feed,
      metadata: Some(metadata),
    }
  }
}
