//! Metadata read from a post page itself.
//!
//! Crawled posts have nothing but their URL, so title, date and categories
//! come from the page. Feed posts use this only to pick up extra categories
//! and tags.

use chrono::{DateTime, Utc};
use dom_query::Document;

use crate::blog::dates::parse_date_or_now;
use crate::blog::models::PostMetadata;

const TITLE_SELECTORS: &[&str] = &[".entry-title", ".post-title", "h1", "title"];

/// Selector and attribute pairs for the publish date; `None` reads the text.
const DATE_SOURCES: &[(&str, Option<&str>)] = &[
  ("time[datetime]", Some("datetime")),
  ("meta[property=\"article:published_time\"]", Some("content")),
  (".post-date", None),
  (".date", None),
];

const CATEGORY_SELECTOR: &str = ".post-categories a, .categories a, .category a";
const TAG_SELECTOR: &str = ".post-tags a, .tags a, .tag a";

/// Metadata found on a post page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
  pub title: Option<String>,
  pub published: Option<String>,
  pub categories: Vec<String>,
  pub tags: Vec<String>,
}

impl PageMetadata {
  /// Build post metadata for a crawled post.
  pub fn into_post_metadata(self, url: &str) -> PostMetadata {
    let published: DateTime<Utc> = parse_date_or_now(self.published.as_deref(), url);
    let mut metadata = PostMetadata::new(self.title.as_deref().unwrap_or_default(), url, published);
    metadata.add_categories(self.categories.iter().chain(&self.tags));
    metadata
  }

  /// Add this page's categories and tags to metadata obtained elsewhere.
  pub fn merge_into(&self, metadata: &mut PostMetadata) {
    metadata.add_categories(self.categories.iter().chain(&self.tags));
  }
}

fn collapsed(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn texts(document: &Document, selector: &str) -> Vec<String> {
  document
    .select(selector)
    .iter()
    .map(|link| collapsed(&link.text()))
    .filter(|text| !text.is_empty())
    .collect()
}

/// Read title, date, categories and tags from a post page.
pub fn extract_page_metadata(document: &Document) -> PageMetadata {
  let title = TITLE_SELECTORS.iter().find_map(|selector| {
    document
      .select(selector)
      .iter()
      .map(|node| collapsed(&node.text()))
      .find(|text| !text.is_empty())
  });

  let published = DATE_SOURCES.iter().find_map(|(selector, attr)| {
    document
      .select(selector)
      .iter()
      .filter_map(|node| match attr {
        Some(attr) => node.attr(attr).map(|value| value.trim().to_string()),
        None => Some(collapsed(&node.text())),
      })
      .find(|value| !value.is_empty())
  });

  PageMetadata {
    title,
    published,
    categories: texts(document, CATEGORY_SELECTOR),
    tags: texts(document, TAG_SELECTOR),
  }
}
