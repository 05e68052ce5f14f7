//! RSS feed parsing.

use anyhow::{Context, Result};
use dom_query::Document;
use roxmltree::Node;
use tracing::debug;

use super::dates::parse_date_or_now;
use super::models::PostMetadata;
use crate::markdown::cleanup::preprocess_html;

/// One `<item>` of an RSS feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
  pub title: String,
  pub link: String,
  pub pub_date: Option<String>,
  /// Item description reduced to plain text.
  pub description: String,
  pub categories: Vec<String>,
}

impl FeedItem {
  /// Convert into post metadata, applying the title and date fallbacks.
  pub fn into_metadata(self) -> PostMetadata {
    let published = parse_date_or_now(self.pub_date.as_deref(), &self.link);
    let mut metadata = PostMetadata::new(&self.title, self.link, published);
    metadata.add_categories(&self.categories);
    if !self.description.is_empty() {
      metadata.summary = Some(self.description);
    }
    metadata
  }
}

/// Collect the text of a node, including CDATA sections.
fn node_text(node: Node) -> String {
  node
    .descendants()
    .filter(|n| n.is_text())
    .filter_map(|n| n.text())
    .collect::<String>()
    .trim()
    .to_string()
}

fn child_text(item: Node, name: &str) -> Option<String> {
  item
    .children()
    .find(|child| child.is_element() && child.tag_name().name() == name)
    .map(node_text)
}

/// Reduce an HTML description to whitespace-collapsed plain text.
fn html_to_text(html: &str) -> String {
  if !html.contains('<') && !html.contains('&') {
    return html.split_whitespace().collect::<Vec<_>>().join(" ");
  }

  let document = Document::from(preprocess_html(html).as_str());
  let text = document.select("body").text();
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse RSS XML into feed items, in feed order.
///
/// Items without a `<link>` are dropped since they cannot be fetched.
///
/// # Errors
/// Returns an error when the XML is malformed.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>> {
  let document = roxmltree::Document::parse(xml.trim_start_matches('\u{feff}')).context("Failed to parse RSS feed XML")?;

  let items: Vec<FeedItem> = document
    .descendants()
    .filter(|node| node.is_element() && node.tag_name().name() == "item")
    .filter_map(|item| {
      let link = child_text(item, "link").filter(|link| !link.is_empty());
      let Some(link) = link else {
        debug!("Skipping feed item without a link");
        return None;
      };

      Some(FeedItem {
        title: child_text(item, "title").unwrap_or_default(),
        link,
        pub_date: child_text(item, "pubDate").filter(|date| !date.is_empty()),
        description: child_text(item, "description")
          .map(|html| html_to_text(&html))
          .unwrap_or_default(),
        categories: item
          .children()
          .filter(|child| child.is_element() && child.tag_name().name() == "category")
          .map(node_text)
          .filter(|category| !category.is_empty())
          .collect(),
      })
    })
    .collect();

  debug!("Found {} posts in RSS feed", items.len());
  Ok(items)
}
