//! Owned content subtree shared by the extraction and rewrite passes.

use dom_query::{Document, Selection};

/// A standalone parsed subtree holding one post's article body.
///
/// The region owns its own [`Document`], detached from the page it was
/// located in. Each rewrite pass takes the region by value and hands it back,
/// so passes never alias one another's tree.
pub struct ContentRegion {
  document: Document,
}

impl ContentRegion {
  /// Parse an HTML fragment into a new region.
  pub fn from_html(html: &str) -> Self {
    Self {
      document: Document::from(html),
    }
  }

  /// The element wrapping the region's content.
  pub fn root(&self) -> Selection<'_> {
    self.document.select("body")
  }

  /// Select descendants of the region root.
  pub fn select(&self, selector: &str) -> Selection<'_> {
    self.root().select(selector)
  }

  /// Serialize the region's content (without the wrapping element).
  pub fn inner_html(&self) -> String {
    self.root().inner_html().to_string()
  }

  /// Plain text of the region.
  pub fn text(&self) -> String {
    self.root().text().to_string()
  }
}

impl std::fmt::Debug for ContentRegion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContentRegion")
      .field("html_len", &self.inner_html().len())
      .finish()
  }
}
