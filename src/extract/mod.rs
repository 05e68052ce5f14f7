//! Content location: finding the article body inside a post page.
//!
//! Strategies are tried in order, from dedicated article containers to
//! generic fallbacks. A match qualifies only if its trimmed inner HTML is
//! longer than [`MIN_CONTENT_LEN`] characters, which rejects sidebar widgets
//! and teasers that happen to share a class name.

pub mod metadata;

use dom_query::Document;
use tracing::{debug, trace};

pub use crate::region::ContentRegion;

/// Content container selectors in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
  ".entry-content",
  ".post-content",
  ".article-content",
  ".post-body",
  ".itemBody",
  ".content",
  "#content",
  "article",
];

/// Minimum trimmed inner HTML length (in characters) of a qualifying region.
pub const MIN_CONTENT_LEN: usize = 100;

/// Site chrome removed from every located region.
pub const CHROME_SELECTOR: &str =
  "script, style, noscript, nav, .comments, #comments, .share, .social, .related-posts, .navigation, .nav";

/// Locate the article body of a post page.
///
/// # Arguments
/// * `document` - The parsed post page.
///
/// # Returns
/// The first qualifying region with chrome removed, or `None` when no
/// strategy produced one.
pub fn locate(document: &Document) -> Option<ContentRegion> {
  for selector in CONTENT_SELECTORS {
    for candidate in document.select(selector).iter() {
      let html = candidate.inner_html();
      let length = html.trim().chars().count();
      if length > MIN_CONTENT_LEN {
        debug!("Content located with '{selector}' ({length} chars)");
        return Some(strip_chrome(ContentRegion::from_html(&html)));
      }
      trace!("Rejected '{selector}' match with {length} chars");
    }
  }

  debug!("No content selector matched with enough content");
  None
}

/// Parse a full page and locate its content region.
pub fn locate_in_html(html: &str) -> Option<ContentRegion> {
  locate(&Document::from(html))
}

/// Remove scripts, styles, comment threads, share widgets, related-post
/// blocks and navigation from a region.
pub fn strip_chrome(region: ContentRegion) -> ContentRegion {
  {
    let chrome = region.select(CHROME_SELECTOR);
    if chrome.exists() {
      debug!("Removing {} chrome element(s)", chrome.length());
      chrome.remove();
    }
  }
  region
}

#[cfg(test)]
mod tests {
  use super::*;

  fn filler() -> String {
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(3)
  }

  #[test]
  fn test_prefers_specific_container() {
    let html = format!(
      r#"<div id="content"><div class="entry-content"><p>{}</p></div><aside>side</aside></div>"#,
      filler()
    );
    let region = locate_in_html(&html).unwrap();
    assert!(!region.inner_html().contains("aside"));
  }

  #[test]
  fn test_platform_body_wins_over_generic_wrappers() {
    let html = format!(
      r#"<article><div id="content"><div class="content"><h1>Blog</h1><div class="itemBody"><p>{}</p></div><p>Sidebar widget text</p></div></div></article>"#,
      filler()
    );
    let region = locate_in_html(&html).unwrap();
    assert!(region.inner_html().starts_with("<p>Lorem ipsum"));
    assert!(!region.inner_html().contains("Sidebar"));
  }

  #[test]
  fn test_skips_short_matches() {
    let html = format!(
      r#"<div class="entry-content">teaser</div><div class="post-body"><p>{}</p></div>"#,
      filler()
    );
    let region = locate_in_html(&html).unwrap();
    assert!(region.text().starts_with("Lorem ipsum"));
  }

  #[test]
  fn test_tries_every_match_of_a_strategy() {
    let html = format!(
      r#"<div class="content">short</div><div class="content"><p>{}</p></div>"#,
      filler()
    );
    let region = locate_in_html(&html).unwrap();
    assert!(region.text().starts_with("Lorem ipsum"));
  }

  #[test]
  fn test_falls_back_to_article() {
    let html = format!("<article><p>{}</p></article>", filler());
    assert!(locate_in_html(&html).is_some());
  }

  #[test]
  fn test_unextractable_page() {
    assert!(locate_in_html("<div class=\"entry-content\">tiny</div>").is_none());
    assert!(locate_in_html("<p>no container</p>").is_none());
  }

  #[test]
  fn test_strips_chrome() {
    let html = format!(
      r#"<div class="entry-content"><p>{}</p><script>track()</script><div class="share">Share</div><div id="comments">c</div><nav>n</nav></div>"#,
      filler()
    );
    let region = locate_in_html(&html).unwrap();
    let inner = region.inner_html();
    assert!(!inner.contains("track()"));
    assert!(!inner.contains("Share"));
    assert!(!inner.contains("comments"));
    assert!(!inner.contains("<nav>"));
    assert!(inner.contains("Lorem ipsum"));
  }
}
