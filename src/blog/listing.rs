//! Listing page parsing and pagination crawl.

use std::collections::HashSet;
use std::time::Duration;

use dom_query::Document;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::api::BlogApi;
use super::client::{RetryPolicy, fetch_with_retry};
use crate::error::MigrateError;

/// Selectors for links to individual posts, in priority order.
const POST_LINK_SELECTORS: &[&str] = &[".entry-title a", ".post-title a", "h2 a", "article a[rel=\"bookmark\"]"];

/// Selectors for the link to the next listing page, in priority order.
const NEXT_PAGE_SELECTORS: &[&str] = &["a[rel=\"next\"]", ".next a", "a.next"];

/// Links found on one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
  /// Absolute post URLs in page order, without duplicates.
  pub post_urls: Vec<String>,
  /// Absolute URL of the next page, if any.
  pub next_page: Option<String>,
}

/// Resolve `href` against `base`, keeping only http(s) links on the same host.
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
  let href = href.trim();
  if href.is_empty() || href.starts_with('#') {
    return None;
  }

  let mut resolved = base.join(href).ok()?;
  if !matches!(resolved.scheme(), "http" | "https") || resolved.host_str() != base.host_str() {
    return None;
  }
  resolved.set_fragment(None);
  Some(resolved)
}

/// Extract post links and the next-page link from a listing page.
///
/// # Arguments
/// * `html` - Listing page markup.
/// * `page_url` - URL the page was fetched from; relative links resolve
///   against it.
pub fn parse_listing(html: &str, page_url: &Url) -> ListingPage {
  let document = Document::from(html);
  let mut seen = HashSet::new();
  let mut post_urls = Vec::new();

  for selector in POST_LINK_SELECTORS {
    for link in document.select(selector).iter() {
      let Some(href) = link.attr("href") else {
        continue;
      };
      if let Some(url) = resolve_link(page_url, &href)
        && url != *page_url
        && seen.insert(url.to_string())
      {
        post_urls.push(url.to_string());
      }
    }
  }

  let next_page = NEXT_PAGE_SELECTORS.iter().find_map(|selector| {
    document
      .select(selector)
      .iter()
      .filter_map(|link| link.attr("href"))
      .find_map(|href| resolve_link(page_url, &href))
      .map(|url| url.to_string())
  });

  ListingPage { post_urls, next_page }
}

/// Follow listing pagination from `start`, collecting post URLs.
///
/// Stops at `max_pages`, when a page has no next link, or when the next link
/// points at a page already visited.
///
/// # Errors
/// Fails with [`MigrateError::Feed`] when the first page cannot be fetched or
/// no post URL is found at all. A failure on a later page ends the crawl with
/// what was collected so far.
pub async fn crawl_listing(
  api: &dyn BlogApi,
  start: &Url,
  max_pages: usize,
  policy: &RetryPolicy,
  delay: Duration,
) -> Result<Vec<String>, MigrateError> {
  let mut visited: HashSet<String> = HashSet::new();
  let mut seen: HashSet<String> = HashSet::new();
  let mut post_urls = Vec::new();
  let mut next = Some(start.clone());

  while let Some(page_url) = next.take() {
    if visited.len() >= max_pages.max(1) {
      info!("Stopping crawl after {} page(s)", visited.len());
      break;
    }
    if !visited.insert(page_url.to_string()) {
      debug!("Listing page {page_url} already visited");
      break;
    }
    if visited.len() > 1 && !delay.is_zero() {
      sleep(delay).await;
    }

    let html = match fetch_with_retry(api, page_url.as_str(), policy).await {
      Ok(html) => html,
      Err(error) if visited.len() == 1 => return Err(MigrateError::Feed(error.to_string())),
      Err(error) => {
        warn!("Ending crawl early: {error}");
        break;
      }
    };

    let page = parse_listing(&html, &page_url);
    debug!("Listing page {page_url}: {} post link(s)", page.post_urls.len());

    for url in page.post_urls {
      if seen.insert(url.clone()) {
        post_urls.push(url);
      }
    }

    next = page.next_page.and_then(|href| Url::parse(&href).ok());
  }

  if post_urls.is_empty() {
    return Err(MigrateError::Feed(format!("no post links found starting at {start}")));
  }

  info!("Found {} posts across {} listing page(s)", post_urls.len(), visited.len());
  Ok(post_urls)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use anyhow::{Result, anyhow};
  use async_trait::async_trait;

  use super::*;

  fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
  }

  #[test]
  fn test_parse_listing_resolves_and_deduplicates() {
    let html = r##"
      <h2 class="entry-title"><a href="/blog/post-one.aspx">One</a></h2>
      <h2 class="entry-title"><a href="https://blog.example.com/blog/post-two.aspx#comments">Two</a></h2>
      <h2><a href="/blog/post-one.aspx">One again</a></h2>
      <h2><a href="https://elsewhere.example.org/x">External</a></h2>
      <h2><a href="#top">Top</a></h2>
      <a rel="next" href="?page=2">Next</a>
    "##;
    let page = parse_listing(html, &url("https://blog.example.com/blog"));
    assert_eq!(
      page.post_urls,
      vec![
        "https://blog.example.com/blog/post-one.aspx",
        "https://blog.example.com/blog/post-two.aspx",
      ]
    );
    assert_eq!(page.next_page.as_deref(), Some("https://blog.example.com/blog?page=2"));
  }

  #[test]
  fn test_parse_listing_without_links() {
    let page = parse_listing("<p>Nothing here</p>", &url("https://blog.example.com/"));
    assert!(page.post_urls.is_empty());
    assert!(page.next_page.is_none());
  }

  struct PagedApi {
    pages: HashMap<String, String>,
  }

  #[async_trait]
  impl BlogApi for PagedApi {
    async fn fetch_text(&self, url: &str) -> Result<String> {
      self.pages.get(url).cloned().ok_or_else(|| anyhow!("HTTP 404 for {url}"))
    }
  }

  fn instant() -> RetryPolicy {
    RetryPolicy {
      max_attempts: 1,
      base_delay: Duration::ZERO,
      max_delay: Duration::ZERO,
    }
  }

  fn paged_api() -> PagedApi {
    let mut pages = HashMap::new();
    pages.insert(
      "https://blog.example.com/".to_string(),
      r#"<h2 class="post-title"><a href="/a">A</a></h2><a class="next" href="/?page=2">more</a>"#.to_string(),
    );
    pages.insert(
      "https://blog.example.com/?page=2".to_string(),
      r#"<h2 class="post-title"><a href="/b">B</a></h2><h2><a href="/a">A</a></h2><a rel="next" href="/">first</a>"#
        .to_string(),
    );
    PagedApi { pages }
  }

  #[tokio::test]
  async fn test_crawl_follows_pages_without_revisiting() {
    let api = paged_api();
    let urls = crawl_listing(&api, &url("https://blog.example.com/"), 10, &instant(), Duration::ZERO)
      .await
      .unwrap();
    assert_eq!(urls, vec!["https://blog.example.com/a", "https://blog.example.com/b"]);
  }

  #[tokio::test]
  async fn test_crawl_respects_page_cap() {
    let api = paged_api();
    let urls = crawl_listing(&api, &url("https://blog.example.com/"), 1, &instant(), Duration::ZERO)
      .await
      .unwrap();
    assert_eq!(urls, vec!["https://blog.example.com/a"]);
  }

  #[tokio::test]
  async fn test_crawl_fails_when_first_page_is_unreachable() {
    let api = PagedApi { pages: HashMap::new() };
    let error = crawl_listing(&api, &url("https://blog.example.com/"), 10, &instant(), Duration::ZERO)
      .await
      .unwrap_err();
    assert!(matches!(error, MigrateError::Feed(_)));
  }
}
