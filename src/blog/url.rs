//! Helpers for blog, feed and post URLs.

use anyhow::{Context, Result, anyhow};
use url::Url;

/// Feed path of the legacy platform, relative to the blog root.
pub const DEFAULT_FEED_PATH: &str = "rss.aspx";

/// File extensions of server-rendered pages, dropped from slugs.
const PAGE_EXTENSIONS: &[&str] = &[".aspx", ".html", ".htm", ".php"];

/// Parse a user-supplied blog or feed URL.
///
/// A missing scheme defaults to `https://`.
///
/// # Errors
/// Returns an error when the URL is malformed, not http(s), or has no host.
pub fn parse_blog_url(raw: &str) -> Result<Url> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err(anyhow!("URL must not be empty"));
  }

  let candidate = if raw.contains("://") {
    raw.to_string()
  } else {
    format!("https://{raw}")
  };

  let parsed = Url::parse(&candidate).with_context(|| format!("Invalid URL format: {raw}"))?;

  if !matches!(parsed.scheme(), "http" | "https") {
    return Err(anyhow!("Unsupported URL scheme '{}': {raw}", parsed.scheme()));
  }
  parsed.host_str().context("URL missing host")?;

  Ok(parsed)
}

/// The RSS feed URL for a blog root, e.g. `https://host/blog` ->
/// `https://host/blog/rss.aspx`.
pub fn default_feed_url(blog_url: &Url) -> Result<Url> {
  let mut base = blog_url.clone();
  if !base.path().ends_with('/') {
    let path = format!("{}/", base.path());
    base.set_path(&path);
  }
  base.set_query(None);
  base
    .join(DEFAULT_FEED_PATH)
    .with_context(|| format!("Failed to derive feed URL from {blog_url}"))
}

/// Final non-empty path segment of a post URL, without a page extension.
pub fn post_slug(post_url: &str) -> Option<String> {
  let parsed = Url::parse(post_url).ok()?;
  let segment = parsed.path_segments()?.rev().find(|segment| !segment.is_empty())?;

  let lower = segment.to_ascii_lowercase();
  let stem = PAGE_EXTENSIONS
    .iter()
    .find(|extension| lower.ends_with(*extension))
    .map_or(segment, |extension| &segment[..segment.len() - extension.len()]);

  (!stem.is_empty()).then(|| stem.to_string())
}
