//! Migration orchestration.
//!
//! Posts are enumerated from the feed or by crawling listing pages, then
//! processed strictly one at a time: fetch, extract, convert, write. A
//! failing post is logged and counted; only enumeration failures abort the
//! run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dom_query::Document;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::blog::models::{PostMetadata, PostRef};
use crate::blog::{BlogApi, RetryPolicy, crawl_listing, fetch_with_retry, parse_feed};
use crate::error::MigrateError;
use crate::extract;
use crate::extract::metadata::extract_page_metadata;
use crate::post::{
  AssembleOptions, MigratedPost, WriteOutcome, assemble_from_region, output_filename, output_path, write_post,
};

/// Default pause between consecutive post fetches.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// How posts are enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
  /// Read `<item>`s from an RSS feed.
  Feed { feed_url: Url },
  /// Crawl listing pages starting at `start`.
  Crawl { start: Url, max_pages: usize },
}

/// Settings for a migration run.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
  pub output_dir: PathBuf,
  pub assemble: AssembleOptions,
  pub retry: RetryPolicy,
  /// Pause between posts that required a fetch.
  pub delay: Duration,
  /// Convert but never write.
  pub dry_run: bool,
}

impl MigrateOptions {
  pub fn new(output_dir: impl Into<PathBuf>) -> Self {
    Self {
      output_dir: output_dir.into(),
      assemble: AssembleOptions::default(),
      retry: RetryPolicy::default(),
      delay: DEFAULT_DELAY,
      dry_run: false,
    }
  }
}

/// Why a post was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// The output file already exists.
  Exists(PathBuf),
  /// No content region was found on the page.
  NoContent,
}

/// What happened to a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
  Migrated { path: PathBuf, written: bool },
  Skipped(SkipReason),
  Failed(String),
}

impl PostOutcome {
  fn fetched(&self) -> bool {
    !matches!(self, PostOutcome::Skipped(SkipReason::Exists(_)))
  }
}

/// Counters for a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
  pub migrated: usize,
  pub skipped: usize,
  pub failed: usize,
  pub total: usize,
}

impl MigrationReport {
  fn record(&mut self, outcome: &PostOutcome) {
    self.total += 1;
    match outcome {
      PostOutcome::Migrated { .. } => self.migrated += 1,
      PostOutcome::Skipped(_) => self.skipped += 1,
      PostOutcome::Failed(_) => self.failed += 1,
    }
  }
}

/// Enumerate the posts to migrate.
///
/// # Errors
/// Returns [`MigrateError::Feed`] when the feed or first listing page cannot
/// be fetched or parsed, or when no post is found.
pub async fn enumerate_posts(
  api: &dyn BlogApi,
  source: &SourceConfig,
  retry: &RetryPolicy,
  delay: Duration,
) -> Result<Vec<PostRef>, MigrateError> {
  let posts = match source {
    SourceConfig::Feed { feed_url } => {
      info!("Fetching RSS feed from {feed_url}");
      let xml = fetch_with_retry(api, feed_url.as_str(), retry)
        .await
        .map_err(|error| MigrateError::Feed(error.to_string()))?;
      let items = parse_feed(&xml).map_err(|error| MigrateError::Feed(format!("{error:#}")))?;
      items
        .into_iter()
        .map(|item| PostRef::from_feed(item.into_metadata()))
        .collect::<Vec<_>>()
    }
    SourceConfig::Crawl { start, max_pages } => crawl_listing(api, start, *max_pages, retry, delay)
      .await?
      .into_iter()
      .map(PostRef::crawled)
      .collect(),
  };

  if posts.is_empty() {
    return Err(MigrateError::Feed("no posts found".to_string()));
  }

  info!("Enumerated {} post(s)", posts.len());
  Ok(posts)
}

/// Title usable for a filename: absent for the `Untitled` fallback.
fn known_title(metadata: &PostMetadata) -> Option<&str> {
  (!metadata.has_default_title()).then_some(metadata.title.as_str())
}

/// Output path a post will be written to, computed before fetching.
pub fn planned_path(post: &PostRef, output_dir: &Path) -> PathBuf {
  let title = post.metadata.as_ref().and_then(known_title);
  output_path(output_dir, &output_filename(post.source, title, &post.url))
}

/// Parse a fetched page, resolve metadata and assemble the post.
///
/// Kept synchronous so the parsed DOM never lives across an await.
fn convert_page(post: &PostRef, html: &str, options: &AssembleOptions) -> Result<MigratedPost, MigrateError> {
  let document = Document::from(html);
  let page_metadata = extract_page_metadata(&document);

  let metadata = match &post.metadata {
    Some(known) => {
      let mut metadata = known.clone();
      page_metadata.merge_into(&mut metadata);
      metadata
    }
    None => page_metadata.into_post_metadata(&post.url),
  };

  let region = extract::locate(&document).ok_or_else(|| MigrateError::Extraction { url: post.url.clone() })?;
  let filename = output_filename(post.source, known_title(&metadata), &post.url);
  Ok(assemble_from_region(region, metadata, filename, options))
}

/// Migrate a single post.
///
/// Never fails: every error is folded into the returned [`PostOutcome`].
pub async fn migrate_post(api: &dyn BlogApi, post: &PostRef, options: &MigrateOptions) -> PostOutcome {
  let planned = planned_path(post, &options.output_dir);
  if planned.exists() {
    info!("Skipping existing post: {}", planned.display());
    return PostOutcome::Skipped(SkipReason::Exists(planned));
  }

  let html = match fetch_with_retry(api, &post.url, &options.retry).await {
    Ok(html) => html,
    Err(error) => {
      error!("Failed to migrate {}: {error}", post.url);
      return PostOutcome::Failed(error.to_string());
    }
  };

  let migrated = match convert_page(post, &html, &options.assemble) {
    Ok(migrated) => migrated,
    Err(error) if error.is_skip() => {
      warn!("Skipping post with no content: {}", post.url);
      return PostOutcome::Skipped(SkipReason::NoContent);
    }
    Err(error) => {
      error!("Failed to migrate {}: {error}", post.url);
      return PostOutcome::Failed(error.to_string());
    }
  };

  if options.dry_run {
    let path = output_path(&options.output_dir, &migrated.filename);
    debug!("Dry run: would write {}", path.display());
    return PostOutcome::Migrated { path, written: false };
  }

  match write_post(&options.output_dir, &migrated) {
    Ok(WriteOutcome::Written(path)) => {
      info!("Created: {}", path.display());
      PostOutcome::Migrated { path, written: true }
    }
    Ok(WriteOutcome::AlreadyExists(path)) => {
      info!("Skipping existing post: {}", path.display());
      PostOutcome::Skipped(SkipReason::Exists(path))
    }
    Err(error) => {
      error!("Failed to migrate {}: {error}", post.url);
      PostOutcome::Failed(error.to_string())
    }
  }
}

/// Migrate posts sequentially, pausing between fetches.
///
/// # Arguments
/// * `api` - Client used for every fetch.
/// * `posts` - Posts in processing order.
/// * `options` - Run settings.
/// * `on_outcome` - Called after each post with its index and outcome.
///
/// # Returns
/// Counters over every post; `total` always equals `posts.len()`.
pub async fn migrate_posts<F>(
  api: &dyn BlogApi,
  posts: &[PostRef],
  options: &MigrateOptions,
  mut on_outcome: F,
) -> MigrationReport
where
  F: FnMut(usize, &PostRef, &PostOutcome),
{
  let mut report = MigrationReport::default();

  for (index, post) in posts.iter().enumerate() {
    let outcome = migrate_post(api, post, options).await;
    report.record(&outcome);
    on_outcome(index, post, &outcome);

    let more = index + 1 < posts.len();
    if more && outcome.fetched() && !options.delay.is_zero() {
      sleep(options.delay).await;
    }
  }

  info!(
    "Migration complete: {} migrated, {} skipped, {} failed, {} total",
    report.migrated, report.skipped, report.failed, report.total
  );
  report
}
