//! End-to-end tests using the fake blog client
//!
//! These tests run whole migrations against in-memory pages: enumeration,
//! fetching with retries, conversion and writing into a temporary directory.

mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use blog_migrate::blog::RetryPolicy;
use blog_migrate::error::MigrateError;
use blog_migrate::migrate::{
  MigrateOptions, MigrationReport, PostOutcome, SkipReason, SourceConfig, enumerate_posts, migrate_posts,
};
use common::fake_blog::FakeBlogClient;
use common::fixtures::{self, COVARIANCE_URL, FEED_URL, HEADINGS_URL, LINQ_URL};
use tempfile::tempdir;
use url::Url;

fn fast_retry(max_attempts: u32) -> RetryPolicy {
  RetryPolicy {
    max_attempts,
    base_delay: Duration::ZERO,
    max_delay: Duration::ZERO,
  }
}

fn options(dir: &Path) -> MigrateOptions {
  MigrateOptions {
    retry: fast_retry(3),
    delay: Duration::ZERO,
    ..MigrateOptions::new(dir)
  }
}

fn feed_source() -> SourceConfig {
  SourceConfig::Feed {
    feed_url: Url::parse(FEED_URL).unwrap(),
  }
}

fn sample_blog() -> FakeBlogClient {
  let mut client = FakeBlogClient::new();
  client.add_page(FEED_URL, fixtures::sample_feed());
  client.add_page(LINQ_URL, fixtures::linq_page());
  client.add_page(COVARIANCE_URL, fixtures::covariance_page());
  client.add_page(HEADINGS_URL, fixtures::headings_page());
  client
}

async fn run(client: &FakeBlogClient, options: &MigrateOptions) -> MigrationReport {
  let posts = enumerate_posts(client, &feed_source(), &options.retry, options.delay)
    .await
    .unwrap();
  migrate_posts(client, &posts, options, |_, _, _| {}).await
}

fn read(dir: &Path, name: &str) -> String {
  fs::read_to_string(dir.join(name)).unwrap()
}

#[tokio::test]
async fn test_feed_migration_writes_every_post() {
  let temp_dir = tempdir().unwrap();
  let client = sample_blog();

  let report = run(&client, &options(temp_dir.path())).await;

  assert_eq!(
    report,
    MigrationReport {
      migrated: 3,
      skipped: 0,
      failed: 0,
      total: 3
    }
  );
  for name in [
    "understanding-linq-to-objects.md",
    "covariance-contravariance.md",
    "headings.md",
  ] {
    assert!(temp_dir.path().join(name).exists(), "missing {name}");
  }
}

#[tokio::test]
async fn test_frontmatter_combines_feed_and_page_metadata() {
  let temp_dir = tempdir().unwrap();
  run(&sample_blog(), &options(temp_dir.path())).await;

  let document = read(temp_dir.path(), "understanding-linq-to-objects.md");
  insta::assert_snapshot!(document.split("---\n\n").next().unwrap(), @r###"
  ---
  title: "Understanding LINQ to Objects"
  published: 2010-04-12
  description: "How LINQ to Objects works under the hood."
  image: ""
  tags: ["C#", "LINQ", ".NET"]
  category: "C#"
  draft: false
  lang: ""
  "###);
}

#[tokio::test]
async fn test_chrome_is_stripped_from_the_body() {
  let temp_dir = tempdir().unwrap();
  run(&sample_blog(), &options(temp_dir.path())).await;

  let document = read(temp_dir.path(), "headings.md");
  assert!(document.contains("This post is part of a series"));
  for chrome in ["Share on Twitter", "Great post!", "Archive", "Copyright", "tracker"] {
    assert!(!document.contains(chrome), "chrome leaked: {chrome}");
  }
  assert!(document.ends_with("And the details.\n"));
}

#[tokio::test]
async fn test_pre_code_becomes_csharp_fence() {
  let temp_dir = tempdir().unwrap();
  run(&sample_blog(), &options(temp_dir.path())).await;

  let document = read(temp_dir.path(), "understanding-linq-to-objects.md");
  assert!(document.contains("Consider the following type:\n\n```csharp\npublic class X {}\n```\n\nIt is empty."));
}

#[tokio::test]
async fn test_code_paragraphs_become_one_fence() {
  let temp_dir = tempdir().unwrap();
  run(&sample_blog(), &options(temp_dir.path())).await;

  let document = read(temp_dir.path(), "covariance-contravariance.md");
  assert!(document.contains("The listing:\n\n```\nline1\nline2\nline3\n```\n\nAfter the listing."));
  assert_eq!(document.matches("line2").count(), 1);
  assert_eq!(document.matches("```").count(), 2);
}

#[tokio::test]
async fn test_headings_are_shifted_to_level_two() {
  let temp_dir = tempdir().unwrap();
  run(&sample_blog(), &options(temp_dir.path())).await;

  let document = read(temp_dir.path(), "headings.md");
  let background = document.find("\n## Background\n").unwrap();
  let details = document.find("\n### Details\n").unwrap();
  assert!(background < details);
  assert!(!document.contains("#### "));
}

#[tokio::test]
async fn test_existing_file_is_skipped_without_fetching() {
  let temp_dir = tempdir().unwrap();
  let existing = temp_dir.path().join("headings.md");
  fs::write(&existing, "hand-edited").unwrap();
  let client = sample_blog();

  let posts = enumerate_posts(&client, &feed_source(), &fast_retry(1), Duration::ZERO)
    .await
    .unwrap();
  let mut outcomes = Vec::new();
  let report = migrate_posts(&client, &posts, &options(temp_dir.path()), |_, _, outcome| {
    outcomes.push(outcome.clone());
  })
  .await;

  assert_eq!(
    report,
    MigrationReport {
      migrated: 2,
      skipped: 1,
      failed: 0,
      total: 3
    }
  );
  assert_eq!(outcomes[2], PostOutcome::Skipped(SkipReason::Exists(existing.clone())));
  assert_eq!(fs::read_to_string(&existing).unwrap(), "hand-edited");
  assert_eq!(client.request_count(HEADINGS_URL), 0);
}

#[tokio::test]
async fn test_second_run_skips_everything() {
  let temp_dir = tempdir().unwrap();
  let client = sample_blog();
  let opts = options(temp_dir.path());

  run(&client, &opts).await;
  let before = read(temp_dir.path(), "headings.md");
  let report = run(&client, &opts).await;

  assert_eq!(report.skipped, 3);
  assert_eq!(report.total, 3);
  assert_eq!(read(temp_dir.path(), "headings.md"), before);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
  let temp_dir = tempdir().unwrap();
  let mut client = sample_blog();
  client.fail_times(LINQ_URL, 2);

  let report = run(&client, &options(temp_dir.path())).await;

  assert_eq!(report.migrated, 3);
  assert_eq!(client.request_count(LINQ_URL), 3);
}

#[tokio::test]
async fn test_exhausted_retries_fail_only_that_post() {
  let temp_dir = tempdir().unwrap();
  let mut client = sample_blog();
  client.fail_times(COVARIANCE_URL, 10);

  let report = run(&client, &options(temp_dir.path())).await;

  assert_eq!(
    report,
    MigrationReport {
      migrated: 2,
      skipped: 0,
      failed: 1,
      total: 3
    }
  );
  assert_eq!(client.request_count(COVARIANCE_URL), 3);
  assert!(!temp_dir.path().join("covariance-contravariance.md").exists());
  assert!(temp_dir.path().join("headings.md").exists());
}

#[tokio::test]
async fn test_page_without_content_is_skipped() {
  let temp_dir = tempdir().unwrap();
  let mut client = sample_blog();
  client.add_page(HEADINGS_URL, "<html><body><p>Moved.</p></body></html>");

  let report = run(&client, &options(temp_dir.path())).await;

  assert_eq!(report.migrated, 2);
  assert_eq!(report.skipped, 1);
  assert!(!temp_dir.path().join("headings.md").exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
  let temp_dir = tempdir().unwrap();
  let output = temp_dir.path().join("posts");
  let opts = MigrateOptions {
    dry_run: true,
    ..options(&output)
  };

  let report = run(&sample_blog(), &opts).await;

  assert_eq!(report.migrated, 3);
  assert!(!output.exists());
}

#[tokio::test]
async fn test_unreachable_feed_is_fatal() {
  let client = FakeBlogClient::new();

  let error = enumerate_posts(&client, &feed_source(), &fast_retry(2), Duration::ZERO)
    .await
    .unwrap_err();

  assert!(matches!(error, MigrateError::Feed(_)));
  assert_eq!(client.request_count(FEED_URL), 2);
}

#[tokio::test]
async fn test_crawl_follows_pagination() {
  let temp_dir = tempdir().unwrap();
  let page_one = "https://blog.example.com/dixin/";
  let page_two = "https://blog.example.com/dixin/page/2";

  let mut client = sample_blog();
  client.add_page(page_one, fixtures::listing_page(&[LINQ_URL, COVARIANCE_URL], Some(page_two)));
  client.add_page(
    page_two,
    fixtures::listing_page(&[HEADINGS_URL, LINQ_URL, "https://elsewhere.example.org/post"], Some(page_one)),
  );

  let source = SourceConfig::Crawl {
    start: Url::parse(page_one).unwrap(),
    max_pages: 10,
  };
  let posts = enumerate_posts(&client, &source, &fast_retry(1), Duration::ZERO)
    .await
    .unwrap();
  let urls: Vec<&str> = posts.iter().map(|post| post.url.as_str()).collect();
  assert_eq!(urls, vec![LINQ_URL, COVARIANCE_URL, HEADINGS_URL]);
  assert_eq!(client.request_count(page_one), 1);

  let report = migrate_posts(&client, &posts, &options(temp_dir.path()), |_, _, _| {}).await;
  assert_eq!(report.migrated, 3);

  // Crawled posts are named after their URL and titled from the page.
  let document = read(temp_dir.path(), "covariance-and-contravariance.md");
  assert!(document.starts_with("---\ntitle: \"Covariance & Contravariance\"\npublished: 2010-01-15\n"));
  assert!(document.contains("tags: [\".NET\"]"));
}
