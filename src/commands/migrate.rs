//! Default command: migrate every post of the blog.
//!
//! Enumerates posts from the configured source, converts them one at a time
//! and prints a line per post followed by the run summary. Only a failure to
//! enumerate posts ends the command with a non-zero status.

use std::process;

use anyhow::{Context, Result};

use crate::blog::models::PostRef;
use crate::blog::{BlogApi, BlogClient};
use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::migrate::{self, MigrationReport, PostOutcome, SkipReason, SourceConfig};

/// Execute the migration and exit with status 1 when it cannot start.
pub(crate) async fn handle_migrate_command(cli: &Cli, colors: &ColorScheme) {
  match run_migrate_command(cli, colors).await {
    Ok(report) => print_summary(&report, colors),
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Migration failed"));
      eprintln!("  {}: {:#}", colors.emphasis("Error"), e);
      process::exit(1);
    }
  }
}

async fn run_migrate_command(cli: &Cli, colors: &ColorScheme) -> Result<MigrationReport> {
  let source = cli.source_config()?;
  let options = cli.migrate_options();

  println!("{} {}", colors.progress("→"), colors.info("Migrating blog posts"));
  print_source(&source, colors);
  println!("  {}: {}", colors.emphasis("Output"), colors.path(options.output_dir.display()));
  if options.dry_run {
    println!(
      "  {} {}",
      colors.warning("⚠"),
      colors.warning("Dry run: no files will be written")
    );
  }

  let client = BlogClient::new(cli.performance.timeout).context("Unable to construct HTTP client")?;

  println!("\n{} {}", colors.info("→"), colors.info("Enumerating posts"));
  let posts = migrate::enumerate_posts(&client, &source, &options.retry, options.delay).await?;
  println!(
    "  {} Found {} {}",
    colors.success("✓"),
    colors.number(posts.len()),
    if posts.len() == 1 { "post" } else { "posts" }
  );

  println!("\n{} {}", colors.info("→"), colors.info("Converting posts"));
  Ok(migrate_all(&client, &posts, &options, colors).await)
}

/// Run the migration loop, printing one line per post.
pub(crate) async fn migrate_all(
  api: &dyn BlogApi,
  posts: &[PostRef],
  options: &migrate::MigrateOptions,
  colors: &ColorScheme,
) -> MigrationReport {
  let total = posts.len();
  migrate::migrate_posts(api, posts, options, |index, post, outcome| {
    let counter = colors.dimmed(format!("[{}/{total}]", index + 1));
    println!("  {counter} {}", describe_outcome(post, outcome, colors));
  })
  .await
}

fn print_source(source: &SourceConfig, colors: &ColorScheme) {
  match source {
    SourceConfig::Feed { feed_url } => {
      println!("  {}: {}", colors.emphasis("Feed"), colors.link(feed_url));
    }
    SourceConfig::Crawl { start, max_pages } => {
      println!("  {}: {}", colors.emphasis("Crawl"), colors.link(start));
      println!("  {}: {}", colors.emphasis("Max pages"), colors.number(max_pages));
    }
  }
}

fn post_label(post: &PostRef) -> &str {
  post
    .metadata
    .as_ref()
    .map(|metadata| metadata.title.as_str())
    .unwrap_or(post.url.as_str())
}

fn describe_outcome(post: &PostRef, outcome: &PostOutcome, colors: &ColorScheme) -> String {
  let label = post_label(post);
  match outcome {
    PostOutcome::Migrated { path, written: true } => {
      format!("{} {} → {}", colors.success("✓"), label, colors.path(path.display()))
    }
    PostOutcome::Migrated { path, written: false } => {
      format!(
        "{} {} → {} {}",
        colors.success("✓"),
        label,
        colors.path(path.display()),
        colors.dimmed("(dry run)")
      )
    }
    PostOutcome::Skipped(SkipReason::Exists(path)) => {
      format!(
        "{} {} {}",
        colors.warning("⊘"),
        label,
        colors.dimmed(format!("(exists: {})", path.display()))
      )
    }
    PostOutcome::Skipped(SkipReason::NoContent) => {
      format!("{} {} {}", colors.warning("⊘"), label, colors.dimmed("(no content found)"))
    }
    PostOutcome::Failed(message) => {
      format!("{} {} {}", colors.error("✗"), label, colors.error(message))
    }
  }
}

fn print_summary(report: &MigrationReport, colors: &ColorScheme) {
  println!("\n{} {}", colors.success("✓"), colors.success("Migration complete"));
  println!("  {}: {}", colors.emphasis("Migrated"), colors.number(report.migrated));
  println!("  {}: {}", colors.emphasis("Skipped"), colors.number(report.skipped));
  println!("  {}: {}", colors.emphasis("Failed"), colors.number(report.failed));
  println!("  {}: {}", colors.emphasis("Total"), colors.number(report.total));
}
