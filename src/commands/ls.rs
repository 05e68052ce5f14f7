//! `ls` subcommand for previewing a migration.
//!
//! Enumerates posts exactly as a migration would and prints each post with
//! the file it would be written to, without fetching or converting any post.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::blog::BlogClient;
use crate::blog::models::{PostRef, PostSource};
use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::migrate::{self, planned_path};

/// One post as listed by `ls`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ListedPost {
  pub url: String,
  pub source: PostSource,
  pub title: Option<String>,
  /// Publication date (`YYYY-MM-DD`), known only for feed posts.
  pub published: Option<String>,
  pub target: PathBuf,
  pub exists: bool,
}

impl ListedPost {
  pub fn new(post: &PostRef, output_dir: &Path) -> Self {
    let target = planned_path(post, output_dir);
    Self {
      url: post.url.clone(),
      source: post.source,
      title: post.metadata.as_ref().map(|metadata| metadata.title.clone()),
      published: post
        .metadata
        .as_ref()
        .map(|metadata| metadata.published.format("%Y-%m-%d").to_string()),
      exists: target.exists(),
      target,
    }
  }
}

/// Execute the `ls` subcommand.
///
/// # Arguments
/// * `json` - Print a JSON array instead of the colored listing.
/// * `cli` - Top-level CLI options for source, output and networking.
/// * `colors` - Shared color palette used to render terminal output.
pub(crate) async fn handle_ls_command(json: bool, cli: &Cli, colors: &ColorScheme) {
  if let Err(error) = run_ls_command(json, cli, colors).await {
    eprintln!("{} {}", colors.error("✗"), colors.error("Failed to list posts"));
    eprintln!("  {}: {:#}", colors.emphasis("Error"), error);
    process::exit(1);
  }
}

async fn run_ls_command(json: bool, cli: &Cli, colors: &ColorScheme) -> Result<()> {
  let source = cli.source_config()?;
  let options = cli.migrate_options();
  let client = BlogClient::new(cli.performance.timeout).context("Unable to construct HTTP client")?;

  let posts = migrate::enumerate_posts(&client, &source, &options.retry, options.delay).await?;
  let listed: Vec<ListedPost> = posts
    .iter()
    .map(|post| ListedPost::new(post, &options.output_dir))
    .collect();

  if json {
    let rendered = serde_json::to_string_pretty(&listed).context("Failed to serialize post list")?;
    println!("{rendered}");
    return Ok(());
  }

  let pending = listed.iter().filter(|post| !post.exists).count();
  println!(
    "{} Found {} {} ({} pending)",
    colors.progress("→"),
    colors.number(listed.len()),
    if listed.len() == 1 { "post" } else { "posts" },
    colors.number(pending)
  );
  for line in format_listing(&listed, colors) {
    println!("  {line}");
  }

  Ok(())
}

fn format_listing(posts: &[ListedPost], colors: &ColorScheme) -> Vec<String> {
  posts
    .iter()
    .enumerate()
    .map(|(idx, post)| {
      let connector = if idx + 1 == posts.len() { "└──" } else { "├──" };
      let label = post.title.as_deref().unwrap_or(post.url.as_str());
      let date = post
        .published
        .as_deref()
        .map(|date| format!("{} ", colors.dimmed(date)))
        .unwrap_or_default();
      let state = if post.exists {
        colors.warning("exists")
      } else {
        colors.success("new")
      };
      format!(
        "{connector} {date}{} → {} [{state}]",
        colors.emphasis(label),
        colors.path(post.target.display())
      )
    })
    .collect()
}
