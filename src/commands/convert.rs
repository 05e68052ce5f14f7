//! `convert` subcommand: run the conversion pipeline on a saved page.
//!
//! Useful for checking how a single post will look before a migration. The
//! document is printed to stdout; nothing is written.

use std::path::Path;
use std::process;

use anyhow::{Context, Result, anyhow};
use dom_query::Document;
use tracing::info;
use url::Url;

use crate::blog::models::PostSource;
use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::error::MigrateError;
use crate::extract;
use crate::extract::metadata::extract_page_metadata;
use crate::post::{AssembleOptions, MigratedPost, assemble_from_region, output_filename};

/// Execute the `convert` subcommand.
///
/// # Arguments
/// * `file` - Saved HTML of a single post page.
/// * `url` - Page URL; defaults to the file's `file://` URL.
/// * `title` - Title overriding the one found on the page.
/// * `cli` - Top-level CLI options.
/// * `colors` - Shared color palette used to render terminal output.
pub(crate) async fn handle_convert_command(
  file: &Path,
  url: Option<&str>,
  title: Option<&str>,
  cli: &Cli,
  colors: &ColorScheme,
) {
  match run_convert_command(file, url, title, cli).await {
    Ok(post) => print!("{}", post.document),
    Err(error) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to convert page"));
      eprintln!("  {}: {}", colors.emphasis("File"), colors.path(file.display()));
      eprintln!("  {}: {:#}", colors.emphasis("Error"), error);
      process::exit(1);
    }
  }
}

async fn run_convert_command(file: &Path, url: Option<&str>, title: Option<&str>, cli: &Cli) -> Result<MigratedPost> {
  let html = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("Failed to read {}", file.display()))?;

  let url = match url {
    Some(url) => url.to_string(),
    None => file_url(file)?,
  };

  let post = convert_local_page(&html, &url, title, &cli.assemble_options())?;
  info!("Converted {} as {}", file.display(), post.filename);
  Ok(post)
}

fn file_url(file: &Path) -> Result<String> {
  let absolute = std::path::absolute(file).with_context(|| format!("Failed to resolve {}", file.display()))?;
  Url::from_file_path(&absolute)
    .map(String::from)
    .map_err(|()| anyhow!("Cannot build a file URL for {}", absolute.display()))
}

/// Convert one saved post page, taking metadata from the page itself.
///
/// # Errors
/// Returns [`MigrateError::Extraction`] when no content region qualifies.
pub fn convert_local_page(
  html: &str,
  url: &str,
  title: Option<&str>,
  options: &AssembleOptions,
) -> Result<MigratedPost, MigrateError> {
  let document = Document::from(html);
  let mut metadata = extract_page_metadata(&document).into_post_metadata(url);
  if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
    metadata.title = title.to_string();
  }

  let region = extract::locate(&document).ok_or_else(|| MigrateError::Extraction { url: url.to_string() })?;
  let title = (!metadata.has_default_title()).then(|| metadata.title.clone());
  let filename = output_filename(PostSource::Crawl, title.as_deref(), url);
  Ok(assemble_from_region(region, metadata, filename, options))
}
