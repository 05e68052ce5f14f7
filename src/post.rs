//! Post assembly and output, separating conversion from file I/O.
//!
//! [`assemble_post`] runs the whole conversion pipeline for one fetched page
//! and yields a [`MigratedPost`]; [`write_post`] persists it without ever
//! replacing an existing file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::blog::models::{PostMetadata, PostSource};
use crate::blog::url::post_slug;
use crate::error::MigrateError;
use crate::extract;
use crate::frontmatter::{DEFAULT_TAG, build_frontmatter};
use crate::markdown::{self, MarkdownOptions};

/// Maximum length of a sanitized filename stem.
pub const MAX_FILENAME_LEN: usize = 100;

/// Stem used when neither the title nor the URL yields a filename.
pub const FALLBACK_FILENAME: &str = "untitled";

/// Extension of written documents.
pub const OUTPUT_EXTENSION: &str = "md";

/// A fetched post page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
  pub url: String,
  pub html: String,
}

/// A converted post ready to be written.
#[derive(Debug, Clone)]
pub struct MigratedPost {
  pub metadata: PostMetadata,
  /// Converted Markdown body.
  pub body: String,
  /// Output filename stem (without extension).
  pub filename: String,
  /// Full document: frontmatter, blank line, body.
  pub document: String,
}

/// Options controlling how a post is assembled.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
  pub markdown: MarkdownOptions,
  /// Tag used when a post has no categories.
  pub default_tag: String,
}

impl Default for AssembleOptions {
  fn default() -> Self {
    Self {
      markdown: MarkdownOptions::default(),
      default_tag: DEFAULT_TAG.to_string(),
    }
  }
}

/// Convert a fetched page into a [`MigratedPost`].
///
/// # Arguments
/// * `raw` - The fetched post page.
/// * `metadata` - Metadata for the post.
/// * `filename` - Output filename stem.
/// * `options` - Conversion options.
///
/// # Errors
/// Returns [`MigrateError::Extraction`] when no content region qualifies.
pub fn assemble_post(
  raw: &RawDocument,
  metadata: PostMetadata,
  filename: String,
  options: &AssembleOptions,
) -> Result<MigratedPost, MigrateError> {
  let region = extract::locate_in_html(&raw.html).ok_or_else(|| MigrateError::Extraction { url: raw.url.clone() })?;
  Ok(assemble_from_region(region, metadata, filename, options))
}

/// Build a [`MigratedPost`] from an already located region.
pub fn assemble_from_region(
  region: extract::ContentRegion,
  metadata: PostMetadata,
  filename: String,
  options: &AssembleOptions,
) -> MigratedPost {
  let body = markdown::region_to_markdown(region, &options.markdown);
  let frontmatter = build_frontmatter(&metadata, &body, &options.default_tag);
  let document = render_document(&frontmatter, &body);

  debug!("Assembled '{}' ({} chars of Markdown)", metadata.title, body.len());

  MigratedPost {
    metadata,
    body,
    filename,
    document,
  }
}

/// Join frontmatter and body into the final document text.
pub fn render_document(frontmatter: &str, body: &str) -> String {
  if body.is_empty() {
    frontmatter.to_string()
  } else {
    format!("{frontmatter}\n{body}\n")
  }
}

/// Sanitize a title into a filename stem.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen, trims hyphens from both ends, and caps the length.
pub fn sanitize_filename(title: &str) -> String {
  let mut slug = String::with_capacity(title.len());
  for ch in title.to_lowercase().chars() {
    if ch.is_ascii_alphanumeric() {
      slug.push(ch);
    } else if !slug.ends_with('-') {
      slug.push('-');
    }
  }

  let slug = slug.trim_matches('-');
  let capped: String = slug.chars().take(MAX_FILENAME_LEN).collect();
  capped.trim_end_matches('-').to_string()
}

/// Choose the output filename stem for a post.
///
/// Feed posts are named after their title and crawled posts after the last
/// segment of their URL. Each falls back to the other, then to
/// [`FALLBACK_FILENAME`].
pub fn output_filename(source: PostSource, title: Option<&str>, url: &str) -> String {
  let from_title = || title.map(sanitize_filename).filter(|name| !name.is_empty());
  let from_url = || post_slug(url).map(|slug| sanitize_filename(&slug)).filter(|name| !name.is_empty());

  let name = match source {
    PostSource::Feed => from_title().or_else(from_url),
    PostSource::Crawl => from_url().or_else(from_title),
  };
  name.unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Path of the document for `filename` inside `output_dir`.
pub fn output_path(output_dir: &Path, filename: &str) -> PathBuf {
  output_dir.join(format!("{filename}.{OUTPUT_EXTENSION}"))
}

/// Result of attempting to write a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
  Written(PathBuf),
  /// The target existed; nothing was written.
  AlreadyExists(PathBuf),
}

/// Write a post into `output_dir`, never replacing an existing file.
///
/// A write that fails part-way removes the partial file.
///
/// # Errors
/// Returns [`MigrateError::Write`] when the directory or file cannot be
/// created or written.
pub fn write_post(output_dir: &Path, post: &MigratedPost) -> Result<WriteOutcome, MigrateError> {
  fs::create_dir_all(output_dir).map_err(|source| MigrateError::Write {
    path: output_dir.to_path_buf(),
    source,
  })?;

  let path = output_path(output_dir, &post.filename);
  let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
    Ok(file) => file,
    Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::AlreadyExists(path)),
    Err(source) => return Err(MigrateError::Write { path, source }),
  };

  if let Err(source) = file.write_all(post.document.as_bytes()).and_then(|()| file.flush()) {
    drop(file);
    let _ = fs::remove_file(&path);
    return Err(MigrateError::Write { path, source });
  }

  Ok(WriteOutcome::Written(path))
}
