//! Frontmatter header generation for migrated posts.
//!
//! The header is a fixed-order YAML block:
//!
//! ```text
//! ---
//! title: "..."
//! published: YYYY-MM-DD
//! description: "..."
//! image: ""
//! tags: ["a", "b"]
//! category: "..."
//! draft: false
//! lang: ""
//! ---
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::blog::models::PostMetadata;

/// Tag used when a post has no categories.
pub const DEFAULT_TAG: &str = "Blog";

/// Maximum length of the emitted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Supplied summaries shorter than this are replaced by a derived one.
const MIN_SUMMARY_LEN: usize = 10;

/// Inline Markdown links and images.
#[allow(clippy::expect_used)]
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!?\[.*?\]\(.*?\)").expect("valid regex"));

/// Build the frontmatter block for a post.
///
/// # Arguments
/// * `metadata` - The post's metadata.
/// * `body` - The converted Markdown body, used to derive a description.
/// * `default_tag` - Tag used when the post has no categories.
///
/// # Returns
/// The header text, ending with the closing `---` line and a newline.
pub fn build_frontmatter(metadata: &PostMetadata, body: &str, default_tag: &str) -> String {
  let date = metadata.published.format("%Y-%m-%d");

  let tags: Vec<String> = if metadata.categories.is_empty() {
    vec![quoted(default_tag)]
  } else {
    metadata.categories.iter().map(|tag| quoted(tag)).collect()
  };
  let category = metadata.categories.first().map(String::as_str).unwrap_or_default();

  let description = choose_description(metadata.summary.as_deref(), body);
  let description = escape_yaml_value(&description, MAX_DESCRIPTION_LEN);

  format!(
    "---\ntitle: {title}\npublished: {date}\ndescription: \"{description}\"\nimage: \"\"\ntags: [{tags}]\ncategory: {category}\ndraft: false\nlang: \"\"\n---\n",
    title = quoted(&metadata.title),
    tags = tags.join(", "),
    category = quoted(category),
  )
}

fn quoted(value: &str) -> String {
  format!("\"{}\"", escape_yaml_value(value, usize::MAX))
}

/// Pick the supplied summary if it is long enough, else derive one from the
/// body.
fn choose_description(summary: Option<&str>, body: &str) -> String {
  match summary.map(str::trim) {
    Some(summary) if summary.chars().count() >= MIN_SUMMARY_LEN => summary.to_string(),
    _ => derive_description(body),
  }
}

/// Derive a description from the first body line that is neither blank nor a
/// heading, with Markdown links removed.
pub fn derive_description(body: &str) -> String {
  body
    .lines()
    .find(|line| !line.starts_with('#') && line.trim().chars().count() >= 2)
    .map(|line| {
      let line: String = line.chars().take(MAX_DESCRIPTION_LEN).collect();
      MARKDOWN_LINK.replace_all(&line, "").trim().to_string()
    })
    .unwrap_or_default()
}

/// Escape a value for a double-quoted YAML scalar and cap its length.
///
/// Newlines collapse to spaces, `\` and `"` are backslash-escaped, and the
/// escaped result never exceeds `limit` characters or ends in half an escape.
pub fn escape_yaml_value(value: &str, limit: usize) -> String {
  let mut escaped = String::new();
  let mut length = 0;

  for ch in value.chars() {
    let piece: &str = match ch {
      '"' => "\\\"",
      '\\' => "\\\\",
      '\r' => continue,
      '\n' | '\t' => " ",
      _ => {
        if length + 1 > limit {
          break;
        }
        escaped.push(ch);
        length += 1;
        continue;
      }
    };

    let piece_len = piece.chars().count();
    if length + piece_len > limit {
      break;
    }
    escaped.push_str(piece);
    length += piece_len;
  }

  escaped
}
