//! HTML to Markdown conversion for migrated blog content.
//!
//! # Architecture
//!
//! The conversion is split into focused modules:
//! - [`language`] - Fence language detection from class hints or code text
//! - [`code_blocks`] - Rewrites legacy code markup into fenced blocks
//! - [`headings`] - Heading level normalization
//! - [`cleanup`] - Pre-pass and post-pass text normalization
//! - [`tables`] - HTML table to Markdown table conversion
//! - [`elements`] - Basic HTML element converters
//! - [`utils`] - DOM helpers and text extraction
//!
//! The region passes (`code_blocks`, `headings`) run on an owned
//! [`ContentRegion`]; [`to_markdown`] then works on the serialized HTML.
//!
//! # Example
//!
//! ```
//! use blog_migrate::markdown::{MarkdownOptions, to_markdown};
//!
//! let html = r#"<h2>Title</h2><p><strong>Bold text</strong></p>"#;
//! let markdown = to_markdown(html, &MarkdownOptions::default());
//! assert_eq!(markdown, "## Title\n\n**Bold text**");
//! ```

use std::time::Instant;

use dom_query::Document;
use tracing::{debug, trace};

pub mod cleanup;
pub mod code_blocks;
mod elements;
pub mod headings;
pub mod language;
mod tables;
mod utils;

pub use code_blocks::reconstruct_code;
pub use elements::convert_node_to_markdown;
pub use headings::normalize_headings;
pub use language::{ClassificationMethod, Language, LanguageTag, classify};

use crate::region::ContentRegion;

/// Options that control Markdown conversion behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
  /// Marker used for unordered list items.
  pub bullet_marker: char,
  /// Render Markdown tables without padding cells to align columns.
  pub compact_tables: bool,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      bullet_marker: '-',
      compact_tables: false,
    }
  }
}

/// Convert an HTML fragment to Markdown.
///
/// Runs the pre-pass text substitutions, the structural conversion and the
/// post-pass cleanup.
///
/// # Arguments
///
/// * `html` - The HTML fragment to convert.
/// * `options` - Conversion behaviour flags.
///
/// # Returns
///
/// The cleaned-up Markdown text. Empty input yields an empty string.
pub fn to_markdown(html: &str, options: &MarkdownOptions) -> String {
  if html.trim().is_empty() {
    return String::new();
  }

  let preprocessed = cleanup::preprocess_html(html);

  let parse_start = Instant::now();
  let document = Document::from(preprocessed.as_str());
  debug!(
    "Parsed HTML fragment in {duration:?} (length: {length} chars)",
    duration = parse_start.elapsed(),
    length = preprocessed.len()
  );

  let body = document.select("body");
  let markdown = body
    .nodes()
    .first()
    .map(|root| convert_node_to_markdown(root, options))
    .unwrap_or_default();

  trace!(
    "Raw markdown (first 500 chars):\n{}",
    markdown.chars().take(500).collect::<String>()
  );

  cleanup::cleanup(&markdown)
}

/// Run code reconstruction and heading normalization on a located region and
/// convert the result to Markdown.
pub fn region_to_markdown(region: ContentRegion, options: &MarkdownOptions) -> String {
  let region = reconstruct_code(region);
  let region = normalize_headings(region);
  to_markdown(&region.inner_html(), options)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn render(input: &str) -> String {
    region_to_markdown(ContentRegion::from_html(input), &MarkdownOptions::default())
  }

  #[test]
  fn test_pre_code_block_becomes_tagged_fence() {
    let output = render(r#"<pre><code class="language-csharp">public class X {}</code></pre>"#);
    assert_eq!(output, "```csharp\npublic class X {}\n```");
  }

  #[test]
  fn test_paragraph_lines_become_one_fence() {
    let output = render(
      r#"<p>Example:</p>
<p class="CodeCxSpMiddle">line1</p>
<p class="CodeCxSpMiddle">line2</p>
<p class="CodeCxSpMiddle">line3</p>
<p>Done.</p>"#,
    );
    insta::assert_snapshot!(output, @r###"
    Example:

    ```
    line1
    line2
    line3
    ```

    Done.
    "###);
  }

  #[test]
  fn test_headings_are_normalized() {
    let output = render("<h3>Intro</h3><p>Text</p><h4>Detail</h4><p>More</p>");
    assert_eq!(output, "## Intro\n\nText\n\n### Detail\n\nMore");
  }

  #[test]
  fn test_hash_paragraph_keeps_level_two_as_shallowest_heading() {
    let output = render("<h3>Intro</h3><p># Not a heading</p><p>Use *args</p>");
    assert_eq!(output, "## Intro\n\n\\# Not a heading\n\nUse \\*args");
    assert!(!output.lines().any(|line| line.starts_with("# ")));
  }

  #[test]
  fn test_code_with_backtick_fence_inside() {
    let output = render("<p>Markdown sample:</p><pre><code class=\"language-markdown\">```\nx\n```</code></pre><p>End.</p>");
    assert!(output.starts_with("Markdown sample:\n\n````"));
    assert!(output.ends_with("\n```\nx\n```\n````\n\nEnd."));
  }

  #[test]
  fn test_styled_div_with_generic_markdown_around_it() {
    let output = render(
      r#"<p>See <a href="https://example.com/x">this</a>:</p>
<div class="csharpcode"><pre><span class="kwrd">namespace</span> Demo
{
&nbsp;&nbsp;&nbsp;&nbsp;<span class="kwrd">public</span> class A {}
}</pre></div>
<ul><li>one</li><li><s>two</s></li></ul>"#,
    );
    insta::assert_snapshot!(output, @r###"
    See [this](https://example.com/x):

    ```csharp
    namespace Demo
    {
        public class A {}
    }
    ```

    - one
    - ~~two~~
    "###);
  }

  #[test]
  fn test_nbsp_and_line_breaks_are_normalized() {
    let output = to_markdown("<p>a&nbsp;b<br>c</p>", &MarkdownOptions::default());
    assert_eq!(output, "a b c");
  }

  #[test]
  fn test_custom_bullet_marker() {
    let options = MarkdownOptions {
      bullet_marker: '*',
      ..Default::default()
    };
    assert_eq!(to_markdown("<ul><li>a</li><li>b</li></ul>", &options), "* a\n* b");
  }

  #[test]
  fn test_empty_input() {
    assert_eq!(to_markdown("", &MarkdownOptions::default()), "");
    assert_eq!(render("   "), "");
  }

  #[test]
  fn test_table_renders_as_gfm() {
    let output = render("<table><tr><th>Key</th><th>Value</th></tr><tr><td>a</td><td>1</td></tr></table>");
    insta::assert_snapshot!(output, @r###"
    | Key | Value |
    | --- | ----- |
    | a   | 1     |
    "###);
  }
}
