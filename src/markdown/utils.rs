//! Utility functions for DOM inspection and text extraction.
//!
//! Provides helpers for working with `dom_query` nodes: tag names, class
//! checks, and the two text-extraction modes used by the converter
//! (preformatted and browser-rendered), plus escaping of converted text.

use std::borrow::Cow;
use std::sync::LazyLock;

use dom_query::{NodeRef, Selection};
use regex::Regex;

/// Characters escaped wherever they appear in prose.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '`'];

/// Line-leading sequences that Markdown reads as block structure, paired with
/// their escaped replacement.
#[allow(clippy::expect_used)]
static BLOCK_MARKERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
  [
    (r"^( *)(#{1,6}) ", r"${1}\${2} "),
    (r"^( *)>", r"${1}\>"),
    (r"^( *)-", r"${1}\-"),
    (r"^( *)\+ ", r"${1}\+ "),
    (r"^( *)(=+)", r"${1}\${2}"),
    (r"^( *)~~~", r"${1}\~~~"),
    (r"^( *)(\d+)\. ", r"${1}${2}\. "),
  ]
  .into_iter()
  .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
  .collect()
});

/// Minimum length of a fenced code block delimiter.
const MIN_FENCE_LEN: usize = 3;

/// Lowercase tag name of an element, or an empty string for non-elements.
pub fn tag_name(node: &NodeRef) -> String {
  node
    .node_name()
    .map(|name| name.to_ascii_lowercase())
    .unwrap_or_default()
}

/// Tests whether a node is an element with the given tag name.
pub fn matches_tag(node: &NodeRef, name: &str) -> bool {
  node.is_element() && tag_name(node) == name
}

/// Retrieves an attribute value from an element.
pub fn get_attribute(node: &NodeRef, attr_name: &str) -> Option<String> {
  if !node.is_element() {
    return None;
  }
  Selection::from(*node).attr(attr_name).map(|value| value.to_string())
}

/// Tests whether an element carries the given class token.
pub fn has_class(node: &NodeRef, class: &str) -> bool {
  node.is_element() && Selection::from(*node).has_class(class)
}

/// Collects text exactly as a `<pre>` block would show it.
///
/// `<br>` elements become newlines and non-breaking spaces become plain
/// spaces; all other whitespace is kept verbatim.
///
/// # Arguments
/// * `node` - The element whose descendants should be read.
///
/// # Returns
/// The preformatted text content.
pub fn preformatted_text(node: &NodeRef) -> String {
  let mut text = String::new();
  collect_preformatted(node, &mut text);
  text.replace('\u{a0}', " ")
}

fn collect_preformatted(node: &NodeRef, out: &mut String) {
  for child in node.children() {
    if child.is_text() {
      out.push_str(&child.text());
    } else if child.is_element() {
      if matches_tag(&child, "br") {
        out.push('\n');
      } else {
        collect_preformatted(&child, out);
      }
    }
  }
}

/// Collects text the way a browser renders a normal block.
///
/// Runs of ASCII whitespace collapse to one space and leading collapsible
/// whitespace is dropped, but non-breaking spaces survive as indentation.
/// `<br>` elements become newlines. Trailing whitespace is trimmed per line.
pub fn rendered_text(node: &NodeRef) -> String {
  let mut text = String::new();
  collect_rendered(node, &mut text);

  text
    .split('\n')
    .map(|line| line.trim_start_matches(' ').trim_end().replace('\u{a0}', " "))
    .collect::<Vec<_>>()
    .join("\n")
}

fn collect_rendered(node: &NodeRef, out: &mut String) {
  for child in node.children() {
    if child.is_text() {
      push_collapsed(&child.text(), out);
    } else if child.is_element() {
      if matches_tag(&child, "br") {
        out.push('\n');
      } else {
        collect_rendered(&child, out);
      }
    }
  }
}

/// Appends `text` with ASCII whitespace runs collapsed to single spaces.
pub fn push_collapsed(text: &str, out: &mut String) {
  let mut last_was_space = out.ends_with(' ');
  for ch in text.chars() {
    if ch.is_ascii_whitespace() {
      if !last_was_space {
        out.push(' ');
        last_was_space = true;
      }
    } else {
      out.push(ch);
      last_was_space = false;
    }
  }
}

/// Collapse whitespace in a string, as [`push_collapsed`] does.
pub fn collapse_whitespace(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  push_collapsed(text, &mut out);
  out
}

/// Escape prose so Markdown renders it literally.
///
/// Emphasis, link and code characters are escaped everywhere. When the text
/// begins a line, a leading heading, quote, list, rule or setext marker is
/// escaped as well.
pub fn escape_markdown(text: &str, at_line_start: bool) -> String {
  let mut escaped = String::with_capacity(text.len() + text.len() / 4);
  for ch in text.chars() {
    if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
      escaped.push('\\');
    }
    escaped.push(ch);
  }

  if !at_line_start {
    return escaped;
  }

  // The markers start with distinct characters, so at most one applies.
  for (marker, replacement) in BLOCK_MARKERS.iter() {
    if let Cow::Owned(replaced) = marker.replace(&escaped, *replacement) {
      return replaced;
    }
  }
  escaped
}

/// Length of the longest run of backticks in `text`.
pub fn longest_backtick_run(text: &str) -> usize {
  text.split(|ch| ch != '`').map(str::len).max().unwrap_or(0)
}

/// Backtick delimiter for a fenced block that `body` cannot close early.
pub fn fence_delimiter(body: &str) -> String {
  "`".repeat(MIN_FENCE_LEN.max(longest_backtick_run(body) + 1))
}

/// Escape text for inclusion in serialized HTML.
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      _ => escaped.push(ch),
    }
  }
  escaped
}
