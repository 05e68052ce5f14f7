//! Basic HTML element to Markdown converters.
//!
//! Handles conversion of standard HTML elements like headings, paragraphs,
//! links, lists, code blocks, and formatting, plus the `blog-fence`
//! placeholders left behind by code reconstruction.

use dom_query::NodeRef;
use tracing::trace;

use super::MarkdownOptions;
use super::code_blocks::{FENCE_LANG_ATTR, FENCE_TAG};
use super::tables::convert_table_to_markdown;
use super::utils::{
  collapse_whitespace, escape_markdown, fence_delimiter, get_attribute, longest_backtick_run, matches_tag,
  preformatted_text, tag_name,
};

fn looks_like_list_marker(line: &str) -> bool {
  let trimmed = line.trim_start();

  if trimmed.starts_with(['-', '*', '+']) {
    return trimmed.len() > 1 && trimmed.as_bytes()[1] == b' ';
  }

  let mut chars = trimmed.chars();
  let mut saw_digit = false;

  while let Some(ch) = chars.next() {
    if ch.is_ascii_digit() {
      saw_digit = true;
      continue;
    }

    if ch == '.' {
      return saw_digit && matches!(chars.next(), Some(' '));
    }

    break;
  }

  false
}

fn format_list_item(item: &str, prefix: &str) -> String {
  let mut formatted = String::new();
  let indentation = " ".repeat(prefix.chars().count());
  let mut wrote_first_line = false;

  for line in item.trim_end().lines() {
    if !wrote_first_line {
      if line.trim().is_empty() {
        continue;
      }

      let line_content = line.trim_start();

      if looks_like_list_marker(line_content) {
        formatted.push_str(prefix.trim_end());
        formatted.push('\n');
        formatted.push_str(&indentation);
      } else {
        formatted.push_str(prefix);
      }
      formatted.push_str(line_content.trim_end());
      formatted.push('\n');

      wrote_first_line = true;
    } else if line.trim().is_empty() {
      formatted.push('\n');
    } else {
      formatted.push_str(&indentation);
      formatted.push_str(line.trim_end());
      formatted.push('\n');
    }
  }

  if !wrote_first_line {
    formatted.push_str(prefix.trim_end());
    formatted.push('\n');
  }

  formatted
}

/// Wrap inline content in a delimiter, keeping surrounding whitespace outside
/// so `<b> bold </b>` becomes ` **bold** `.
fn wrap_inline(content: &str, delimiter: &str) -> String {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    return content.to_string();
  }

  let leading = &content[..content.len() - content.trim_start().len()];
  let trailing = &content[content.trim_end().len()..];
  format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

/// Render inline code with a backtick run longer than any run in the text.
fn inline_code(text: &str) -> String {
  let text = collapse_whitespace(text);
  let longest_run = longest_backtick_run(&text);

  if longest_run == 0 {
    return format!("`{text}`");
  }

  let ticks = "`".repeat(longest_run + 1);
  format!("{ticks} {text} {ticks}")
}

fn block(content: &str) -> String {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    format!("\n\n{trimmed}\n\n")
  }
}

fn fenced(language: &str, body: &str) -> String {
  let fence = fence_delimiter(body);
  format!("\n\n{fence}{language}\n{body}\n{fence}\n\n")
}

fn quote(content: &str) -> String {
  let mut lines: Vec<String> = Vec::new();
  for line in content.trim().lines().map(str::trim_end) {
    if line.is_empty() {
      if lines.last().is_some_and(|last| last != ">") {
        lines.push(">".to_string());
      }
    } else {
      lines.push(format!("> {line}"));
    }
  }
  block(&lines.join("\n"))
}

fn checkbox(node: &NodeRef) -> String {
  let is_checkbox = get_attribute(node, "type").is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"));
  if !is_checkbox {
    return String::new();
  }

  if get_attribute(node, "checked").is_some() {
    "[x] ".to_string()
  } else {
    "[ ] ".to_string()
  }
}

fn convert_list(node: &NodeRef, ordered: bool, options: &MarkdownOptions) -> String {
  let start = get_attribute(node, "start")
    .and_then(|value| value.trim().parse::<usize>().ok())
    .unwrap_or(1);

  let mut result = String::from("\n\n");
  for (index, li) in node.children().into_iter().filter(|n| matches_tag(n, "li")).enumerate() {
    let item = convert_node_to_markdown(&li, options);
    let prefix = if ordered {
      format!("{}. ", start + index)
    } else {
      format!("{} ", options.bullet_marker)
    };
    result.push_str(&format_list_item(item.trim_start(), &prefix));
  }
  result.push('\n');
  result
}

/// Converts an element's children to Markdown recursively.
///
/// # Arguments
/// * `node` - Root node whose descendants should be rendered.
/// * `options` - Conversion settings.
///
/// # Returns
/// A Markdown string representing the element's descendants.
pub fn convert_node_to_markdown(node: &NodeRef, options: &MarkdownOptions) -> String {
  let mut result = String::new();

  for child in node.children() {
    if child.is_text() {
      let raw = child.text();
      let raw: &str = if result.ends_with('\n') { raw.trim_start() } else { &raw };
      let mut text = collapse_whitespace(raw);
      if result.ends_with(' ') && text.starts_with(' ') {
        text.remove(0);
      }
      let at_line_start = result.is_empty() || result.ends_with('\n');
      result.push_str(&escape_markdown(&text, at_line_start));
      continue;
    }

    if !child.is_element() {
      continue;
    }

    let tag = tag_name(&child);
    match tag.as_str() {
      // Headings
      "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
        let level = tag[1..].parse::<usize>().unwrap_or(1);
        let content = convert_node_to_markdown(&child, options);
        let content = collapse_whitespace(content.trim());
        if !content.is_empty() {
          result.push_str(&format!("\n\n{} {}\n\n", "#".repeat(level), content));
        }
      }

      // Paragraphs and block containers
      "p" => result.push_str(&block(&convert_node_to_markdown(&child, options))),
      "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "figure" | "figcaption" | "center" => {
        result.push_str(&block(&convert_node_to_markdown(&child, options)));
      }
      "blockquote" => result.push_str(&quote(&convert_node_to_markdown(&child, options))),

      // Text formatting
      "strong" | "b" => result.push_str(&wrap_inline(&convert_node_to_markdown(&child, options), "**")),
      "em" | "i" | "u" => result.push_str(&wrap_inline(&convert_node_to_markdown(&child, options), "_")),
      "s" | "del" | "strike" => result.push_str(&wrap_inline(&convert_node_to_markdown(&child, options), "~~")),
      "code" | "kbd" | "tt" => result.push_str(&inline_code(&child.text())),

      // Lists
      "ul" => result.push_str(&convert_list(&child, false, options)),
      "ol" => result.push_str(&convert_list(&child, true, options)),
      "input" => result.push_str(&checkbox(&child)),

      // Links and images
      "a" => {
        let text = convert_node_to_markdown(&child, options);
        let text = text.trim();
        match get_attribute(&child, "href") {
          Some(href) if !href.trim().is_empty() && !text.is_empty() => {
            result.push_str(&format!("[{text}]({})", href.trim()));
          }
          _ => result.push_str(text),
        }
      }
      "img" => {
        if let Some(src) = get_attribute(&child, "src") {
          let alt = get_attribute(&child, "alt").unwrap_or_default();
          result.push_str(&format!("![{}]({})", alt.trim(), src.trim()));
        }
      }

      // Line breaks and horizontal rules
      "br" => result.push('\n'),
      "hr" => result.push_str("\n\n---\n\n"),

      // Code blocks
      _ if tag == FENCE_TAG => {
        let language = get_attribute(&child, FENCE_LANG_ATTR).unwrap_or_default();
        result.push_str(&fenced(&language, &child.text()));
      }
      "pre" => {
        let code = preformatted_text(&child);
        let code = code.trim_start_matches('\n').trim_end();
        if !code.is_empty() {
          result.push_str(&fenced("", code));
        }
      }

      // Tables
      "table" => result.push_str(&convert_table_to_markdown(&child, options.compact_tables)),

      // Non-content elements
      "script" | "style" | "noscript" | "template" | "head" | "title" | "meta" | "link" | "iframe" | "object" => {}

      // Unknown elements - extract content
      _ => {
        trace!("Rendering children of <{tag}>");
        result.push_str(&convert_node_to_markdown(&child, options));
      }
    }
  }

  result
}
