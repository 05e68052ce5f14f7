//! Text normalization applied before and after structural conversion.

use std::sync::LazyLock;

use regex::Regex;

/// Explicit line break markers in any casing, with or without a closing slash.
#[allow(clippy::expect_used)]
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

/// Three or more consecutive newlines.
#[allow(clippy::expect_used)]
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

const FENCE: &str = "```";

/// Pre-pass over raw HTML: non-breaking spaces become plain spaces and `<br>`
/// markers become newline characters.
pub fn preprocess_html(html: &str) -> String {
  let html = html.replace("&nbsp;", " ").replace('\u{a0}', " ");
  LINE_BREAK.replace_all(&html, "\n").into_owned()
}

/// Post-pass over converted Markdown.
///
/// Collapses runs of blank lines, removes the blank line right after a fence
/// opener and right before a fence closer, and trims the document. Passes are
/// repeated until nothing changes, so `cleanup(cleanup(x)) == cleanup(x)`.
pub fn cleanup(markdown: &str) -> String {
  let mut current = markdown.to_string();
  loop {
    let next = cleanup_pass(&current);
    if next == current {
      return next;
    }
    current = next;
  }
}

fn cleanup_pass(markdown: &str) -> String {
  let collapsed = EXCESS_NEWLINES.replace_all(markdown, "\n\n");
  tidy_fences(&collapsed).trim().to_string()
}

/// Length of the backtick run opening `line`, if it is a fence line.
fn fence_run(line: &str) -> Option<usize> {
  let ticks = line.trim_start().bytes().take_while(|byte| *byte == b'`').count();
  (ticks >= FENCE.len()).then_some(ticks)
}

/// Drop blank lines hugging the inside of fenced blocks.
///
/// A block closes only on a bare backtick run at least as long as its
/// opener, so shorter fences inside the body stay part of it.
fn tidy_fences(text: &str) -> String {
  let mut out: Vec<&str> = Vec::new();
  let mut open_fence: Option<usize> = None;
  let mut just_opened = false;

  for line in text.split('\n') {
    match (open_fence, fence_run(line)) {
      (None, Some(ticks)) => {
        open_fence = Some(ticks);
        just_opened = true;
        out.push(line);
        continue;
      }
      (Some(opened), Some(ticks)) if ticks >= opened && line.trim().len() == ticks => {
        if out.last().is_some_and(|last| last.trim().is_empty()) {
          out.pop();
        }
        open_fence = None;
        just_opened = false;
        out.push(line);
        continue;
      }
      _ => {}
    }

    if just_opened && line.trim().is_empty() {
      just_opened = false;
      continue;
    }

    just_opened = false;
    out.push(line);
  }

  out.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_preprocess_replaces_nbsp_and_breaks() {
    assert_eq!(preprocess_html("a&nbsp;b\u{a0}c"), "a b c");
    assert_eq!(preprocess_html("one<br>two<BR/>three<br />four"), "one\ntwo\nthree\nfour");
  }

  #[test]
  fn test_collapses_blank_lines() {
    assert_eq!(cleanup("a\n\n\n\nb"), "a\n\nb");
  }

  #[test]
  fn test_removes_blank_lines_inside_fence_edges() {
    let input = "Intro\n\n```csharp\n\nvar x = 1;\n\n```\n\nOutro";
    assert_eq!(cleanup(input), "Intro\n\n```csharp\nvar x = 1;\n```\n\nOutro");
  }

  #[test]
  fn test_keeps_paragraph_break_before_unlabeled_fence() {
    let input = "Intro\n\n```\ncode\n```";
    assert_eq!(cleanup(input), input);
  }

  #[test]
  fn test_longer_fence_holds_shorter_fence_lines() {
    let input = "````\n\n```\nx\n```\n\n````\n\nAfter";
    assert_eq!(cleanup(input), "````\n```\nx\n```\n````\n\nAfter");
  }

  #[test]
  fn test_fence_with_info_string_does_not_close() {
    let input = "```\n```js\n\n```\n\nText";
    assert_eq!(cleanup(input), "```\n```js\n```\n\nText");
  }

  #[test]
  fn test_trims_document() {
    assert_eq!(cleanup("\n\n  Hello\n\n"), "Hello");
  }

  #[test]
  fn test_cleanup_is_idempotent() {
    let samples = [
      "",
      "plain",
      "\n\n\n\n```\n\n\n\n```\n\n\n",
      "a\n\n\n```js\n\n\nx\n\n\n```\n\n\nb",
      "```\n\n```\n\n```\n\n```",
      "  \n\n## Heading\n\n\n\ntext  ",
      "````\n\n```\n\n```\n\n````\n\n\n```\n\nx",
    ];
    for sample in samples {
      let once = cleanup(sample);
      assert_eq!(cleanup(&once), once, "not idempotent for {sample:?}");
    }
  }
}
