//! Reconstruction of legacy code markup into fenced blocks.
//!
//! The legacy blog represents code three ways:
//!
//! - `<pre><code class="...">` produced by syntax highlighters,
//! - a `<div class="csharpcode">` (or `div.code`) from "copy as HTML" plugins,
//! - a run of Word-exported paragraphs, one per line, tagged with a
//!   `CodeCxSp*` class.
//!
//! Each match is replaced by a private `<blog-fence>` element that the
//! Markdown converter renders verbatim. No pattern matches `blog-fence`, and
//! the walk never descends into a replaced node, so running the pass twice
//! changes nothing the second time.

use std::collections::HashSet;

use dom_query::{NodeId, NodeRef, Selection};
use tracing::{debug, trace};

use super::language::{LanguageTag, classify};
use super::utils::{
  escape_html, fence_delimiter, get_attribute, has_class, matches_tag, preformatted_text, rendered_text, tag_name,
};
use crate::region::ContentRegion;

/// Element name used for reconstructed fences inside a region.
pub const FENCE_TAG: &str = "blog-fence";

/// Attribute on [`FENCE_TAG`] carrying the language info string.
pub const FENCE_LANG_ATTR: &str = "data-lang";

/// Classes marking a `div` as a code container.
const STYLED_DIV_CLASSES: &[&str] = &["code", "csharpcode"];

/// Nested class that flags an enclosing `div` as code.
const STYLED_DIV_NESTED: &str = ".csharpcode";

/// Continuation marker classes of paragraph-per-line code.
pub const LINE_MARKER_CLASSES: &[&str] = &[
  "CodeCxSpFirst",
  "CodeCxSpMiddle",
  "CodeCxSpLast",
  "CodeCxSpFirstCxSpLast",
];

/// Markers that open a new listing.
const RUN_START_CLASSES: &[&str] = &["CodeCxSpFirst", "CodeCxSpFirstCxSpLast"];

/// Markers that close the current listing.
const RUN_END_CLASSES: &[&str] = &["CodeCxSpLast", "CodeCxSpFirstCxSpLast"];

/// The legacy representation a candidate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePattern {
  PreWithCode,
  StyledDiv,
  LineSequence,
}

/// A located code block awaiting replacement.
#[derive(Debug, Clone)]
pub struct CodeBlockCandidate<'a> {
  pub pattern: CodePattern,
  /// Code lines in document order.
  pub lines: Vec<String>,
  /// `class` attribute of the element carrying the code, when present.
  pub class_hint: Option<String>,
  /// Source nodes covered by this block; the first is replaced, the rest
  /// removed.
  pub span: Vec<NodeRef<'a>>,
}

impl CodeBlockCandidate<'_> {
  /// Classify the candidate and build its fence.
  pub fn to_fence(&self) -> ReplacementFence {
    let body = self.lines.join("\n");
    let language = match self.pattern {
      CodePattern::PreWithCode => classify(self.class_hint.as_deref(), &body),
      CodePattern::StyledDiv | CodePattern::LineSequence => classify(None, &body),
    };
    ReplacementFence { language, body }
  }
}

/// A fenced code block produced by reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementFence {
  pub language: LanguageTag,
  pub body: String,
}

impl ReplacementFence {
  /// Render as a Markdown fence.
  pub fn to_markdown(&self) -> String {
    let fence = fence_delimiter(&self.body);
    format!("\n{fence}{}\n{}\n{fence}\n", self.language.language, self.body)
  }

  /// Serialize as the placeholder element stored in the region.
  fn to_html(&self) -> String {
    format!(
      "<{FENCE_TAG} {FENCE_LANG_ATTR}=\"{}\">{}</{FENCE_TAG}>",
      self.language.language,
      escape_html(&self.body)
    )
  }
}

/// What reconstruction decided for one node.
#[derive(Debug)]
pub enum Reconstruction<'a> {
  /// The node starts a code block.
  Fence(CodeBlockCandidate<'a>),
  /// The node belongs to a line run started by an earlier sibling and emits
  /// nothing of its own.
  Absorbed,
  /// No pattern applies; the node is left for generic conversion.
  Untouched,
}

/// Decide how a single element is reconstructed.
///
/// `pre` and `div` patterns are checked before line runs, so a node matched by
/// either is never treated as part of a run.
pub fn reconstruct<'a>(node: &NodeRef<'a>) -> Reconstruction<'a> {
  if !node.is_element() {
    return Reconstruction::Untouched;
  }

  if let Some(candidate) = detect_pre_with_code(node).or_else(|| detect_styled_div(node)) {
    return Reconstruction::Fence(candidate);
  }

  if is_code_line(node) {
    let continues_run = !starts_run(node) && previous_code_line(node).is_some_and(|previous| !ends_run(&previous));
    if continues_run {
      return Reconstruction::Absorbed;
    }
    return Reconstruction::Fence(collect_line_sequence(node));
  }

  Reconstruction::Untouched
}

fn detect_pre_with_code<'a>(node: &NodeRef<'a>) -> Option<CodeBlockCandidate<'a>> {
  if !matches_tag(node, "pre") {
    return None;
  }

  let codes = Selection::from(*node).select("code");
  if codes.length() != 1 {
    return None;
  }
  let code = *codes.nodes().first()?;

  let text = preformatted_text(&code);
  Some(CodeBlockCandidate {
    pattern: CodePattern::PreWithCode,
    lines: text.split('\n').map(str::to_string).collect(),
    class_hint: get_attribute(&code, "class"),
    span: vec![*node],
  })
}

fn detect_styled_div<'a>(node: &NodeRef<'a>) -> Option<CodeBlockCandidate<'a>> {
  if !matches_tag(node, "div") {
    return None;
  }

  let flagged = STYLED_DIV_CLASSES.iter().any(|class| has_class(node, class))
    || Selection::from(*node).select(STYLED_DIV_NESTED).exists();
  if !flagged {
    return None;
  }

  let text = preformatted_text(node);
  Some(CodeBlockCandidate {
    pattern: CodePattern::StyledDiv,
    lines: text.trim().split('\n').map(str::to_string).collect(),
    class_hint: None,
    span: vec![*node],
  })
}

/// Whether a node is one paragraph of a line-per-paragraph code listing.
pub fn is_code_line(node: &NodeRef) -> bool {
  tag_name(node) == "p" && LINE_MARKER_CLASSES.iter().any(|class| has_class(node, class))
}

fn starts_run(node: &NodeRef) -> bool {
  RUN_START_CLASSES.iter().any(|class| has_class(node, class))
}

fn ends_run(node: &NodeRef) -> bool {
  RUN_END_CLASSES.iter().any(|class| has_class(node, class))
}

/// Nearest element sibling before `node`, if it is a code line.
///
/// Whitespace-only text between paragraphs is ignored; any other content
/// breaks the run.
fn previous_code_line<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
  let mut sibling = node.prev_sibling();
  while let Some(current) = sibling {
    if current.is_element() {
      return is_code_line(&current).then_some(current);
    }
    if current.is_text() && !current.text().trim().is_empty() {
      return None;
    }
    sibling = current.prev_sibling();
  }
  None
}

/// Walk forward from the first paragraph of a run, absorbing directly
/// following code lines.
///
/// The run stops after a `...Last` marker and before a `...First` one, so
/// adjacent listings become separate fences. `Middle` lines never end a run.
fn collect_line_sequence<'a>(first: &NodeRef<'a>) -> CodeBlockCandidate<'a> {
  let mut span = vec![*first];
  let mut sibling = if ends_run(first) { None } else { first.next_sibling() };

  while let Some(current) = sibling {
    if current.is_element() {
      if !is_code_line(&current) || starts_run(&current) {
        break;
      }
      span.push(current);
      if ends_run(&current) {
        break;
      }
    } else if current.is_text() && !current.text().trim().is_empty() {
      break;
    }
    sibling = current.next_sibling();
  }

  trace!("Line sequence spans {} paragraph(s)", span.len());

  CodeBlockCandidate {
    pattern: CodePattern::LineSequence,
    lines: span.iter().map(rendered_text).collect(),
    class_hint: None,
    span,
  }
}

/// Counts of reconstructed blocks by pattern.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructionStats {
  pub pre_with_code: usize,
  pub styled_div: usize,
  pub line_sequence: usize,
  pub absorbed: usize,
}

/// Replace every legacy code representation in the region with a fence.
///
/// # Arguments
/// * `region` - The content region to rewrite.
///
/// # Returns
/// The same region with code blocks replaced by `blog-fence` placeholders.
pub fn reconstruct_code(region: ContentRegion) -> ContentRegion {
  let mut stats = ReconstructionStats::default();

  if let Some(root) = region.root().nodes().first() {
    walk(root, &mut stats);
  }

  debug!(
    "Reconstructed code blocks: {} pre, {} div, {} line runs ({} lines absorbed)",
    stats.pre_with_code, stats.styled_div, stats.line_sequence, stats.absorbed
  );

  region
}

fn walk(node: &NodeRef, stats: &mut ReconstructionStats) {
  let mut consumed: HashSet<NodeId> = HashSet::new();

  // Children are snapshotted before any rewrite, so inserted fences are never
  // visited.
  for child in node.children() {
    if !child.is_element() || consumed.contains(&child.id) {
      continue;
    }

    match reconstruct(&child) {
      Reconstruction::Fence(candidate) => {
        match candidate.pattern {
          CodePattern::PreWithCode => stats.pre_with_code += 1,
          CodePattern::StyledDiv => stats.styled_div += 1,
          CodePattern::LineSequence => stats.line_sequence += 1,
        }

        let fence = candidate.to_fence();
        for absorbed in candidate.span.iter().skip(1) {
          consumed.insert(absorbed.id);
          stats.absorbed += 1;
          Selection::from(*absorbed).remove();
        }
        Selection::from(child).replace_with_html(fence.to_html());
      }
      Reconstruction::Absorbed => {
        stats.absorbed += 1;
        Selection::from(child).remove();
      }
      Reconstruction::Untouched => walk(&child, stats),
    }
  }
}
