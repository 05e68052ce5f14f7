//! Best-effort language detection for fenced code blocks.
//!
//! Class hints are checked first, then a fixed sequence of text heuristics.
//! The heuristics lean towards C# because most of the migrated corpus is C#.
//! Both tables are evaluated strictly in order and the first hit wins.

use std::fmt;

/// Language tag written after the opening fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
  CSharp,
  JavaScript,
  TypeScript,
  Python,
  Sql,
  Html,
  Xml,
  Json,
  Bash,
  PowerShell,
  Unknown,
}

impl Language {
  /// The info string emitted after the opening backticks.
  pub fn as_str(&self) -> &'static str {
    match self {
      Language::CSharp => "csharp",
      Language::JavaScript => "javascript",
      Language::TypeScript => "typescript",
      Language::Python => "python",
      Language::Sql => "sql",
      Language::Html => "html",
      Language::Xml => "xml",
      Language::Json => "json",
      Language::Bash => "bash",
      Language::PowerShell => "powershell",
      Language::Unknown => "",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a [`Language`] was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMethod {
  /// Matched a fragment of the element's `class` attribute.
  ExplicitClass,
  /// Derived from the code text itself (or nothing matched).
  ContentHeuristic,
}

/// Result of classifying a code sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageTag {
  pub language: Language,
  pub method: ClassificationMethod,
}

/// Class fragments in priority order. `cs` sits with C# so that C# wins every
/// tie against the later entries.
const CLASS_HINTS: &[(&[&str], Language)] = &[
  (&["csharp", "cs"], Language::CSharp),
  (&["javascript", "js"], Language::JavaScript),
  (&["typescript", "ts"], Language::TypeScript),
  (&["python"], Language::Python),
  (&["sql"], Language::Sql),
  (&["xml", "html"], Language::Html),
  (&["json"], Language::Json),
  (&["bash", "shell"], Language::Bash),
  (&["powershell"], Language::PowerShell),
];

type Heuristic = fn(&str) -> bool;

/// Content heuristics in priority order.
const CONTENT_HEURISTICS: &[(Heuristic, Language)] = &[
  (looks_like_csharp, Language::CSharp),
  (looks_like_javascript, Language::JavaScript),
  (looks_like_typescript, Language::TypeScript),
  (looks_like_sql, Language::Sql),
  (looks_like_xml, Language::Xml),
  (looks_like_python, Language::Python),
];

fn looks_like_csharp(text: &str) -> bool {
  ["namespace ", "using System", "public class ", "private ", "protected "]
    .iter()
    .any(|marker| text.contains(marker))
}

fn looks_like_javascript(text: &str) -> bool {
  text.contains("function ") && text.contains("const ")
}

fn looks_like_typescript(text: &str) -> bool {
  (text.contains("interface ") && text.contains('{') && text.contains(": "))
    || text.contains("export interface ")
    || [": string", ": number", ": boolean"]
      .iter()
      .any(|marker| text.contains(marker))
}

fn looks_like_sql(text: &str) -> bool {
  ["SELECT ", "FROM ", "WHERE "].iter().all(|keyword| text.contains(keyword))
}

fn looks_like_xml(text: &str) -> bool {
  text.contains("<?xml") || text.contains("<html")
}

fn looks_like_python(text: &str) -> bool {
  text.contains("def ") && text.contains(':') && !text.contains(';')
}

/// Classify a code sample.
///
/// # Arguments
/// * `explicit_hint` - The `class` attribute of the code element, if any.
/// * `sample_text` - The code text used for heuristic detection.
///
/// # Returns
/// The detected [`LanguageTag`]; [`Language::Unknown`] when nothing matched.
pub fn classify(explicit_hint: Option<&str>, sample_text: &str) -> LanguageTag {
  if let Some(language) = explicit_hint.and_then(classify_hint) {
    return LanguageTag {
      language,
      method: ClassificationMethod::ExplicitClass,
    };
  }

  LanguageTag {
    language: detect_from_content(sample_text),
    method: ClassificationMethod::ContentHeuristic,
  }
}

/// Match a class attribute against [`CLASS_HINTS`].
fn classify_hint(hint: &str) -> Option<Language> {
  let hint = hint.trim().to_ascii_lowercase();
  if hint.is_empty() {
    return None;
  }

  CLASS_HINTS
    .iter()
    .find(|(fragments, _)| fragments.iter().any(|fragment| hint.contains(fragment)))
    .map(|(_, language)| *language)
}

/// Run the content heuristics against a code sample.
pub fn detect_from_content(text: &str) -> Language {
  if text.is_empty() {
    return Language::Unknown;
  }

  CONTENT_HEURISTICS
    .iter()
    .find(|(check, _)| check(text))
    .map(|(_, language)| *language)
    .unwrap_or(Language::Unknown)
}
