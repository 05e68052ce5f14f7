//! Color utilities for terminal output
//!
//! Semantic styles for progress and summary lines, honoring `--color`.

use std::fmt::Display;
use std::io::IsTerminal;

use owo_colors::{OwoColorize, Style};

use crate::cli::ColorOption;

/// Color scheme for the application
pub struct ColorScheme {
  enabled: bool,
}

impl ColorScheme {
  /// Create a color scheme from the user preference; `auto` colors only when
  /// stdout is a terminal.
  pub fn new(color_option: ColorOption) -> Self {
    let enabled = match color_option {
      ColorOption::Always => true,
      ColorOption::Never => false,
      ColorOption::Auto => std::io::stdout().is_terminal(),
    };

    Self { enabled }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  fn paint<T: Display>(&self, text: T, style: Style) -> String {
    if self.enabled {
      format!("{}", text.style(style))
    } else {
      text.to_string()
    }
  }

  /// Style for success messages (green)
  pub fn success<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().green())
  }

  /// Style for error messages (bright red)
  pub fn error<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_red().bold())
  }

  /// Style for warnings and skipped posts (yellow)
  pub fn warning<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().yellow())
  }

  pub fn info<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().cyan())
  }

  /// Style for labels and titles (bright white, bold)
  pub fn emphasis<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_white().bold())
  }

  pub fn link<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().blue().underline())
  }

  pub fn path<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().magenta())
  }

  pub fn number<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_blue())
  }

  pub fn code<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_green())
  }

  pub fn dimmed<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().dimmed())
  }

  /// Style for progress markers (bright cyan)
  pub fn progress<T: Display>(&self, text: T) -> String {
    self.paint(text, Style::new().bright_cyan())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_color_scheme_disabled() {
    let scheme = ColorScheme::new(ColorOption::Never);
    assert!(!scheme.is_enabled());
    assert_eq!(scheme.success("ok"), "ok");
    assert_eq!(scheme.path("posts/a.md"), "posts/a.md");
  }

  #[test]
  fn test_color_scheme_enabled() {
    let scheme = ColorScheme::new(ColorOption::Always);
    assert!(scheme.is_enabled());
    assert_ne!(scheme.error("failed"), "failed");
    assert!(scheme.number(42).contains("42"));
  }
}
