//! Version/metadata reporting for `blog-migrate version`.

use serde::Serialize;

use crate::color::ColorScheme;

/// Build metadata embedded by `build.rs`.
#[derive(Debug, Serialize)]
struct BuildInfo {
  version: &'static str,
  git_commit: &'static str,
  build_timestamp: String,
  target: &'static str,
  rust_version: &'static str,
}

impl BuildInfo {
  fn current() -> Self {
    Self {
      version: env!("CARGO_PKG_VERSION"),
      git_commit: env!("GIT_HASH"),
      build_timestamp: format_timestamp(env!("BUILD_TIMESTAMP")),
      target: env!("TARGET"),
      rust_version: env!("RUSTC_VERSION"),
    }
  }
}

/// Render version and build metadata in JSON or human-readable form.
///
/// # Arguments
/// * `json` - When `true`, emit a JSON document instead of colored text.
/// * `short` - When `true`, print only the semantic version string.
/// * `colors` - Shared color palette for styled terminal output.
pub(crate) fn handle_version_command(json: bool, short: bool, colors: &ColorScheme) {
  let info = BuildInfo::current();

  if short {
    println!("{}", info.version);
    return;
  }

  if json {
    match serde_json::to_string_pretty(&info) {
      Ok(rendered) => println!("{rendered}"),
      Err(e) => eprintln!("{} {e}", colors.error("Error:")),
    }
    return;
  }

  println!("{} {}", colors.emphasis("blog-migrate"), colors.number(info.version));
  println!("{}: {}", colors.emphasis("Git commit"), colors.code(info.git_commit));
  println!("{}: {}", colors.emphasis("Built"), colors.dimmed(&info.build_timestamp));
  println!("{}: {}", colors.emphasis("Target"), info.target);
  println!("{}: {}", colors.emphasis("Rust version"), info.rust_version);
}

/// Convert Unix epoch seconds into an ISO-8601 UTC string, or return the raw
/// input when it does not parse.
fn format_timestamp(timestamp: &str) -> String {
  timestamp
    .parse::<i64>()
    .ok()
    .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    .unwrap_or_else(|| timestamp.to_string())
}
