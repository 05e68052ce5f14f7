//! Build script for blog-migrate
//!
//! Embeds version and build metadata for the `version` subcommand and the
//! HTTP user agent

use std::env;
use std::process::Command;

/// Entry point for the build script.
fn main() {
  embed_build_info();
  set_rerun_conditions();
}

/// Emits `GIT_HASH`, `BUILD_TIMESTAMP`, `TARGET` and `RUSTC_VERSION` as
/// compile-time environment variables.
fn embed_build_info() {
  // Git commit hash, or "unknown" outside a repository
  let git_hash = Command::new("git")
    .args(["rev-parse", "--short", "HEAD"])
    .output()
    .ok()
    .filter(|output| output.status.success())
    .map(|output| String::from_utf8(output.stdout).unwrap_or_default().trim().to_string())
    .unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=GIT_HASH={git_hash}");

  // Build time as a Unix timestamp
  println!(
    "cargo:rustc-env=BUILD_TIMESTAMP={}",
    std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .unwrap()
      .as_secs()
  );

  println!("cargo:rustc-env=TARGET={}", env::var("TARGET").unwrap_or_default());

  // rustc version, or "unknown"
  let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
  if let Ok(output) = Command::new(rustc).arg("--version").output() {
    let rustc_version = String::from_utf8(output.stdout).unwrap_or_default().trim().to_string();
    println!("cargo:rustc-env=RUSTC_VERSION={rustc_version}");
  } else {
    println!("cargo:rustc-env=RUSTC_VERSION=unknown");
  }
}

/// Re-run when this script, the checked-out commit or the target changes.
fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
  println!("cargo:rerun-if-env-changed=TARGET");
}
