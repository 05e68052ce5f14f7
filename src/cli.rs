//! Command-line interface definitions for blog-migrate.
//!
//! Arguments are grouped into flattened option structs; [`run`] parses them,
//! sets up logging and dispatches to the handlers in [`crate::commands`].

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::blog::RetryPolicy;
use crate::blog::url::{default_feed_url, parse_blog_url};
use crate::color::ColorScheme;
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::convert::handle_convert_command;
use crate::commands::ls::handle_ls_command;
use crate::commands::migrate::handle_migrate_command;
use crate::commands::version::handle_version_command;
use crate::frontmatter::DEFAULT_TAG;
use crate::markdown::MarkdownOptions;
use crate::migrate::{MigrateOptions, SourceConfig};
use crate::post::AssembleOptions;

/// blog-migrate - Migrate legacy blog posts to Markdown
#[derive(Debug, Parser)]
#[command(
  name = "blog-migrate",
  version,
  about = "Migrate legacy blog posts to Markdown",
  long_about = "Fetches posts from a legacy blog via its RSS feed or by crawling listing pages,\n\
                reconstructs code blocks and writes one Markdown file with frontmatter per post.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute; without one the migration runs
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Source options
  #[command(flatten)]
  pub source: SourceOptions,

  /// Output options
  #[command(flatten)]
  pub output: OutputOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,

  /// Performance options
  #[command(flatten)]
  pub performance: PerformanceOptions,
}

/// Subcommands for inspection and one-off conversion
#[derive(Debug, Subcommand)]
pub enum Command {
  /// List the posts that would be migrated and their target files
  Ls {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Convert a saved post page and print the resulting document
  Convert {
    /// HTML file of a single post page
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// URL the page was saved from
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Title to use instead of the one found on the page
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

fn parse_url_arg(raw: &str) -> Result<Url, String> {
  parse_blog_url(raw).map_err(|e| format!("{e:#}"))
}

/// How posts are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
  /// Read the RSS feed
  Feed,
  /// Crawl paginated listing pages
  Crawl,
}

/// Source options
#[derive(Debug, Parser)]
pub struct SourceOptions {
  /// Blog root URL
  #[arg(long, env = "BLOG_URL", value_name = "URL", value_parser = parse_url_arg)]
  pub blog_url: Option<Url>,

  /// RSS feed URL (defaults to <blog-url>/rss.aspx)
  #[arg(long, env = "BLOG_FEED_URL", value_name = "URL", value_parser = parse_url_arg)]
  pub feed_url: Option<Url>,

  /// How to enumerate posts
  #[arg(long, value_enum, default_value = "feed", value_name = "SOURCE")]
  pub source: SourceKind,

  /// Maximum listing pages to visit when crawling
  #[arg(long, default_value = "50", value_name = "N")]
  pub max_pages: usize,
}

/// Output options
#[derive(Debug, Parser)]
pub struct OutputOptions {
  /// Output directory
  #[arg(short, long, default_value = "./posts", value_name = "DIR")]
  pub output: String,

  /// Tag used for posts without categories
  #[arg(long, default_value = DEFAULT_TAG, value_name = "TAG")]
  pub default_tag: String,

  /// Render Markdown tables without padding columns for alignment
  #[arg(long)]
  pub compact_tables: bool,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Convert posts without writing any file
  #[arg(long)]
  pub dry_run: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Performance options
#[derive(Debug, Parser)]
pub struct PerformanceOptions {
  /// Pause between post fetches in milliseconds
  #[arg(long, default_value = "500", value_name = "MS")]
  pub delay_ms: u64,

  /// Attempts per request, including the first
  #[arg(long, default_value = "3", value_name = "N")]
  pub retries: u32,

  /// Request timeout in seconds
  #[arg(long, default_value = "30", value_name = "SECONDS")]
  pub timeout: u64,
}

impl PerformanceOptions {
  pub fn delay(&self) -> Duration {
    Duration::from_millis(self.delay_ms)
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.retries,
      ..RetryPolicy::default()
    }
  }
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Whether the selected command talks to the blog.
  fn needs_source(&self) -> bool {
    matches!(self.command, None | Some(Command::Ls { .. }))
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.needs_source() {
      match self.source.source {
        SourceKind::Feed if self.source.blog_url.is_none() && self.source.feed_url.is_none() => {
          return Err("--blog-url or --feed-url is required (or set BLOG_URL / BLOG_FEED_URL)".to_string());
        }
        SourceKind::Crawl if self.source.blog_url.is_none() => {
          return Err("--blog-url is required when crawling".to_string());
        }
        _ => {}
      }
    }

    if self.source.max_pages == 0 {
      return Err("--max-pages must be at least 1".to_string());
    }

    if self.performance.retries == 0 {
      return Err("--retries must be at least 1".to_string());
    }

    if self.performance.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    if self.output.default_tag.trim().is_empty() {
      return Err("--default-tag must not be empty".to_string());
    }

    Ok(())
  }

  /// Resolve where posts are enumerated from.
  ///
  /// # Errors
  /// Returns an error when the required URL is missing or the feed URL cannot
  /// be derived.
  pub fn source_config(&self) -> Result<SourceConfig> {
    match self.source.source {
      SourceKind::Feed => {
        let feed_url = match (&self.source.feed_url, &self.source.blog_url) {
          (Some(feed_url), _) => feed_url.clone(),
          (None, Some(blog_url)) => default_feed_url(blog_url)?,
          (None, None) => return Err(anyhow!("No blog or feed URL configured")),
        };
        Ok(SourceConfig::Feed { feed_url })
      }
      SourceKind::Crawl => {
        let start = self
          .source
          .blog_url
          .clone()
          .ok_or_else(|| anyhow!("No blog URL configured"))?;
        Ok(SourceConfig::Crawl {
          start,
          max_pages: self.source.max_pages,
        })
      }
    }
  }

  /// Conversion settings shared by every command.
  pub fn assemble_options(&self) -> AssembleOptions {
    AssembleOptions {
      markdown: MarkdownOptions {
        compact_tables: self.output.compact_tables,
        ..MarkdownOptions::default()
      },
      default_tag: self.output.default_tag.trim().to_string(),
    }
  }

  /// Settings for a migration run.
  pub fn migrate_options(&self) -> MigrateOptions {
    MigrateOptions {
      output_dir: PathBuf::from(&self.output.output),
      assemble: self.assemble_options(),
      retry: self.performance.retry_policy(),
      delay: self.performance.delay(),
      dry_run: self.behavior.dry_run,
    }
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  // Validate CLI arguments
  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    None => handle_migrate_command(&cli, &colors).await,
    Some(Command::Ls { json }) => handle_ls_command(*json, &cli, &colors).await,
    Some(Command::Convert { file, url, title }) => {
      handle_convert_command(file, url.as_deref(), title.as_deref(), &cli, &colors).await;
    }
    Some(Command::Version { json, short }) => handle_version_command(*json, *short, &colors),
    Some(Command::Completions { shell }) => handle_completions_command(*shell),
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
