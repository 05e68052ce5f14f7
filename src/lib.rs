//! Legacy blog migration library
//!
//! Fetches posts from a legacy blog, locates the article body, reconstructs
//! code blocks and converts everything to Markdown files with YAML
//! frontmatter.

pub mod blog;
pub mod cli;
pub mod color;
pub mod commands;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod markdown;
pub mod migrate;
pub mod post;
pub mod region;
