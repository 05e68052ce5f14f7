//! blog-migrate - Migrate legacy blog posts to Markdown
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  blog_migrate::cli::run().await;
}
