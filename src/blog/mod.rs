//! Blog module providing the fetch abstraction, the HTTP client with retry,
//! post models, feed and listing enumeration, and URL helpers.

pub mod api;
pub mod client;
pub mod dates;
pub mod feed;
pub mod listing;
pub mod models;
pub mod url;

pub use api::BlogApi;
pub use client::{BlogClient, RetryPolicy, fetch_with_retry};
pub use feed::{FeedItem, parse_feed};
pub use listing::{ListingPage, crawl_listing, parse_listing};
pub use models::{PostMetadata, PostRef, PostSource};
