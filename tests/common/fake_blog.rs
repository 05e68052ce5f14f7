//! Fake blog client for testing
//!
//! Serves predefined pages from memory, records every request, and can be
//! told to fail a URL a number of times before answering.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use blog_migrate::blog::BlogApi;

/// A fake blog that returns predefined responses for testing
#[derive(Default)]
pub struct FakeBlogClient {
  pages: HashMap<String, String>,
  failures: Mutex<HashMap<String, u32>>,
  requests: Mutex<Vec<String>>,
}

impl FakeBlogClient {
  /// Create a fake blog with no pages
  pub fn new() -> Self {
    Self::default()
  }

  /// Serve `body` at `url`
  pub fn add_page(&mut self, url: &str, body: impl Into<String>) {
    self.pages.insert(url.to_string(), body.into());
  }

  /// Fail the next `times` requests for `url` with a server error
  pub fn fail_times(&mut self, url: &str, times: u32) {
    self.failures.get_mut().unwrap().insert(url.to_string(), times);
  }

  /// Every URL requested so far, in order
  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }

  /// How many times `url` was requested
  pub fn request_count(&self, url: &str) -> usize {
    self.requests().iter().filter(|requested| *requested == url).count()
  }
}

#[async_trait]
impl BlogApi for FakeBlogClient {
  async fn fetch_text(&self, url: &str) -> Result<String> {
    self.requests.lock().unwrap().push(url.to_string());

    {
      let mut failures = self.failures.lock().unwrap();
      if let Some(remaining) = failures.get_mut(url)
        && *remaining > 0
      {
        *remaining -= 1;
        return Err(anyhow!("HTTP 503 Service Unavailable for {url}"));
      }
    }

    self
      .pages
      .get(url)
      .cloned()
      .ok_or_else(|| anyhow!("HTTP 404 Not Found for {url}"))
  }
}
