//! HTTP client for the legacy blog, plus retry with linear backoff.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::api::BlogApi;
use crate::error::MigrateError;

/// Blog HTTP client.
#[derive(Clone)]
pub struct BlogClient {
  client: reqwest::Client,
}

impl BlogClient {
  /// Create a new blog client.
  ///
  /// # Arguments
  /// * `timeout_secs` - Request timeout in seconds
  ///
  /// # Errors
  /// Returns an error if the underlying `reqwest::Client` cannot be built.
  pub fn new(timeout_secs: u64) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "blog-migrate/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self { client })
  }
}

#[async_trait]
impl BlogApi for BlogClient {
  async fn fetch_text(&self, url: &str) -> Result<String> {
    let response = self
      .client
      .get(url)
      .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
      .send()
      .await
      .with_context(|| format!("Failed to send request to {url}"))?;

    if !response.status().is_success() {
      let status = response.status();
      return Err(anyhow!("HTTP {status} for {url}"));
    }

    response
      .text()
      .await
      .with_context(|| format!("Failed to read response body from {url}"))
  }
}

/// How failed fetches are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts including the first; at least one attempt is always made.
  pub max_attempts: u32,
  /// Delay after the first failure; later delays grow linearly.
  pub base_delay: Duration,
  /// Upper bound for any single delay.
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      base_delay: Duration::from_secs(1),
      max_delay: Duration::from_secs(10),
    }
  }
}

impl RetryPolicy {
  /// Delay to wait after the given failed attempt (1-based).
  pub fn delay_after(&self, attempt: u32) -> Duration {
    self.base_delay.saturating_mul(attempt).min(self.max_delay)
  }
}

/// Fetch a URL, retrying failures with capped linear backoff.
///
/// # Arguments
/// * `api` - Client used for the requests.
/// * `url` - URL to fetch.
/// * `policy` - Attempt ceiling and delays.
///
/// # Errors
/// Returns [`MigrateError::Fetch`] with the last failure once every attempt
/// has failed.
pub async fn fetch_with_retry(api: &dyn BlogApi, url: &str, policy: &RetryPolicy) -> Result<String, MigrateError> {
  let attempts = policy.max_attempts.max(1);
  let mut attempt = 1;

  loop {
    debug!("Fetching {url} (attempt {attempt}/{attempts})");
    match api.fetch_text(url).await {
      Ok(body) => return Ok(body),
      Err(error) => {
        warn!("Attempt {attempt} failed for {url}: {error:#}");
        if attempt >= attempts {
          return Err(MigrateError::Fetch {
            url: url.to_string(),
            attempts,
            message: format!("{error:#}"),
          });
        }
        sleep(policy.delay_after(attempt)).await;
        attempt += 1;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use super::*;

  struct FlakyApi {
    failures: u32,
    calls: AtomicU32,
  }

  #[async_trait]
  impl BlogApi for FlakyApi {
    async fn fetch_text(&self, url: &str) -> Result<String> {
      let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
      if call <= self.failures {
        Err(anyhow!("HTTP 503 Service Unavailable for {url}"))
      } else {
        Ok("<html></html>".to_string())
      }
    }
  }

  fn instant_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
      max_attempts,
      base_delay: Duration::ZERO,
      max_delay: Duration::ZERO,
    }
  }

  #[test]
  fn test_delay_is_linear_and_capped() {
    let policy = RetryPolicy {
      max_attempts: 5,
      base_delay: Duration::from_secs(1),
      max_delay: Duration::from_secs(3),
    };
    assert_eq!(policy.delay_after(1), Duration::from_secs(1));
    assert_eq!(policy.delay_after(2), Duration::from_secs(2));
    assert_eq!(policy.delay_after(3), Duration::from_secs(3));
    assert_eq!(policy.delay_after(4), Duration::from_secs(3));
  }

  #[tokio::test]
  async fn test_retry_recovers_after_failures() {
    let api = FlakyApi {
      failures: 2,
      calls: AtomicU32::new(0),
    };
    let body = fetch_with_retry(&api, "https://example.com/p", &instant_policy(3)).await.unwrap();
    assert_eq!(body, "<html></html>");
    assert_eq!(api.calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_retry_gives_up_at_ceiling() {
    let api = FlakyApi {
      failures: 10,
      calls: AtomicU32::new(0),
    };
    let error = fetch_with_retry(&api, "https://example.com/p", &instant_policy(3))
      .await
      .unwrap_err();
    assert_eq!(api.calls.load(Ordering::SeqCst), 3);
    match error {
      MigrateError::Fetch { url, attempts, message } => {
        assert_eq!(url, "https://example.com/p");
        assert_eq!(attempts, 3);
        assert!(message.contains("503"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_zero_attempts_still_tries_once() {
    let api = FlakyApi {
      failures: 0,
      calls: AtomicU32::new(0),
    };
    assert!(fetch_with_retry(&api, "u", &instant_policy(0)).await.is_ok());
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
  }
}
