// src/fetch/page.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub const MAX_RETRIES: u32 = 3;
pub const INITIAL_BACKOFF_MS: u64 = 500;

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// Delay before retry number `attempt` (1-based), doubling each time.
/// Attempt 0 is treated as the first retry.
pub fn backoff_delay(initial_backoff_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(initial_backoff_ms.saturating_mul(factor))
}

/// GET `url` as text, retrying with exponential backoff.
pub async fn get_text_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff_ms: u64,
) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries => {
                attempts += 1;
                let backoff = backoff_delay(initial_backoff_ms, attempts);
                warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                sleep(backoff).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}

/// Fetch a page body with the default retry policy.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    let body = get_text_with_retry(client, url, MAX_RETRIES, INITIAL_BACKOFF_MS).await?;
    debug!(bytes = body.len(), "fetched page");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_attempt_zero_and_overflow() {
        assert_eq!(backoff_delay(500, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 200), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_after_retries() {
        let client = Client::new();
        // port 9 on localhost: nothing listens there, connection is refused fast
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = get_text_with_retry(&client, &url, 1, 1).await.unwrap_err();
        assert!(format!("{:#}", err).contains("GET http://127.0.0.1:9/ failed"));
    }
}
