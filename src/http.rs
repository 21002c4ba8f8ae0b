//! Retry-wrapped HTTP GET.
//!
//! Every failed attempt (transport error or non-2xx status) is followed by an
//! exponential backoff sleep of `backoff_factor * 2^attempt` seconds, without
//! jitter. Exhausting the budget yields `None` rather than an error: callers
//! decide what a missing response means.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;

/// Attempt budget and backoff schedule for a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    retries: u32,
    backoff_factor: f64,
    timeout: Duration,
}

impl RetryPolicy {
    /// Creates a policy making at most `retries` attempts (at least one).
    pub fn new(retries: u32, backoff_factor: f64, timeout: Duration) -> Self {
        Self {
            retries: retries.max(1),
            backoff_factor: backoff_factor.max(0.0),
            timeout,
        }
    }

    /// Total number of attempts.
    pub fn attempts(&self) -> u32 {
        self.retries
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sleep after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_factor * 2f64.powi(exponent))
            .unwrap_or(Duration::MAX)
    }

    /// Drives `op` until it succeeds or the budget runs out.
    ///
    /// `op` receives the 0-based attempt index. `context` is only used in log
    /// messages.
    pub async fn run<T, E, F, Fut>(&self, context: &str, mut op: F) -> Option<T>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        for attempt in 0..self.retries {
            match op(attempt).await {
                Ok(value) => return Some(value),
                Err(e) => {
                    tracing::warn!("Request failed for attempt {}: {}", attempt, e);
                    if attempt + 1 == self.retries {
                        tracing::warn!(
                            "Giving up on {} after {} attempts",
                            context,
                            self.retries
                        );
                        return None;
                    }

                    let delay = self.delay_for(attempt);
                    tracing::info!("Sleeping {:.2} seconds before retrying", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
            }
        }

        None
    }
}

/// Thin wrapper around a shared `reqwest::Client` adding retried GETs.
#[derive(Clone, Default)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    /// Creates a client around an existing reqwest client.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET `url` with query `params`, retrying per `policy`.
    ///
    /// Returns the first response with a success status, or `None` once every
    /// attempt has failed.
    pub async fn get_with_retry(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &HeaderMap,
        policy: &RetryPolicy,
    ) -> Option<reqwest::Response> {
        let context = format!("{} {:?}", url, params);
        policy
            .run(&context, move |_| async move {
                self.http
                    .get(url)
                    .query(params)
                    .headers(headers.clone())
                    .timeout(policy.timeout())
                    .send()
                    .await?
                    .error_for_status()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::header::{HeaderValue, ACCEPT};
    use std::cell::Cell;

    fn policy(retries: u32, backoff_factor: f64) -> RetryPolicy {
        RetryPolicy::new(retries, backoff_factor, Duration::from_secs(5))
    }

    #[test]
    fn test_delay_schedule() {
        let p = policy(5, 0.5);
        assert_eq!(p.delay_for(0), Duration::from_millis(500));
        assert_eq!(p.delay_for(1), Duration::from_secs(1));
        assert_eq!(p.delay_for(2), Duration::from_secs(2));
        assert_eq!(p.delay_for(3), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        assert_eq!(policy(0, 1.0).attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_exact_attempt_count() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result: Option<()> = policy(4, 1.0)
            .run("test", |_| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>("boom") }
            })
            .await;

        assert!(result.is_none());
        assert_eq!(calls.get(), 4);
        // Sleeps after attempts 0, 1 and 2 only: 1 + 2 + 4 seconds.
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_first_success() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = policy(5, 0.5)
            .run("test", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 2 {
                        Err("not yet")
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Some(2));
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_get_with_retry_sends_params_and_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/match")
                    .query_param("zipcode", "9000")
                    .header("accept", "application/json");
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = HttpClient::default()
            .get_with_retry(
                &server.url("/match"),
                &[("zipcode", "9000")],
                &headers,
                &policy(3, 0.0),
            )
            .await;

        assert!(response.is_some());
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_get_with_retry_gives_up_on_server_errors() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/match");
                then.status(503);
            })
            .await;

        let response = HttpClient::default()
            .get_with_retry(&server.url("/match"), &[], &HeaderMap::new(), &policy(3, 0.0))
            .await;

        assert!(response.is_none());
        mock.assert_hits_async(3).await;
    }
}
