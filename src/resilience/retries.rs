//! Retry on upstream throttling.
//!
//! # Responsibilities
//! - Resend a request while the upstream answers 429 Too Many Requests
//! - Sleep `base * 2^(attempt-1) + jitter` between attempts
//! - Give up after `max_retries` and return the last throttled response
//!
//! # Design Decisions
//! - Wraps any [`Transport`], so it composes with the real client and test fakes
//! - Transport errors are not retried here; they propagate on first occurrence
//! - Exhausting retries is not an error: callers treat a returned 429 as "no data"

use async_trait::async_trait;

use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::upstream::{Transport, TransportError, UpstreamRequest, UpstreamResponse};

/// Retry limits resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt. Zero means a single attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound (exclusive) of the random jitter in milliseconds.
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_jitter_ms: config.max_jitter_ms,
        }
    }
}

/// Transport decorator that retries throttled requests.
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn execute(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let mut attempt: u32 = 0;

        loop {
            let response = self.inner.execute(request).await?;

            if !response.is_rate_limited() || attempt >= self.policy.max_retries {
                if attempt > 0 {
                    tracing::debug!(
                        url = %request.url,
                        retries = attempt,
                        status = %response.status,
                        "Finished retrying upstream request"
                    );
                }
                return Ok(response);
            }

            attempt += 1;
            let delay =
                calculate_backoff(attempt, self.policy.base_delay_ms, self.policy.max_jitter_ms);
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                attempt,
                max_retries = self.policy.max_retries,
                delay = ?delay,
                "Upstream rate limited the request, retrying"
            );
            metrics::record_retry();
            tokio::time::sleep(delay).await;
        }
    }
}
