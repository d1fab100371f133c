//! Retrying AI Provider - wrapper that bounds every model call.
//!
//! Each attempt runs under a timeout. Rate limits and transport failures
//! are retried with exponential backoff and jitter, honouring any
//! `retry-after` hint; everything else is returned at once.
//!
//! # Example
//!
//! ```ignore
//! let provider = RetryingAIProvider::new(ChatCompletionsProvider::new(config)?)
//!     .with_policy(RetryPolicy::default().with_max_attempts(5));
//! ```

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Backoff and timeout settings for model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after that.
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Budget for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            attempt_timeout: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn backoff(&self, retry: u32, retry_after_secs: Option<u32>) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let exponential = self.base_delay.saturating_mul(1u32 << exponent);
        let hinted = retry_after_secs
            .map(|secs| Duration::from_secs(u64::from(secs)))
            .unwrap_or_default();
        exponential.max(hinted).min(self.max_delay)
    }
}

/// Adds up to a quarter of `delay` on top of it.
fn with_jitter(delay: Duration) -> Duration {
    let spread = (delay.as_millis() / 4) as u64;
    if spread == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
}

/// AI provider wrapper with timeouts and bounded retries.
pub struct RetryingAIProvider<P: AIProvider> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: AIProvider> RetryingAIProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn attempt(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match tokio::time::timeout(self.policy.attempt_timeout, self.inner.complete(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(AIError::Timeout {
                timeout_secs: self.policy.attempt_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl<P: AIProvider + 'static> AIProvider for RetryingAIProvider<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match self.attempt(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= max_attempts {
                tracing::warn!(
                    session_id = %request.metadata.session_id,
                trace_id = %request.metadata.trace_id,
                    attempts = attempt,
                    error = %err,
                    "model call failed after all retries"
                );
                return Err(AIError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = with_jitter(self.policy.backoff(attempt, err.retry_after_secs()));
            tracing::warn!(
                session_id = %request.metadata.session_id,
                trace_id = %request.metadata.trace_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying model call"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}
