//! Bounded retries for transient provider failures

use super::{CallDetails, CallProvider, CallRequest, ProviderError};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// How many extra attempts to make and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based): exponential, capped,
    /// with up to 25% random jitter on top.
    pub fn delay(&self, retry: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(1u32 << retry.saturating_sub(1).min(16));
        let capped = exp.min(self.max_delay);
        let jitter_cap = u64::try_from(capped.as_millis() / 4).unwrap_or(u64::MAX);
        let jitter = if jitter_cap == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_cap)
        };
        capped + Duration::from_millis(jitter)
    }
}

/// Retries retryable failures of the wrapped provider
pub struct RetryingProvider {
    inner: Arc<dyn CallProvider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn CallProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl CallProvider for RetryingProvider {
    async fn create_call(&self, request: &CallRequest) -> Result<CallDetails, ProviderError> {
        let mut retry = 0;
        loop {
            match self.inner.create_call(request).await {
                Ok(details) => return Ok(details),
                Err(e) if e.kind.is_retryable() && retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = e
                        .retry_after
                        .map_or_else(|| self.policy.delay(retry), |d| d.min(self.policy.max_delay));
                    tracing::warn!(
                        provider = %self.inner.name(),
                        attempt = retry,
                        max_retries = self.policy.max_retries,
                        delay_ms = %delay.as_millis(),
                        error = %e.message,
                        "Retrying call creation"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedProvider;
    use crate::provider::ProviderErrorKind;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn request() -> CallRequest {
        CallRequest {
            system_prompt: "p".to_string(),
            voice: "Mark".to_string(),
            tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_default_policy_does_not_retry() {
        let inner = Arc::new(ScriptedProvider::new());
        inner.queue_error(ProviderError::from_status(503, "busy"));
        inner.queue_call("late", "wss://late");
        let provider = RetryingProvider::new(inner.clone(), RetryPolicy::default());

        let err = provider.create_call(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::ServerError);
        assert_eq!(inner.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let inner = Arc::new(ScriptedProvider::new());
        inner.queue_error(ProviderError::network("reset"));
        inner.queue_error(ProviderError::from_status(502, "bad gateway"));
        inner.queue_call("abc", "wss://x");
        let provider = RetryingProvider::new(inner.clone(), fast_policy(2));

        let details = provider.create_call(&request()).await.unwrap();
        assert_eq!(details.call_id, "abc");
        assert_eq!(inner.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let inner = Arc::new(ScriptedProvider::new());
        for _ in 0..5 {
            inner.queue_error(ProviderError::timeout("slow"));
        }
        let provider = RetryingProvider::new(inner.clone(), fast_policy(2));

        let err = provider.create_call(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
        assert_eq!(inner.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let inner = Arc::new(ScriptedProvider::new());
        inner.queue_error(ProviderError::from_status(403, "nope"));
        inner.queue_call("abc", "wss://x");
        let provider = RetryingProvider::new(inner.clone(), fast_policy(3));

        let err = provider.create_call(&request()).await.unwrap_err();
        assert_eq!(err.detail(), "nope");
        assert_eq!(inner.recorded_requests().len(), 1);
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        };
        let first = policy.delay(1);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(125));
        let third = policy.delay(3);
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(500));
        let late = policy.delay(30);
        assert!(late >= Duration::from_secs(1) && late <= Duration::from_millis(1250));
    }
}
