//! Voice-AI provider abstraction
//!
//! The provider hosts the call media and the model. We only ever ask it to
//! create a call; everything after that happens between the browser, the
//! provider and our tool callbacks.

mod error;
mod retry;
mod ultravox;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // Public API re-exports
pub use error::{ProviderError, ProviderErrorKind};
pub use retry::{RetryPolicy, RetryingProvider};
pub use ultravox::UltravoxClient;

use crate::tools::ToolDescriptor;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything needed to open a call in its first stage
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub system_prompt: String,
    pub voice: String,
    pub tools: Vec<Arc<ToolDescriptor>>,
}

/// Join details returned by the provider for a new call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDetails {
    pub call_id: String,
    pub join_url: String,
}

/// Common interface for call providers
#[async_trait]
pub trait CallProvider: Send + Sync {
    /// Create a call and return how to join it
    async fn create_call(&self, request: &CallRequest) -> Result<CallDetails, ProviderError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Logging wrapper for call providers
pub struct LoggingProvider {
    inner: Arc<dyn CallProvider>,
    name: String,
}

impl LoggingProvider {
    pub fn new(inner: Arc<dyn CallProvider>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl CallProvider for LoggingProvider {
    async fn create_call(&self, request: &CallRequest) -> Result<CallDetails, ProviderError> {
        let start = std::time::Instant::now();
        let result = self.inner.create_call(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(details) => {
                tracing::info!(
                    provider = %self.name,
                    duration_ms = %duration.as_millis(),
                    call_id = %details.call_id,
                    tools = request.tools.len(),
                    "Call created"
                );
            }
            Err(e) => {
                tracing::error!(
                    provider = %self.name,
                    duration_ms = %duration.as_millis(),
                    status = ?e.status,
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Call creation failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;

    fn request() -> CallRequest {
        CallRequest {
            system_prompt: "hello".to_string(),
            voice: "Mark".to_string(),
            tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_logging_provider_passes_results_through() {
        let inner = Arc::new(ScriptedProvider::new());
        inner.queue_call("abc", "wss://x");
        inner.queue_error(ProviderError::from_status(403, "forbidden"));
        let provider = LoggingProvider::new(inner.clone());

        assert_eq!(provider.name(), "scripted");
        assert_eq!(provider.create_call(&request()).await.unwrap().call_id, "abc");
        let err = provider.create_call(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Auth);
        assert_eq!(inner.recorded_requests().len(), 2);
    }
}
