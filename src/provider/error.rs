//! Provider error types

use std::time::Duration;
use thiserror::Error;

/// Provider error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// HTTP status, when the provider answered at all
    pub status: Option<u16>,
    /// Raw response body, surfaced to the user unchanged
    pub body: Option<String>,
    pub retry_after: Option<Duration>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Decode, message)
    }

    /// Classify a non-201 answer from the provider
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let (kind, label) = match status {
            401 | 403 => (ProviderErrorKind::Auth, "Authentication failed"),
            429 => (ProviderErrorKind::RateLimit, "Rate limited"),
            400..=499 => (ProviderErrorKind::InvalidRequest, "Invalid request"),
            500..=599 => (ProviderErrorKind::ServerError, "Server error"),
            _ => (ProviderErrorKind::UnexpectedStatus, "Unexpected status"),
        };
        Self {
            kind,
            message: format!("{label} (HTTP {status}): {body}"),
            status: Some(status),
            body: Some(body),
            retry_after: None,
        }
    }

    /// Text to show the user: the provider's own words when we have them
    pub fn detail(&self) -> &str {
        match &self.body {
            Some(body) if !body.trim().is_empty() => body,
            _ => &self.message,
        }
    }
}

/// Error classification for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Connection failures - retryable
    Network,
    /// Request exceeded the configured timeout - retryable
    Timeout,
    /// Rate limited (429) - retryable with backoff
    RateLimit,
    /// Server error (5xx) - retryable
    ServerError,
    /// Authentication failed (401, 403) - not retryable
    Auth,
    /// Other 4xx - not retryable
    InvalidRequest,
    /// Any other status that is not 201
    UnexpectedStatus,
    /// 201 with a body we could not read
    Decode,
}

impl ProviderErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::RateLimit | Self::ServerError
        )
    }
}
