//! Ultravox REST client

use super::{CallDetails, CallProvider, CallRequest, ProviderError};
use crate::tools::SelectedTool;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Creates calls through `POST {api_url}/calls`
pub struct UltravoxClient {
    client: Client,
    api_key: String,
    calls_url: String,
}

impl UltravoxClient {
    pub fn new(api_url: &str, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            calls_url: format!("{}/calls", api_url.trim_end_matches('/')),
        })
    }

    fn translate_request(request: &CallRequest) -> UltravoxCreateCall<'_> {
        UltravoxCreateCall {
            system_prompt: &request.system_prompt,
            voice: &request.voice,
            selected_tools: request
                .tools
                .iter()
                .map(|t| SelectedTool::from(t.as_ref()))
                .collect(),
        }
    }

    fn classify_error(status: StatusCode, retry_after: Option<&str>, body: &str) -> ProviderError {
        let err = ProviderError::from_status(status.as_u16(), body);
        match retry_after.and_then(|v| v.trim().parse::<u64>().ok()) {
            Some(secs) if status == StatusCode::TOO_MANY_REQUESTS => {
                err.with_retry_after(Duration::from_secs(secs))
            }
            _ => err,
        }
    }
}

#[async_trait]
impl CallProvider for UltravoxClient {
    async fn create_call(&self, request: &CallRequest) -> Result<CallDetails, ProviderError> {
        let response = self
            .client
            .post(&self.calls_url)
            .header("X-API-Key", &self.api_key)
            .json(&Self::translate_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(format!("Request timeout: {e}"))
                } else {
                    ProviderError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read response: {e}")))?;

        // Only 201 Created means the call exists
        if status != StatusCode::CREATED {
            return Err(Self::classify_error(status, retry_after.as_deref(), &body));
        }

        let call: UltravoxCall = serde_json::from_str(&body).map_err(|e| {
            ProviderError::decode(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Ok(CallDetails {
            call_id: call.call_id,
            join_url: call.join_url,
        })
    }

    fn name(&self) -> &'static str {
        "ultravox"
    }
}

// Ultravox API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UltravoxCreateCall<'a> {
    system_prompt: &'a str,
    voice: &'a str,
    selected_tools: Vec<SelectedTool<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UltravoxCall {
    call_id: String,
    join_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;
    use crate::tools::navigate_stage_tool;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Local stand-in for the provider answering every call with a fixed reply
    async fn fake_ultravox(status: u16, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/api/calls",
                post(
                    move |State(seen): State<Seen>, headers: HeaderMap, Json(payload): Json<Value>| async move {
                        let key = headers
                            .get("x-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.lock().unwrap().push((key, payload));
                        (axum::http::StatusCode::from_u16(status).unwrap(), body)
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api"), seen)
    }

    fn greeting_request() -> CallRequest {
        CallRequest {
            system_prompt: "Greet the caller".to_string(),
            voice: "Mark".to_string(),
            tools: vec![Arc::new(navigate_stage_tool("https://tools.example.test").unwrap())],
        }
    }

    fn client(api_url: &str) -> UltravoxClient {
        UltravoxClient::new(api_url, "test-key".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_created_call_is_decoded() {
        let (url, seen) = fake_ultravox(201, r#"{"callId":"abc","joinUrl":"wss://x","created":"now"}"#).await;

        let details = client(&url).create_call(&greeting_request()).await.unwrap();
        assert_eq!(details.call_id, "abc");
        assert_eq!(details.join_url, "wss://x");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (key, payload) = &seen[0];
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(payload["systemPrompt"], json!("Greet the caller"));
        assert_eq!(payload["voice"], json!("Mark"));
        assert_eq!(
            payload["selectedTools"][0]["temporaryTool"]["modelToolName"],
            json!("navigateStage")
        );
    }

    #[tokio::test]
    async fn test_forbidden_surfaces_provider_text() {
        let (url, _) = fake_ultravox(403, r#"{"detail":"Invalid API key"}"#).await;

        let err = client(&url).create_call(&greeting_request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Auth);
        assert_eq!(err.status, Some(403));
        assert_eq!(err.detail(), r#"{"detail":"Invalid API key"}"#);
    }

    #[tokio::test]
    async fn test_plain_ok_is_not_created() {
        let (url, _) = fake_ultravox(200, r#"{"callId":"abc","joinUrl":"wss://x"}"#).await;

        let err = client(&url).create_call(&greeting_request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::UnexpectedStatus);
    }

    #[tokio::test]
    async fn test_created_with_garbage_body() {
        let (url, _) = fake_ultravox(201, "not json").await;

        let err = client(&url).create_call(&greeting_request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Decode);
        assert!(err.message.contains("not json"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/api"))
            .create_call(&greeting_request())
            .await
            .unwrap_err();
        assert!(err.kind.is_retryable());
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let app = Router::new().route(
            "/api/calls",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                (axum::http::StatusCode::CREATED, r#"{"callId":"late","joinUrl":"wss://x"}"#)
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = UltravoxClient::new(
            &format!("http://{addr}/api"),
            "test-key".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.create_call(&greeting_request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
        assert!(err.kind.is_retryable());
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_retry_after_only_for_rate_limits() {
        let err = UltravoxClient::classify_error(StatusCode::TOO_MANY_REQUESTS, Some("7"), "slow down");
        assert_eq!(err.retry_after, Some(Duration::from_secs(7)));

        let err = UltravoxClient::classify_error(StatusCode::SERVICE_UNAVAILABLE, Some("7"), "down");
        assert_eq!(err.retry_after, None);
    }
}
