//! Scripted provider for tests
//!
//! Answers `create_call` from a queue and records every request it saw.

use super::{CallDetails, CallProvider, CallRequest, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<CallDetails, ProviderError>>>,
    requests: Mutex<Vec<CallRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful call creation
    pub fn queue_call(&self, call_id: &str, join_url: &str) {
        self.responses.lock().unwrap().push_back(Ok(CallDetails {
            call_id: call_id.to_string(),
            join_url: join_url.to_string(),
        }));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: ProviderError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<CallRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallProvider for ScriptedProvider {
    async fn create_call(&self, request: &CallRequest) -> Result<CallDetails, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::network("No scripted response queued")))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
