//! Starting a call
//!
//! A new call always opens in the GREETING stage. From then on the provider
//! keeps track of the stage; we do not remember the call at all.

use crate::provider::{CallDetails, CallProvider, CallRequest, ProviderError};
use crate::stages::{StageId, StageRegistry};
use std::sync::Arc;

pub struct CallBootstrap {
    registry: Arc<StageRegistry>,
    provider: Arc<dyn CallProvider>,
    voice: String,
}

impl CallBootstrap {
    pub fn new(registry: Arc<StageRegistry>, provider: Arc<dyn CallProvider>, voice: impl Into<String>) -> Self {
        Self {
            registry,
            provider,
            voice: voice.into(),
        }
    }

    /// Ask the provider for a new call configured with the first stage
    pub async fn start_call(&self) -> Result<CallDetails, ProviderError> {
        let stage = self.registry.stage(StageId::Greeting);
        let request = CallRequest {
            system_prompt: stage.system_prompt,
            voice: self.voice.clone(),
            tools: stage.tools,
        };
        self.provider.create_call(&request).await
    }
}
