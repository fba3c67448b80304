//! API request and response types

use crate::tools::SelectedTool;
use serde::{Deserialize, Serialize};

/// Header telling the provider a tool response replaces the stage
pub const RESPONSE_TYPE_HEADER: &str = "x-ultravox-response-type";
pub const NEW_STAGE: &str = "new-stage";

/// Body of a `navigateStage` invocation
#[derive(Debug, Deserialize)]
pub struct NavigateStageRequest {
    #[serde(rename = "stageName")]
    pub stage_name: String,
    pub call_id: String,
}

/// New prompt and tools for the stage the model asked for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStageResponse<'a> {
    pub system_prompt: &'a str,
    pub selected_tools: Vec<SelectedTool<'a>>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `unknown_stage`
    pub error: String,
    pub message: String,
    #[serde(rename = "stageName", skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            stage_name: None,
        }
    }

    #[must_use]
    pub fn with_stage_name(mut self, stage_name: impl Into<String>) -> Self {
        self.stage_name = Some(stage_name.into());
        self
    }
}
