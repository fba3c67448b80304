//! `navigateStage` tool: lets the model move the call to another stage

use super::{AutomaticParameter, DynamicParameter, HttpMethod, ParamType, ToolBuildError, ToolDescriptor};
use crate::stages::StageId;

pub const NAVIGATE_STAGE_PATH: &str = "/navigateStage";

/// Build the stage-navigation tool pointing at `base_url`
pub fn navigate_stage_tool(base_url: &str) -> Result<ToolDescriptor, ToolBuildError> {
    ToolDescriptor::builder(
        "navigateStage",
        "After determining if a new stage is necessary, call this tool to navigate to the next appropriate stage.",
    )
    .dynamic(
        DynamicParameter::required("stageName", ParamType::String, "The stage to navigate to")
            .one_of(StageId::ALL.iter().map(|id| id.as_str())),
    )
    .automatic(AutomaticParameter::call_id())
    .callback(base_url, NAVIGATE_STAGE_PATH, HttpMethod::Post)
    .build()
}
