//! Conversation stages and the registry the transition handler reads
//!
//! The provider tracks which stage a call is in; this process only answers
//! "what does stage X look like". The registry is built once at startup and
//! never mutated, so handlers share it through an `Arc` without locking.

mod prompts;

#[cfg(test)]
mod proptests;

pub use prompts::{Clock, SystemClock};
#[cfg(test)]
pub use prompts::FixedClock;

use crate::tools::{navigate_stage_tool, schedule_event_tool, SelectedTool, ToolBuildError, ToolDescriptor};
use prompts::PromptTemplate;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Fixed set of conversation stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    Greeting,
    Schedule,
    Reschedule,
}

impl StageId {
    pub const ALL: [StageId; 3] = [StageId::Greeting, StageId::Schedule, StageId::Reschedule];

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Greeting => "GREETING",
            StageId::Schedule => "SCHEDULE",
            StageId::Reschedule => "RESCHEDULE",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownStage {
                stage_name: s.to_string(),
            })
    }
}

/// A stage name that is not in the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage '{stage_name}'")]
pub struct UnknownStage {
    pub stage_name: String,
}

/// A resolved stage: prompt rendered for today, tools in model order
#[derive(Debug, Clone)]
pub struct Stage {
    pub id: StageId,
    pub system_prompt: String,
    pub tools: Vec<Arc<ToolDescriptor>>,
}

impl Stage {
    pub fn selected_tools(&self) -> Vec<SelectedTool<'_>> {
        self.tools.iter().map(|t| SelectedTool::from(t.as_ref())).collect()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

/// Read-only mapping from stage id to prompt and tools
pub struct StageRegistry {
    navigate_stage: Arc<ToolDescriptor>,
    schedule_event: Arc<ToolDescriptor>,
    clock: Arc<dyn Clock>,
}

impl StageRegistry {
    /// Build the registry with tool callbacks rooted at `tool_base_url`
    pub fn new(tool_base_url: &str, clock: Arc<dyn Clock>) -> Result<Self, ToolBuildError> {
        Ok(Self {
            navigate_stage: Arc::new(navigate_stage_tool(tool_base_url)?),
            schedule_event: Arc::new(schedule_event_tool(tool_base_url)?),
            clock,
        })
    }

    /// Resolve a stage by its wire name
    pub fn lookup(&self, stage_name: &str) -> Result<Stage, UnknownStage> {
        stage_name.parse().map(|id| self.stage(id))
    }

    /// Resolve a known stage. The prompt is rendered against the clock on
    /// every call so a long-running process never serves a stale date.
    pub fn stage(&self, id: StageId) -> Stage {
        let (template, tools) = self.definition(id);
        Stage {
            id,
            system_prompt: template.render(self.clock.today()),
            tools,
        }
    }

    fn definition(&self, id: StageId) -> (PromptTemplate, Vec<Arc<ToolDescriptor>>) {
        match id {
            StageId::Greeting => (prompts::GREETING, vec![self.navigate_stage.clone()]),
            StageId::Schedule => (
                prompts::SCHEDULE,
                vec![self.navigate_stage.clone(), self.schedule_event.clone()],
            ),
            StageId::Reschedule => (prompts::RESCHEDULE, vec![self.navigate_stage.clone()]),
        }
    }
}
