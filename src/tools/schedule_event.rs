//! `scheduleEvent` tool: hands the collected booking details back to us
//!
//! A calendar backend would sit behind this callback; today the payload is
//! only validated and logged (see `crate::scheduling`).

use super::{AutomaticParameter, DynamicParameter, HttpMethod, ParamType, ToolBuildError, ToolDescriptor};

pub const SCHEDULE_EVENT_PATH: &str = "/scheduleEvent";

pub fn schedule_event_tool(base_url: &str) -> Result<ToolDescriptor, ToolBuildError> {
    ToolDescriptor::builder(
        "scheduleEvent",
        "Schedule an event with the user after collecting the necessary information",
    )
    .dynamic(DynamicParameter::required(
        "attendeeName",
        ParamType::String,
        "The user's name",
    ))
    .dynamic(DynamicParameter::required(
        "attendeeEmail",
        ParamType::String,
        "The user's email address",
    ))
    .dynamic(DynamicParameter::required(
        "startTime",
        ParamType::String,
        "The date and start time of the event, expressed as UTC date string (e.g., 2024-08-13T09:00:00Z)",
    ))
    .dynamic(DynamicParameter::required(
        "lengthInMinutes",
        ParamType::Number,
        "The number of minutes of the meeting",
    ))
    .automatic(AutomaticParameter::call_id())
    .callback(base_url, SCHEDULE_EVENT_PATH, HttpMethod::Post)
    .build()
}
