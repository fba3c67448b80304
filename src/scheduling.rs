//! Scheduling sink
//!
//! Receives the booking the model collected in the SCHEDULE stage. There is
//! no calendar behind it yet: [`LoggingSink`] records the request and accepts
//! it. A real backend implements [`SchedulingSink`] and replaces it in
//! `AppState`.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Payload of a `scheduleEvent` invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub attendee_name: String,
    pub attendee_email: String,
    /// UTC timestamp string as produced by the model, e.g. `2024-08-13T09:00:00Z`
    pub start_time: String,
    pub length_in_minutes: f64,
    #[serde(rename = "call_id")]
    pub call_id: String,
}

impl ScheduleRequest {
    /// Reject payloads a calendar could not act on
    pub fn validate(&self) -> Result<(), SinkError> {
        let fields = [
            ("attendeeName", &self.attendee_name),
            ("attendeeEmail", &self.attendee_email),
            ("startTime", &self.start_time),
            ("call_id", &self.call_id),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(SinkError::Invalid(format!("{name} must not be empty")));
        }
        if !self.length_in_minutes.is_finite() || self.length_in_minutes <= 0.0 {
            return Err(SinkError::Invalid(format!(
                "lengthInMinutes must be a positive number, got {}",
                self.length_in_minutes
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid schedule request: {0}")]
    Invalid(String),
    #[allow(dead_code)] // For sinks backed by a real calendar
    #[error("scheduling backend failed: {0}")]
    Backend(String),
}

/// Destination for completed schedule requests
#[async_trait]
pub trait SchedulingSink: Send + Sync {
    async fn schedule(&self, request: &ScheduleRequest) -> Result<(), SinkError>;
}

/// Validates, logs and accepts every request
pub struct LoggingSink;

#[async_trait]
impl SchedulingSink for LoggingSink {
    async fn schedule(&self, request: &ScheduleRequest) -> Result<(), SinkError> {
        request.validate()?;
        tracing::info!(
            call_id = %request.call_id,
            attendee_name = %request.attendee_name,
            attendee_email = %request.attendee_email,
            start_time = %request.start_time,
            length_in_minutes = request.length_in_minutes,
            "Schedule request received"
        );
        Ok(())
    }
}
