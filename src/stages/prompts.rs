//! System prompts for each stage
//!
//! Prompts that mention the current date carry a `{today}` placeholder and
//! are rendered when the stage is looked up.

use chrono::{Local, NaiveDate};

const TODAY_PLACEHOLDER: &str = "{today}";

/// Prompt text, optionally containing `{today}`
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate(&'static str);

impl PromptTemplate {
    pub fn render(self, today: NaiveDate) -> String {
        if self.0.contains(TODAY_PLACEHOLDER) {
            self.0
                .replace(TODAY_PLACEHOLDER, &today.format("%B %d, %Y").to_string())
        } else {
            self.0.to_string()
        }
    }
}

pub const GREETING: PromptTemplate = PromptTemplate(
    "You're a helpful scheduling assistant. Today is {today}. You need to politely figure out if the user is trying to schedule a new appointment or reschedule an existing one. Once you know, you must immediately call the navigateStage tool. Don't mention anything about stages to the user.",
);

pub const SCHEDULE: PromptTemplate = PromptTemplate(
    "You're a helpful scheduling assistant. Today is {today}. You need to collect the necessary information to schedule an event. Once you have the information, you must call the scheduleEvent tool. There is no need to confirm availability. Don't mention anything about stages to the user.",
);

// TODO: give rescheduling its own tools once there is a backend to look up existing bookings
pub const RESCHEDULE: PromptTemplate = PromptTemplate("You're a rescheduling assistant.");

/// Source of "today" for date-dependent prompts
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[cfg(test)]
pub struct FixedClock(NaiveDate);

#[cfg(test)]
impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
