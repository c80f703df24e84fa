use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Counters written by the reset executor after each successful reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetState {
    pub last_reset: Option<DateTime<Utc>>,
    pub reset_count: u64,
}

impl ResetState {
    /// Record a completed reset and return the new count.
    pub(crate) fn record_success(&mut self, at: DateTime<Utc>) -> u64 {
        self.last_reset = Some(at);
        self.reset_count += 1;
        self.reset_count
    }

    /// ISO-8601 timestamp of the last reset, or `"Never"`.
    pub fn last_reset_display(&self) -> String {
        match self.last_reset {
            Some(at) => format_timestamp(at),
            None => "Never".to_string(),
        }
    }

    pub fn seconds_since_last_reset(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_reset
            .map(|at| (now - at).num_milliseconds() as f64 / 1000.0)
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
