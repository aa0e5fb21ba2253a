//! Per-phase timing of node execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Start/end timestamps bracketing one named phase of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingInfo {
    pub name: String,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TimingInfo {
    pub fn new(name: impl Into<String>) -> Self {
        TimingInfo {
            name: name.into(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn begin(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn end(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}

/// Run `work` inside a timing bracket
///
/// `completed_at` is set on every non-panic exit path, including early
/// returns from fallible work run through a closure returning `Result`.
pub fn collect_timing_info<T>(name: impl Into<String>, work: impl FnOnce() -> T) -> (TimingInfo, T) {
    let mut timing = TimingInfo::new(name);
    timing.begin();
    let output = work();
    timing.end();
    (timing, output)
}
