//! Source freshness thresholds and status evaluation
//!
//! A threshold compares the observed age of a source's data against optional
//! warn/error windows. Ages are measured in seconds; windows are declared as
//! a count of minutes, hours, or days.

use serde::{Deserialize, Serialize};

/// Unit of a freshness window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Minute,
    Hour,
    Day,
}

impl TimePeriod {
    pub fn seconds_per(&self) -> u64 {
        match self {
            TimePeriod::Minute => 60,
            TimePeriod::Hour => 3_600,
            TimePeriod::Day => 86_400,
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimePeriod::Minute => write!(f, "minute"),
            TimePeriod::Hour => write!(f, "hour"),
            TimePeriod::Day => write!(f, "day"),
        }
    }
}

/// A freshness window: a count of periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Time {
    pub count: u32,
    pub period: TimePeriod,
}

impl Time {
    pub fn seconds(&self) -> u64 {
        u64::from(self.count) * self.period.seconds_per()
    }
}

/// Outcome of a freshness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Pass,
    Warn,
    Error,
}

impl std::fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FreshnessStatus::Pass => write!(f, "pass"),
            FreshnessStatus::Warn => write!(f, "warn"),
            FreshnessStatus::Error => write!(f, "error"),
        }
    }
}

/// Warn/error windows for a source's data age
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreshnessThreshold {
    #[serde(default)]
    pub warn_after: Option<Time>,

    #[serde(default)]
    pub error_after: Option<Time>,
}

impl FreshnessThreshold {
    /// Evaluate an observed age in seconds against this threshold
    ///
    /// With neither window set the status is always Pass, whatever the age.
    pub fn status(&self, age_seconds: f64) -> FreshnessStatus {
        if let Some(error_after) = &self.error_after {
            if age_seconds >= error_after.seconds() as f64 {
                return FreshnessStatus::Error;
            }
        }
        if let Some(warn_after) = &self.warn_after {
            if age_seconds >= warn_after.seconds() as f64 {
                return FreshnessStatus::Warn;
            }
        }
        FreshnessStatus::Pass
    }

    /// Field-wise merge: the override's window wins when set, else ours is kept
    pub fn merged(&self, other: &FreshnessThreshold) -> FreshnessThreshold {
        FreshnessThreshold {
            warn_after: other.warn_after.or(self.warn_after),
            error_after: other.error_after.or(self.error_after),
        }
    }

    /// Whether any window is declared
    pub fn is_set(&self) -> bool {
        self.warn_after.is_some() || self.error_after.is_some()
    }
}
