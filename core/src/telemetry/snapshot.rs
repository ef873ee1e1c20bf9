//! telemetry/snapshot.rs
//! Immutable view of the service telemetry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// `bytes_compressed / bytes_plain`, 0.0 before any codec run.
    pub compression_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, stage_times: &StageTimes, elapsed: Duration) -> Self {
        let compression_ratio = if counters.bytes_plain > 0 {
            counters.bytes_compressed as f64 / counters.bytes_plain as f64
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            compression_ratio,
            elapsed,
            stage_times: stage_times.clone(),
        }
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
