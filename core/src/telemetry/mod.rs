//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for the filesystem service.
//!
//! Both workers record into one shared `Telemetry`; callers read a
//! `TelemetrySnapshot`, never the live state.

pub mod counters;
pub mod snapshot;
pub mod timers;

pub use counters::*;
pub use snapshot::*;
pub use timers::*;

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Shared live telemetry, owned by the service and borrowed by both workers.
#[derive(Debug)]
pub struct Telemetry {
    timer: TelemetryTimer,
    state: Mutex<TelemetryState>,
}

#[derive(Debug, Default)]
struct TelemetryState {
    counters: TelemetryCounters,
    stage_times: StageTimes,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self { timer: TelemetryTimer::new(), state: Mutex::new(TelemetryState::default()) }
    }

    fn state(&self) -> MutexGuard<'_, TelemetryState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Apply `f` to the counters under the lock.
    pub fn update(&self, f: impl FnOnce(&mut TelemetryCounters)) {
        f(&mut self.state().counters);
    }

    pub fn add_stage_time(&self, stage: Stage, dur: Duration) {
        self.state().stage_times.add(stage, dur);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state();
        TelemetrySnapshot::from(&state.counters, &state.stage_times, self.timer.elapsed())
    }
}
