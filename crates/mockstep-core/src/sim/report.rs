//! Summary of one simulation run

use crate::console::{ConsoleError, ErrorKind};
use crate::gait::SensorSample;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// How the running phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// External cancellation; a normal end
    Cancelled,
    /// A console error aborted the run
    Failed(ErrorKind),
}

/// Counters collected while the simulation runs
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Samples acknowledged by the console
    pub ticks: u64,
    /// Step events among those samples
    pub steps: u64,
    /// Signal time of the last acknowledged sample, in seconds
    pub signal_time: f64,
    pub stop_reason: StopReason,
    /// Whether the console acknowledged the reset-to-rest command
    pub reset_acknowledged: bool,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            ticks: 0,
            steps: 0,
            signal_time: 0.0,
            stop_reason: StopReason::Cancelled,
            reset_acknowledged: false,
        }
    }

    pub(crate) fn record(&mut self, elapsed: f64, sample: &SensorSample) {
        self.ticks += 1;
        self.signal_time = elapsed;
        if sample.step.is_some() {
            self.steps += 1;
        }
    }

    pub(crate) fn finish(&mut self, stop_reason: StopReason) {
        self.stop_reason = stop_reason;
        self.finished_at = Some(Utc::now());
    }

    /// Steps per minute of signal time
    pub fn cadence(&self) -> Option<f64> {
        if self.signal_time > 0.0 {
            Some(self.steps as f64 * 60.0 / self.signal_time)
        } else {
            None
        }
    }

    /// Wall-clock duration of the run in milliseconds
    pub fn wall_time_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

/// A run that ended on a console error, with what it achieved before that
#[derive(Error, Debug)]
#[error("simulation aborted after {} samples", .report.ticks)]
pub struct SimulationError {
    #[source]
    pub error: ConsoleError,
    pub report: RunReport,
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
