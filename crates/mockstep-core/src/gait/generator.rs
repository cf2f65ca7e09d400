//! Tick-indexed gait generator
//!
//! Owns the waveform state and the tick counter so the simulation loop only
//! has to ask for the next sample.

use super::waveform::{sample, SensorSample, WaveformState};
use crate::config::WaveformConfig;

/// Walking-gait sample source
///
/// Signal time advances by exactly one nominal tick period per sample,
/// independent of how long the caller actually waited between samples.
///
/// # Example
/// ```
/// use mockstep_core::config::WaveformConfig;
/// use mockstep_core::gait::GaitGenerator;
///
/// let mut gen = GaitGenerator::new(WaveformConfig::default());
/// let (t, first) = gen.next_sample();
/// assert_eq!(t, 0.0);
/// assert!(first.step.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GaitGenerator {
    config: WaveformConfig,
    state: WaveformState,
    /// Number of samples produced so far
    tick: u64,
}

impl GaitGenerator {
    pub fn new(config: WaveformConfig) -> Self {
        Self {
            config,
            state: WaveformState::default(),
            tick: 0,
        }
    }

    /// Produce the next sample together with its signal time in seconds
    pub fn next_sample(&mut self) -> (f64, SensorSample) {
        let elapsed = self.elapsed();
        let (state, s) = sample(self.state, elapsed, &self.config);
        self.state = state;
        self.tick += 1;
        (elapsed, s)
    }

    /// Signal time of the next sample
    pub fn elapsed(&self) -> f64 {
        self.tick as f64 * self.config.tick_period_secs()
    }

    /// Samples produced so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn state(&self) -> WaveformState {
        self.state
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Restart at `elapsed = 0` with no edge history
    pub fn reset(&mut self) {
        self.state = WaveformState::default();
        self.tick = 0;
    }
}
