//! Vertical-acceleration waveform of a walking gait
//!
//! The y axis follows `baseline + amplitude · sin(2π·f·t)` while x and z
//! stay at rest. A step impact is reported at each peak: the first sample
//! that stops rising after a run of rising samples.

use crate::config::WaveformConfig;
use std::f64::consts::TAU;
use std::fmt;

/// Three-axis acceleration in m/s²
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Foot impact detected at a waveform peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Signal time of the sample that closed the rising run, in seconds
    pub elapsed: f64,
}

/// One tick's worth of output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Raw sine value in [-1, 1]
    pub sine: f64,
    /// Acceleration sent to the device
    pub acceleration: Vector3,
    /// Present only on the tick where a peak was detected
    pub step: Option<StepEvent>,
}

/// Edge-detection state carried by the caller between samples
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveformState {
    /// Sine output of the previous call, `None` before the first sample
    pub previous_sine: Option<f64>,
    /// Whether the previous sample was higher than the one before it
    pub rising: bool,
}

/// Compute the sample at `elapsed` seconds and the state for the next call
///
/// Deterministic in `(state, elapsed, config)`.
///
/// # Example
/// ```
/// use mockstep_core::config::WaveformConfig;
/// use mockstep_core::gait::{sample, WaveformState};
///
/// let config = WaveformConfig::default();
/// let (state, first) = sample(WaveformState::default(), 0.0, &config);
/// assert!(first.step.is_none());
/// assert_eq!(state.previous_sine, Some(0.0));
/// ```
pub fn sample(
    state: WaveformState,
    elapsed: f64,
    config: &WaveformConfig,
) -> (WaveformState, SensorSample) {
    let sine = (TAU * config.frequency_hz * elapsed).sin();

    let acceleration = Vector3::new(
        config.rest_x,
        config.baseline_gravity + config.amplitude * sine,
        config.rest_z,
    );

    let rising = match state.previous_sine {
        Some(previous) => sine > previous,
        None => false,
    };
    let step = (state.rising && !rising).then_some(StepEvent { elapsed });

    let next = WaveformState {
        previous_sine: Some(sine),
        rising,
    };

    (
        next,
        SensorSample {
            sine,
            acceleration,
            step,
        },
    )
}
