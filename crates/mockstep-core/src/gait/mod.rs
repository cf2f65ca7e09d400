//! Walking-gait waveform engine
//!
//! - Pure sine sampling and peak-based step detection ([`waveform`])
//! - Tick-indexed generator owning the waveform state ([`generator`])

pub mod generator;
pub mod waveform;

pub use generator::GaitGenerator;
pub use waveform::{sample, SensorSample, StepEvent, Vector3, WaveformState};
