//! Mockstep Core - walking-step simulator for the Android emulator
//!
//! Synthesizes the vertical acceleration of a walking gait, streams it to
//! the emulator's virtual accelerometer through the console protocol, and
//! reports a step event at every waveform peak.

pub mod config;
pub mod console;
pub mod gait;
pub mod sim;

pub use config::{ConsoleConfig, SimConfig, WaveformConfig};
pub use console::{ConsoleError, ConsoleSession, ErrorKind, SessionCredentials};
pub use gait::{GaitGenerator, SensorSample, StepEvent, Vector3, WaveformState};
pub use sim::{CancelToken, RunReport, SampleSink, Simulation, SimulationError, StopReason};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date stamped by build.rs
pub const BUILD_DATE: &str = env!("BUILD_DATE");
