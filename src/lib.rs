//! Mockstep - walking-step simulator for the Android emulator
//!
//! Re-exports the waveform engine, console session and simulation loop from
//! `mockstep-core` and adds the command line surface: argument parsing,
//! auth token lookup and the live terminal graphs.

pub mod cli;
pub mod display;
pub mod token;

pub use mockstep_core::{config, console, gait, sim};

pub use mockstep_core::{
    CancelToken, ConsoleConfig, ConsoleError, ConsoleSession, ErrorKind, GaitGenerator,
    RunReport, SampleSink, SensorSample, SessionCredentials, SimConfig, Simulation,
    SimulationError, StepEvent, StopReason, Vector3, WaveformConfig, WaveformState,
};
pub use mockstep_core::{BUILD_DATE, VERSION};
