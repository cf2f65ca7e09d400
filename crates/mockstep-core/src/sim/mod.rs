//! Real-time simulation loop
//!
//! - Lifecycle state machine and tick loop ([`runner`])
//! - Cancellation shared with signal handlers ([`cancel`])
//! - Run summary and failure type ([`report`])

pub mod cancel;
pub mod report;
pub mod runner;

pub use cancel::CancelToken;
pub use report::{RunReport, SimulationError, StopReason};
pub use runner::{LoopState, SampleSink, Simulation};
