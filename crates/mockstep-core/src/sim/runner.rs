//! Simulation loop: waveform → console → sink at a fixed tick
//!
//! ```text
//! Idle → Connecting → Authenticating → Running → Stopping → Terminated
//!            │               │
//!            └───────────────┴──────────────→ Terminated (on failure)
//! ```
//!
//! Stopping always sends the rest vector once and then disconnects, whether
//! the run was cancelled or a command failed. Cleanup errors are logged and
//! never replace the error that ended the run.

use super::cancel::CancelToken;
use super::report::{RunReport, SimulationError, StopReason};
use crate::config::SimConfig;
use crate::console::{ConsoleError, ConsoleSession, SessionCredentials, ACCELERATION_SENSOR};
use crate::gait::{GaitGenerator, SensorSample};
use tokio::io::{AsyncRead, AsyncWrite};

/// Receives every acknowledged sample; must not block
pub trait SampleSink {
    fn on_sample(&mut self, elapsed: f64, sample: &SensorSample);
}

impl<F> SampleSink for F
where
    F: FnMut(f64, &SensorSample),
{
    fn on_sample(&mut self, elapsed: f64, sample: &SensorSample) {
        self(elapsed, sample)
    }
}

/// Simulation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Connecting,
    Authenticating,
    Running,
    Stopping,
    Terminated,
}

/// One simulation run against one console
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    cancel: CancelToken,
    state: LoopState,
}

impl Simulation {
    pub fn new(config: SimConfig, cancel: CancelToken) -> Self {
        Self {
            config,
            cancel,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn transition(&mut self, next: LoopState) {
        tracing::debug!(from = ?self.state, to = ?next, "Simulation state change");
        self.state = next;
    }

    /// Connect over TCP, then run until cancelled or a command fails
    pub async fn run<K>(
        &mut self,
        credentials: &SessionCredentials,
        sink: &mut K,
    ) -> Result<RunReport, SimulationError>
    where
        K: SampleSink,
    {
        self.transition(LoopState::Connecting);

        let connect = ConsoleSession::connect(
            &credentials.host,
            credentials.port,
            self.config.console.clone(),
        );
        let connected = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = connect => Some(result),
        };

        match connected {
            None => {
                tracing::info!("Cancelled while connecting");
                Ok(self.terminate_early(RunReport::new()))
            }
            Some(Err(error)) => {
                tracing::error!(error = %error, "Failed to connect to emulator console");
                self.transition(LoopState::Terminated);
                let mut report = RunReport::new();
                report.finish(StopReason::Failed(error.kind()));
                Err(SimulationError { error, report })
            }
            Some(Ok(session)) => self.run_session(session, &credentials.token, sink).await,
        }
    }

    /// Authenticate an established session, then run it
    ///
    /// The session is always disconnected before this returns.
    pub async fn run_session<S, K>(
        &mut self,
        mut session: ConsoleSession<S>,
        token: &str,
        sink: &mut K,
    ) -> Result<RunReport, SimulationError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        K: SampleSink,
    {
        let mut report = RunReport::new();
        self.transition(LoopState::Authenticating);

        let authenticated = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = session.authenticate(token) => Some(result),
        };

        match authenticated {
            None => {
                tracing::info!("Cancelled while authenticating");
                session.disconnect().await;
                return Ok(self.terminate_early(report));
            }
            Some(Err(error)) => {
                tracing::error!(error = %error, "Authentication failed");
                session.disconnect().await;
                self.transition(LoopState::Terminated);
                report.finish(StopReason::Failed(error.kind()));
                return Err(SimulationError { error, report });
            }
            Some(Ok(())) => {}
        }

        self.transition(LoopState::Running);
        tracing::info!(
            frequency_hz = self.config.waveform.frequency_hz,
            amplitude = self.config.waveform.amplitude,
            tick_ms = self.config.waveform.tick_period().as_millis() as u64,
            "Simulating walking steps"
        );

        let outcome = self.drive(&mut session, sink, &mut report).await;

        self.transition(LoopState::Stopping);
        let rest = self.config.waveform.rest_vector();
        match session.set_sensor(ACCELERATION_SENSOR, rest).await {
            Ok(()) => {
                report.reset_acknowledged = true;
                tracing::info!(%rest, "Sensor reset to rest");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to reset sensor to rest"),
        }
        session.disconnect().await;
        self.transition(LoopState::Terminated);

        match outcome {
            Ok(()) => {
                report.finish(StopReason::Cancelled);
                tracing::info!(
                    ticks = report.ticks,
                    steps = report.steps,
                    signal_time = report.signal_time,
                    "Simulation stopped"
                );
                Ok(report)
            }
            Err(error) => {
                report.finish(StopReason::Failed(error.kind()));
                tracing::error!(
                    error = %error,
                    ticks = report.ticks,
                    steps = report.steps,
                    "Simulation aborted"
                );
                Err(SimulationError { error, report })
            }
        }
    }

    /// The Running state; returns `Ok` on cancellation
    async fn drive<S, K>(
        &self,
        session: &mut ConsoleSession<S>,
        sink: &mut K,
        report: &mut RunReport,
    ) -> Result<(), ConsoleError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        K: SampleSink,
    {
        let mut gait = GaitGenerator::new(self.config.waveform.clone());
        let tick = self.config.waveform.tick_period();

        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            let (elapsed, sample) = gait.next_sample();
            // Bounded by the command timeout; a cancel during it is seen right after
            session
                .set_sensor(ACCELERATION_SENSOR, sample.acceleration)
                .await?;

            report.record(elapsed, &sample);
            if let Some(step) = sample.step {
                tracing::debug!(elapsed = step.elapsed, total = report.steps, "Step impact");
            }
            sink.on_sample(elapsed, &sample);

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(tick) => {}
            }
        }
    }

    fn terminate_early(&mut self, mut report: RunReport) -> RunReport {
        self.transition(LoopState::Terminated);
        report.finish(StopReason::Cancelled);
        report
    }
}
