//! Simulation configuration
//!
//! Waveform shape, tick cadence and console timeouts. Every field has a
//! serde default, so a JSON file only needs the values it overrides.

use crate::gait::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Gait cycles per second (two steps per second of walking)
pub const DEFAULT_FREQUENCY_HZ: f64 = 2.0;

/// Peak deviation of the vertical acceleration from gravity (m/s²)
pub const DEFAULT_AMPLITUDE: f64 = 2.0;

/// Resting vertical acceleration (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.8;

/// Samples sent per gait cycle (0.1 s ticks at 2 Hz)
pub const DEFAULT_SAMPLES_PER_CYCLE: u32 = 5;

/// Default emulator console port
pub const DEFAULT_CONSOLE_PORT: u16 = 5554;

/// Default emulator console host
pub const DEFAULT_CONSOLE_HOST: &str = "localhost";

fn default_frequency_hz() -> f64 {
    DEFAULT_FREQUENCY_HZ
}

fn default_amplitude() -> f64 {
    DEFAULT_AMPLITUDE
}

fn default_baseline_gravity() -> f64 {
    STANDARD_GRAVITY
}

fn default_samples_per_cycle() -> u32 {
    DEFAULT_SAMPLES_PER_CYCLE
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_auth_timeout_ms() -> u64 {
    10_000
}

fn default_command_timeout_ms() -> u64 {
    2_000
}

fn default_quit_timeout_ms() -> u64 {
    500
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid waveform config: {0}")]
    Invalid(String),
}

/// Shape and cadence of the synthesized walking waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Gait cycles per second
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
    /// Scale of the y-acceleration swing around the baseline
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Vertical acceleration at rest
    #[serde(default = "default_baseline_gravity")]
    pub baseline_gravity: f64,
    /// Fixed x acceleration
    #[serde(default)]
    pub rest_x: f64,
    /// Fixed z acceleration
    #[serde(default)]
    pub rest_z: f64,
    /// Ticks per gait cycle; sets the tick period together with the frequency
    #[serde(default = "default_samples_per_cycle")]
    pub samples_per_cycle: u32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            frequency_hz: default_frequency_hz(),
            amplitude: default_amplitude(),
            baseline_gravity: default_baseline_gravity(),
            rest_x: 0.0,
            rest_z: 0.0,
            samples_per_cycle: default_samples_per_cycle(),
        }
    }
}

impl WaveformConfig {
    /// Reject values that would produce a NaN waveform or a zero tick period
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "frequency must be a positive number, got {}",
                self.frequency_hz
            )));
        }
        if !self.amplitude.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "amplitude must be finite, got {}",
                self.amplitude
            )));
        }
        if !self.baseline_gravity.is_finite() || !self.rest_x.is_finite() || !self.rest_z.is_finite()
        {
            return Err(ConfigError::Invalid(
                "rest acceleration components must be finite".to_string(),
            ));
        }
        if self.samples_per_cycle == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_cycle must be at least 1".to_string(),
            ));
        }
        match Duration::try_from_secs_f64(self.tick_period_secs()) {
            Ok(tick) if !tick.is_zero() => Ok(()),
            _ => Err(ConfigError::Invalid(format!(
                "frequency {} Hz at {} samples per cycle gives no usable tick period",
                self.frequency_hz, self.samples_per_cycle
            ))),
        }
    }

    /// Duration of one gait cycle in seconds
    pub fn cycle_period_secs(&self) -> f64 {
        1.0 / self.frequency_hz
    }

    /// Nominal time between two samples in seconds
    pub fn tick_period_secs(&self) -> f64 {
        self.cycle_period_secs() / self.samples_per_cycle as f64
    }

    /// Time between two samples
    ///
    /// Saturates at [`Duration::MAX`] for periods [`validate`](Self::validate) rejects.
    pub fn tick_period(&self) -> Duration {
        Duration::try_from_secs_f64(self.tick_period_secs()).unwrap_or(Duration::MAX)
    }

    /// Acceleration of a stationary device
    pub fn rest_vector(&self) -> Vector3 {
        Vector3::new(self.rest_x, self.baseline_gravity, self.rest_z)
    }

    /// Lowest and highest y-acceleration the waveform can reach
    pub fn y_range(&self) -> (f64, f64) {
        let swing = self.amplitude.abs();
        (self.baseline_gravity - swing, self.baseline_gravity + swing)
    }
}

/// Timeouts bounding every blocking point of the console session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// TCP connect
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Greeting banner and `auth` reply
    #[serde(default = "default_auth_timeout_ms")]
    pub auth_timeout_ms: u64,
    /// One `sensor set` round-trip
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// Writing `quit` during teardown
    #[serde(default = "default_quit_timeout_ms")]
    pub quit_timeout_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            auth_timeout_ms: default_auth_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            quit_timeout_ms: default_quit_timeout_ms(),
        }
    }
}

impl ConsoleConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn quit_timeout(&self) -> Duration {
        Duration::from_millis(self.quit_timeout_ms)
    }
}

/// Complete configuration handed to the simulation at construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub waveform: WaveformConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl SimConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.waveform.validate()?;
        tracing::info!(path = %path.display(), "Loaded config from disk");
        Ok(config)
    }

    /// Pretty JSON rendering of the effective configuration
    pub fn to_json(&self) -> String {
        // Plain structs of numbers always serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
