//! Command line interface

use crate::display::DisplaySize;
use clap::{Parser, ValueEnum};
use mockstep_core::config::{ConfigError, DEFAULT_CONSOLE_HOST, DEFAULT_CONSOLE_PORT};
use mockstep_core::SimConfig;
use std::path::PathBuf;

/// Display size presets; individual dimension flags override them
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    Xl,
}

impl SizePreset {
    pub fn size(self) -> DisplaySize {
        let (bar_width, sine_width, sine_height) = match self {
            SizePreset::Small => (30, 40, 7),
            SizePreset::Medium => (50, 60, 9),
            SizePreset::Large => (80, 100, 15),
            SizePreset::Xl => (120, 150, 20),
        };
        DisplaySize {
            bar_width,
            sine_width,
            sine_height,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mockstep",
    version,
    about = "Simulate walking steps on an Android emulator and display a live graph"
)]
pub struct Cli {
    /// Emulator console host
    #[arg(long, default_value = DEFAULT_CONSOLE_HOST)]
    pub host: String,

    /// Emulator console port
    #[arg(short, long, default_value_t = DEFAULT_CONSOLE_PORT)]
    pub port: u16,

    /// Console auth token; read from ~/.emulator_console_auth_token if omitted
    #[arg(long)]
    pub token: Option<String>,

    /// Read the auth token from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub token_file: Option<PathBuf>,

    /// Gait cycles per second
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Swing of the vertical acceleration around gravity (m/s²)
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preset display size
    #[arg(long, value_enum, default_value_t = SizePreset::Medium)]
    pub size: SizePreset,

    /// Width of the accelerometer bar graph
    #[arg(long)]
    pub bar_width: Option<usize>,

    /// Width of the sine wave graph
    #[arg(long)]
    pub sine_width: Option<usize>,

    /// Height of the sine wave graph
    #[arg(long)]
    pub sine_height: Option<usize>,

    /// Log samples instead of drawing graphs
    #[arg(long)]
    pub no_display: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    /// File config (or defaults) with command line overrides applied
    pub fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(frequency) = self.frequency {
            config.waveform.frequency_hz = frequency;
        }
        if let Some(amplitude) = self.amplitude {
            config.waveform.amplitude = amplitude;
        }
        config.waveform.validate()?;
        Ok(config)
    }

    /// Preset dimensions with individual overrides
    pub fn display_size(&self) -> DisplaySize {
        let preset = self.size.size();
        DisplaySize {
            bar_width: self.bar_width.unwrap_or(preset.bar_width),
            sine_width: self.sine_width.unwrap_or(preset.sine_width),
            sine_height: self.sine_height.unwrap_or(preset.sine_height),
        }
    }
}
