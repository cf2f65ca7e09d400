//! Mockstep - walking-step simulator for the Android emulator
//!
//! Entry point: parses arguments, resolves the console token, and runs the
//! simulation until Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use mockstep::cli::Cli;
use mockstep::display::DualGraph;
use mockstep::token::resolve_token;
use mockstep::{
    CancelToken, ErrorKind, RunReport, SensorSample, SessionCredentials, Simulation,
};
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Graphs redraw in place; keep the log quiet unless asked
    let level = if cli.no_display { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("mockstep={}", level).parse()?)
                .add_directive(format!("mockstep_core={}", level).parse()?),
        )
        .init();

    let config = cli.sim_config().context("Invalid configuration")?;
    if cli.dump_config {
        println!("{}", config.to_json());
        return Ok(());
    }

    let token = resolve_token(cli.token.as_deref(), cli.token_file.as_deref())?;
    let credentials = SessionCredentials::new(cli.host.clone(), cli.port, token);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install Ctrl+C handler")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    println!(
        "Mockstep v{} ({}) - walking at {:.2} steps/s, amplitude {:.2} m/s²",
        mockstep::VERSION,
        mockstep::BUILD_DATE,
        config.waveform.frequency_hz,
        config.waveform.amplitude
    );
    println!(
        "Console: {}:{}  Press Ctrl+C to stop.",
        credentials.host, credentials.port
    );

    let mut simulation = Simulation::new(config.clone(), cancel);

    let result = if cli.no_display {
        let mut sink = |elapsed: f64, sample: &SensorSample| {
            info!(
                elapsed,
                y = sample.acceleration.y,
                sine = sample.sine,
                step = sample.step.is_some(),
                "Sample"
            );
        };
        runtime.block_on(simulation.run(&credentials, &mut sink))
    } else {
        let size = cli.display_size();
        let mut graph = DualGraph::new(std::io::stdout(), size, config.waveform.y_range());
        println!(
            "Display size: Bar={}, Sine={}x{}",
            size.bar_width, size.sine_width, size.sine_height
        );
        println!("{}", "-".repeat((size.bar_width + 20).max(size.sine_width + 20)));
        println!();

        let mut sink = |_: f64, sample: &SensorSample| {
            if let Err(e) = graph.plot(sample) {
                error!(error = %e, "Failed to draw graph");
            }
        };
        runtime.block_on(simulation.run(&credentials, &mut sink))
    };

    match result {
        Ok(report) => {
            println!();
            println!("Stopping simulation.");
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            print_summary(&e.report);
            let kind = e.kind();
            let err = anyhow::Error::new(e);
            match kind {
                ErrorKind::Authentication => Err(err.context(
                    "Authentication failed; pass the console token explicitly with --token",
                )),
                ErrorKind::Connection => Err(err.context(format!(
                    "Could not reach the emulator console on {}:{}; is the emulator running?",
                    credentials.host, credentials.port
                ))),
                _ => Err(err),
            }
        }
    }
}

fn print_summary(report: &RunReport) {
    println!(
        "Sent {} samples, {} steps over {:.1}s of walking{}",
        report.ticks,
        report.steps,
        report.signal_time,
        report
            .cadence()
            .map(|c| format!(" ({:.0} steps/min)", c))
            .unwrap_or_default()
    );
    if report.ticks > 0 {
        println!(
            "Sensor reset to rest: {}",
            if report.reset_acknowledged { "yes" } else { "no" }
        );
    }
}
