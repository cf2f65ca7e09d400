//! Configuration surface: JSON config files, command line overrides and
//! auth token lookup

use clap::Parser;
use mockstep::cli::Cli;
use mockstep::config::ConfigError;
use mockstep::token::{resolve_token, TokenError, TOKEN_FILE_NAME};
use mockstep::SimConfig;
use std::time::Duration;

/// A partial config file keeps defaults for everything it omits
#[test]
fn test_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mockstep.json");
    std::fs::write(
        &path,
        r#"{ "waveform": { "amplitude": 3.5 }, "console": { "command_timeout_ms": 750 } }"#,
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.waveform.amplitude, 3.5);
    assert_eq!(config.waveform.frequency_hz, 2.0);
    assert_eq!(config.waveform.baseline_gravity, 9.8);
    assert_eq!(config.console.command_timeout(), Duration::from_millis(750));
    assert_eq!(config.console, {
        let mut expected = SimConfig::default().console;
        expected.command_timeout_ms = 750;
        expected
    });
}

/// Command line flags override the config file
#[test]
fn test_flags_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mockstep.json");
    std::fs::write(&path, r#"{ "waveform": { "frequency_hz": 1.0, "amplitude": 3.0 } }"#)
        .unwrap();

    let cli = Cli::parse_from([
        "mockstep",
        "--config",
        path.to_str().unwrap(),
        "--frequency",
        "1.5",
    ]);
    let config = cli.sim_config().unwrap();
    assert_eq!(config.waveform.frequency_hz, 1.5);
    assert_eq!(config.waveform.amplitude, 3.0);
}

/// Invalid values are rejected wherever they come from
#[test]
fn test_invalid_values_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "waveform": { "frequency_hz": -2.0 } }"#).unwrap();
    assert!(matches!(SimConfig::load(&path), Err(ConfigError::Invalid(_))));

    let cli = Cli::parse_from(["mockstep", "--frequency", "0"]);
    assert!(matches!(cli.sim_config(), Err(ConfigError::Invalid(_))));

    // Positive but too slow to express as a tick period
    let cli = Cli::parse_from(["mockstep", "--frequency", "1e-300"]);
    assert!(matches!(cli.sim_config(), Err(ConfigError::Invalid(_))));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(SimConfig::load(&path), Err(ConfigError::Parse { .. })));

    let missing = dir.path().join("missing.json");
    assert!(matches!(SimConfig::load(&missing), Err(ConfigError::Read { .. })));
}

/// The dumped configuration loads back unchanged
#[test]
fn test_dumped_config_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.json");
    let cli = Cli::parse_from(["mockstep", "--amplitude", "1.25"]);
    let config = cli.sim_config().unwrap();
    std::fs::write(&path, config.to_json()).unwrap();

    assert_eq!(SimConfig::load(&path).unwrap(), config);
}

/// Token file contents are trimmed; an explicit token skips the file
#[test]
fn test_token_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(TOKEN_FILE_NAME);
    std::fs::write(&path, "  s3cr3t\n").unwrap();

    assert_eq!(resolve_token(None, Some(&path)).unwrap(), "s3cr3t");
    assert_eq!(resolve_token(Some("cli"), Some(&path)).unwrap(), "cli");

    let missing = dir.path().join("nope");
    assert!(matches!(
        resolve_token(None, Some(&missing)),
        Err(TokenError::NotFound(_))
    ));
    // A blank explicit token falls back to the file
    assert_eq!(resolve_token(Some("  "), Some(&path)).unwrap(), "s3cr3t");
}
