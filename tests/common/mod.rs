//! In-memory emulator console used by the integration tests
//!
//! Speaks enough of the console protocol to drive a session: greeting
//! banner, `auth`, `sensor set acceleration`, `quit`. Every line received is
//! recorded and returned when the client closes its side.

#![allow(dead_code)]

use mockstep::config::ConsoleConfig;
use mockstep::CancelToken;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

pub const VALID_TOKEN: &str = "VALIDTOKEN";

pub const REST_COMMAND: &str = "sensor set acceleration 0.00:9.80:0.00";

const GREETING: &str = "Android Console: Authentication required\r\n\
Android Console: type 'auth <auth_token>' to authenticate\r\n\
Android Console: you can find your <auth_token> in\r\n\
'/home/user/.emulator_console_auth_token'\r\n\
OK\r\n";

/// Console timeouts short enough for tests
pub fn fast_console() -> ConsoleConfig {
    ConsoleConfig {
        connect_timeout_ms: 1_000,
        auth_timeout_ms: 500,
        command_timeout_ms: 300,
        quit_timeout_ms: 100,
    }
}

/// Scripted console behaviour
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    /// Token accepted by `auth`
    pub token: String,
    /// Close the console's write side after this many acknowledged sensor commands
    pub close_after_sensors: Option<usize>,
    /// Close the console's write side right after rejecting a token
    pub close_on_reject: bool,
    /// Never answer sensor commands
    pub mute_sensors: bool,
    /// Cancel this token when the given sensor command (1-based) arrives
    pub cancel_at_sensor: Option<(usize, CancelToken)>,
}

impl MockConsole {
    pub fn new() -> Self {
        Self {
            token: VALID_TOKEN.to_string(),
            ..Default::default()
        }
    }

    /// Serve one client on `stream`; resolves to every line received
    pub fn spawn<S>(self, stream: S) -> JoinHandle<Vec<String>>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        tokio::spawn(async move { self.serve(stream).await })
    }

    async fn serve<S>(self, stream: S) -> Vec<String>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read, write) = tokio::io::split(stream);
        let mut write = Some(write);
        let mut lines = BufReader::new(read).lines();
        let mut received = Vec::new();
        let mut sensors = 0;

        if let Some(w) = write.as_mut() {
            let _ = w.write_all(GREETING.as_bytes()).await;
        }

        while let Ok(Some(line)) = lines.next_line().await {
            received.push(line.clone());

            let mut close = false;
            let reply = if let Some(token) = line.strip_prefix("auth ") {
                if token == self.token {
                    Some("Android Console: type 'help' for a list of commands\r\nOK\r\n")
                } else {
                    close = self.close_on_reject;
                    Some("KO: authentication token does not match ~/.emulator_console_auth_token\r\n")
                }
            } else if line.starts_with("sensor set acceleration ") {
                sensors += 1;
                if let Some((at, cancel)) = &self.cancel_at_sensor {
                    if *at == sensors {
                        cancel.cancel();
                    }
                }
                close = self.close_after_sensors == Some(sensors);
                if self.mute_sensors {
                    None
                } else {
                    Some("OK\r\n")
                }
            } else if line.starts_with("sensor set ") {
                Some("KO: bad sensor name\r\n")
            } else if line == "quit" {
                None
            } else {
                Some("KO: unknown command, try 'help'\r\n")
            };

            if let (Some(w), Some(reply)) = (write.as_mut(), reply) {
                let _ = w.write_all(reply.as_bytes()).await;
            }
            if close {
                if let Some(mut w) = write.take() {
                    let _ = w.shutdown().await;
                }
            }
        }

        received
    }
}

/// Lines that are `sensor set` commands
pub fn sensor_lines(received: &[String]) -> Vec<&str> {
    received
        .iter()
        .filter(|l| l.starts_with("sensor set "))
        .map(String::as_str)
        .collect()
}
