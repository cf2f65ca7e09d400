//! Authenticated session with the emulator console
//!
//! The session is generic over any async byte stream so the protocol can be
//! driven against an in-memory pipe as well as a TCP socket. Every read is
//! bounded by a deadline taken from [`ConsoleConfig`].

use super::codec::{Command, LineCodec, Reply, Status, MAX_LINE_LENGTH};
use super::error::ConsoleError;
use crate::config::ConsoleConfig;
use crate::gait::Vector3;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};

/// Why a reply could not be read
#[derive(Debug)]
enum ReadFailure {
    Timeout,
    Closed,
    TooLong,
    Io(std::io::Error),
}

/// Console session over a byte stream
///
/// Lifecycle: [`authenticate`](Self::authenticate), any number of
/// [`set_sensor`](Self::set_sensor), then [`disconnect`](Self::disconnect).
#[derive(Debug)]
pub struct ConsoleSession<S> {
    stream: S,
    codec: LineCodec,
    config: ConsoleConfig,
    /// Peer address, for logging
    peer: String,
    /// Greeting banner consumed
    greeted: bool,
    authenticated: bool,
    /// EOF observed on the read side
    peer_closed: bool,
    disconnected: bool,
    /// Replies still owed for commands that timed out; skipped when they arrive
    unanswered: usize,
}

impl ConsoleSession<TcpStream> {
    /// Open a TCP connection to the console
    pub async fn connect(host: &str, port: u16, config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let addr = format!("{}:{}", host, port);
        let connect_timeout = config.connect_timeout();

        let stream = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
            Err(_) => {
                return Err(ConsoleError::ConnectTimeout {
                    addr,
                    timeout: connect_timeout,
                })
            }
            Ok(Err(source)) => return Err(ConsoleError::Connect { addr, source }),
            Ok(Ok(stream)) => stream,
        };

        // One short command per tick; don't let Nagle batch them
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        tracing::info!(%addr, "Connected to emulator console");
        Ok(Self::new(stream, config).with_peer(addr))
    }
}

impl<S> ConsoleSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already established stream
    pub fn new(stream: S, config: ConsoleConfig) -> Self {
        Self {
            stream,
            codec: LineCodec::new(),
            config,
            peer: "console".to_string(),
            greeted: false,
            authenticated: false,
            peer_closed: false,
            disconnected: false,
            unanswered: 0,
        }
    }

    fn with_peer(mut self, peer: String) -> Self {
        self.peer = peer;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// True until the peer closes the stream or [`disconnect`](Self::disconnect) runs
    pub fn is_open(&self) -> bool {
        !self.peer_closed && !self.disconnected
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Consume the greeting banner if needed, then send `auth <token>`
    ///
    /// A rejected token leaves the session open for another attempt.
    pub async fn authenticate(&mut self, token: &str) -> Result<(), ConsoleError> {
        if self.disconnected {
            return Err(ConsoleError::Disconnected);
        }
        if self.peer_closed {
            return Err(ConsoleError::ConnectionClosed);
        }
        if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConsoleError::InvalidToken);
        }

        let limit = self.config.auth_timeout();

        if !self.greeted {
            let deadline = Instant::now() + limit;
            let greeting = self
                .read_reply(deadline)
                .await
                .map_err(|f| Self::auth_read_error(f, ConsoleError::GreetingTimeout(limit)))?;
            if let Status::Ko(message) = &greeting.status {
                tracing::warn!(peer = %self.peer, %message, "Console greeting ended with KO");
            }
            tracing::debug!(lines = greeting.body.len(), "Console greeting received");
            self.greeted = true;
        }

        let deadline = Instant::now() + limit;
        let command = Command::Auth(token).encode();
        match timeout_at(deadline, self.write_line(&command)).await {
            Err(_) => return Err(ConsoleError::AuthTimeout(limit)),
            Ok(Err(e)) => return Err(ConsoleError::AuthIo(e)),
            Ok(Ok(())) => {}
        }

        let reply = match self.read_reply(deadline).await {
            Ok(reply) => reply,
            Err(failure) => {
                if matches!(failure, ReadFailure::Timeout) {
                    self.unanswered += 1;
                }
                return Err(Self::auth_read_error(failure, ConsoleError::AuthTimeout(limit)));
            }
        };

        match reply.status {
            Status::Ok => {
                self.authenticated = true;
                tracing::info!(peer = %self.peer, "Authenticated with emulator console");
                Ok(())
            }
            Status::Ko(message) => {
                tracing::warn!(peer = %self.peer, %message, "Console rejected auth token");
                Err(ConsoleError::AuthRejected(message))
            }
        }
    }

    fn auth_read_error(failure: ReadFailure, on_timeout: ConsoleError) -> ConsoleError {
        match failure {
            ReadFailure::Timeout => on_timeout,
            ReadFailure::Closed => ConsoleError::ConnectionClosed,
            ReadFailure::TooLong => ConsoleError::LineTooLong(MAX_LINE_LENGTH),
            ReadFailure::Io(e) => ConsoleError::AuthIo(e),
        }
    }

    /// Send `sensor set <sensor> <x>:<y>:<z>` and wait for `OK`
    ///
    /// Refused without touching the stream unless authenticated.
    pub async fn set_sensor(&mut self, sensor: &str, value: Vector3) -> Result<(), ConsoleError> {
        let command = Command::SensorSet { sensor, value };
        let line = command.to_string();

        if self.disconnected {
            return Err(ConsoleError::Disconnected);
        }
        if !self.authenticated {
            return Err(ConsoleError::NotAuthenticated(line));
        }
        if sensor.is_empty()
            || !sensor
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConsoleError::InvalidSensorName(sensor.to_string()));
        }

        // Still written after EOF; the peer may have closed only its write side
        let limit = self.config.command_timeout();
        let deadline = Instant::now() + limit;

        match timeout_at(deadline, self.write_line(&command.encode())).await {
            Err(_) => {
                return Err(ConsoleError::ReplyTimeout {
                    command: line,
                    timeout: limit,
                })
            }
            Ok(Err(source)) => return Err(ConsoleError::CommandIo { command: line, source }),
            Ok(Ok(())) => {}
        }
        tracing::trace!(command = %line, "Sent");

        let reply = match self.read_reply(deadline).await {
            Ok(reply) => reply,
            Err(ReadFailure::Timeout) => {
                self.unanswered += 1;
                return Err(ConsoleError::ReplyTimeout {
                    command: line,
                    timeout: limit,
                });
            }
            Err(ReadFailure::Closed) => return Err(ConsoleError::StreamClosed { command: line }),
            Err(ReadFailure::TooLong) => return Err(ConsoleError::LineTooLong(MAX_LINE_LENGTH)),
            Err(ReadFailure::Io(source)) => {
                return Err(ConsoleError::CommandIo { command: line, source })
            }
        };

        match reply.status {
            Status::Ok => Ok(()),
            Status::Ko(message) => Err(ConsoleError::CommandRejected {
                command: line,
                message,
            }),
        }
    }

    /// Send `quit` and close the stream; never fails, second call is a no-op
    pub async fn disconnect(&mut self) {
        if self.disconnected {
            return;
        }
        self.disconnected = true;
        self.authenticated = false;

        let limit = self.config.quit_timeout();
        match timeout(limit, self.write_line(&Command::Quit.encode())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Failed to send quit"),
            Err(_) => tracing::debug!("Timed out sending quit"),
        }
        match timeout(limit, self.stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Failed to shut down console stream"),
            Err(_) => tracing::debug!("Timed out shutting down console stream"),
        }

        tracing::info!(peer = %self.peer, "Console connection closed");
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.flush().await
    }

    /// Read until the codec yields a full reply or the deadline passes
    ///
    /// Late replies to timed-out commands are discarded first.
    async fn read_reply(&mut self, deadline: Instant) -> Result<Reply, ReadFailure> {
        let mut buf = [0u8; 1024];
        loop {
            if let Some(reply) = self.codec.next_reply() {
                if self.unanswered > 0 {
                    self.unanswered -= 1;
                    tracing::debug!(
                        status = ?reply.status,
                        still_owed = self.unanswered,
                        "Discarded late console reply"
                    );
                    continue;
                }
                return Ok(reply);
            }
            if self.peer_closed {
                return Err(ReadFailure::Closed);
            }

            let n = match timeout_at(deadline, self.stream.read(&mut buf)).await {
                Err(_) => {
                    if self.codec.has_partial() {
                        tracing::debug!(
                            pending = self.codec.pending_lines().len(),
                            "Reply incomplete at deadline"
                        );
                    }
                    return Err(ReadFailure::Timeout);
                }
                Ok(Err(e)) => return Err(ReadFailure::Io(e)),
                Ok(Ok(n)) => n,
            };

            if n == 0 {
                tracing::debug!(peer = %self.peer, "Console closed its end of the stream");
                self.peer_closed = true;
                continue;
            }

            if self.codec.feed(&buf[..n]).is_err() {
                return Err(ReadFailure::TooLong);
            }
        }
    }
}
