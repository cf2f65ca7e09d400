//! Console session errors

use std::time::Duration;
use thiserror::Error;

/// Coarse classification used by the simulation loop and the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport could not be established or the peer went away before use
    Connection,
    /// Token rejected or handshake not observed
    Authentication,
    /// A command failed once the session was running
    Protocol,
    /// The session was used in the wrong order
    Precondition,
}

/// Errors that can occur during console session operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("could not connect to console at {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("timed out connecting to console at {addr} after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    #[error("console closed the connection")]
    ConnectionClosed,

    #[error("console I/O failed during authentication: {0}")]
    AuthIo(std::io::Error),

    #[error("console greeting not received within {0:?}")]
    GreetingTimeout(Duration),

    #[error("no reply to auth within {0:?}")]
    AuthTimeout(Duration),

    #[error("authentication rejected by console: {0}")]
    AuthRejected(String),

    #[error("auth token is empty or contains whitespace")]
    InvalidToken,

    #[error("console rejected `{command}`: {message}")]
    CommandRejected { command: String, message: String },

    #[error("no reply to `{command}` within {timeout:?}")]
    ReplyTimeout { command: String, timeout: Duration },

    #[error("console stream closed during `{command}`")]
    StreamClosed { command: String },

    #[error("console I/O failed during `{command}`: {source}")]
    CommandIo {
        command: String,
        source: std::io::Error,
    },

    #[error("console sent a line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("`{0}` refused: session is not authenticated")]
    NotAuthenticated(String),

    #[error("invalid sensor name {0:?}")]
    InvalidSensorName(String),

    #[error("session already disconnected")]
    Disconnected,
}

impl ConsoleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect { .. }
            | Self::ConnectTimeout { .. }
            | Self::ConnectionClosed
            | Self::AuthIo(_) => ErrorKind::Connection,
            Self::GreetingTimeout(_)
            | Self::AuthTimeout(_)
            | Self::AuthRejected(_)
            | Self::InvalidToken => ErrorKind::Authentication,
            Self::CommandRejected { .. }
            | Self::ReplyTimeout { .. }
            | Self::StreamClosed { .. }
            | Self::CommandIo { .. }
            | Self::LineTooLong(_) => ErrorKind::Protocol,
            Self::NotAuthenticated(_) | Self::InvalidSensorName(_) | Self::Disconnected => {
                ErrorKind::Precondition
            }
        }
    }
}
