//! Android emulator console client
//!
//! Only the commands the simulator needs: `auth`, `sensor set`, `quit`.
//!
//! - Reply framing and command encoding ([`codec`])
//! - Error taxonomy ([`error`])
//! - Connection, authentication and sensor commands ([`session`])

pub mod codec;
pub mod error;
pub mod session;

pub use codec::ACCELERATION_SENSOR;
pub use error::{ConsoleError, ErrorKind};
pub use session::ConsoleSession;

/// Where and how to reach the console; owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub host: String,
    pub port: u16,
    pub token: String,
}

impl SessionCredentials {
    pub fn new(host: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            token: token.into(),
        }
    }
}
