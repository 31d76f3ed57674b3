// Transport error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Transport error code constants
///
/// Error code range: 2001-2003
pub struct TransportErrorCodes {}

impl TransportErrorCodes {
    /// No peripheral is connected
    pub const NOT_CONNECTED: i32 = 2001;

    /// The write to the remote attribute failed
    pub const WRITE_FAILED: i32 = 2002;

    /// The remote command attribute was not found on the peripheral
    pub const ATTRIBUTE_MISSING: i32 = 2003;
}

/// Log a transport error with structured context
///
/// Send failures are reported here and the gesture is dropped; the router
/// never retries or queues a command (a missed press beats a stale one).
pub fn log_transport_error(err: &TransportError, context: &str) {
    error!(
        "Transport error in {}: code={}, component=Transport, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors surfaced by the wireless transport capability
///
/// The transport itself (scanning, pairing, connection lifecycle) lives
/// outside this crate; these are the failures its `send` operation can
/// report back across the boundary.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No peripheral is connected
    NotConnected,

    /// The write to the remote attribute failed
    WriteFailed { reason: String },

    /// The remote command attribute was not found on the peripheral
    AttributeMissing,
}

impl ErrorCode for TransportError {
    fn code(&self) -> i32 {
        match self {
            TransportError::NotConnected => TransportErrorCodes::NOT_CONNECTED,
            TransportError::WriteFailed { .. } => TransportErrorCodes::WRITE_FAILED,
            TransportError::AttributeMissing => TransportErrorCodes::ATTRIBUTE_MISSING,
        }
    }

    fn message(&self) -> String {
        match self {
            TransportError::NotConnected => {
                "No peripheral connected; command dropped.".to_string()
            }
            TransportError::WriteFailed { reason } => {
                format!("Characteristic write failed: {}", reason)
            }
            TransportError::AttributeMissing => {
                "Command attribute not found on peripheral.".to_string()
            }
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransportError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for TransportError {}
