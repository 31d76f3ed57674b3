// Level source error types and constants

use crate::error::ErrorCode;
use std::fmt;

/// Level source error code constants
///
/// Error code range: 3001-3002
pub struct SourceErrorCodes {}

impl SourceErrorCodes {
    /// The audio subsystem cannot be queried right now
    pub const UNAVAILABLE: i32 = 3001;

    /// The requested stream is not known to the audio subsystem
    pub const UNKNOWN_STREAM: i32 = 3002;
}

/// Errors from the audio level query boundary
///
/// A failing level query makes the stream unmonitorable for the moment; the
/// classifier produces no gesture events until a subsequent query succeeds.
/// This is a recoverable degradation, never fatal.
///
/// Error code range: 3001-3002
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The audio subsystem cannot be queried right now
    Unavailable { reason: String },

    /// The requested stream is not known to the audio subsystem
    UnknownStream { stream: u32 },
}

impl ErrorCode for SourceError {
    fn code(&self) -> i32 {
        match self {
            SourceError::Unavailable { .. } => SourceErrorCodes::UNAVAILABLE,
            SourceError::UnknownStream { .. } => SourceErrorCodes::UNKNOWN_STREAM,
        }
    }

    fn message(&self) -> String {
        match self {
            SourceError::Unavailable { reason } => {
                format!("Audio subsystem unavailable: {}", reason)
            }
            SourceError::UnknownStream { stream } => {
                format!("Unknown audio stream {}", stream)
            }
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SourceError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_codes() {
        assert_eq!(
            SourceError::Unavailable {
                reason: "test".to_string()
            }
            .code(),
            SourceErrorCodes::UNAVAILABLE
        );
        assert_eq!(
            SourceError::UnknownStream { stream: 3 }.code(),
            SourceErrorCodes::UNKNOWN_STREAM
        );
    }

    #[test]
    fn test_source_error_messages() {
        let err = SourceError::UnknownStream { stream: 3 };
        assert_eq!(err.message(), "Unknown audio stream 3");
    }
}
