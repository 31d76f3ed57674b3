// Error types for the presenter bridge.
//
// This module defines custom error types for the classifier, the wireless
// transport boundary and the audio level source, providing structured error
// handling with numeric codes suitable for logs and diagnostics.

mod classifier;
mod source;
mod transport;

pub use classifier::{log_classifier_error, ClassifierError, ClassifierErrorCodes};
pub use source::{SourceError, SourceErrorCodes};
pub use transport::{log_transport_error, TransportError, TransportErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// components without stringly-typed matching.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
