// Classifier error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Classifier error code constants
///
/// These constants provide a single source of truth for error codes
/// reported by the press classifier and the bridge orchestration layer.
///
/// Error code range: 1001-1003
pub struct ClassifierErrorCodes {}

impl ClassifierErrorCodes {
    /// No timer facility is reachable; debounce logic cannot function
    pub const TIMER_UNAVAILABLE: i32 = 1001;

    /// Monitoring is already active
    pub const ALREADY_MONITORING: i32 = 1002;

    /// Mutex guarding the classifier state was poisoned
    pub const LOCK_POISONED: i32 = 1003;
}

/// Log a classifier error with structured context
///
/// Logs the numeric error code alongside the component and call site so a
/// session transcript can be correlated without parsing message text.
pub fn log_classifier_error(err: &ClassifierError, context: &str) {
    error!(
        "Classifier error in {}: code={}, component=PressClassifier, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Classifier-related errors
///
/// These errors cover classifier construction and the monitoring lifecycle.
/// The debounce and long-press logic depends entirely on delayed callbacks,
/// so a missing timer facility is fatal at construction time rather than a
/// runtime degradation.
///
/// Error code range: 1001-1003
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// No timer facility is available (no async runtime reachable)
    TimerUnavailable { reason: String },

    /// Monitoring was started while already running
    AlreadyMonitoring,

    /// Mutex/RwLock was poisoned
    LockPoisoned { component: String },
}

impl ErrorCode for ClassifierError {
    fn code(&self) -> i32 {
        match self {
            ClassifierError::TimerUnavailable { .. } => ClassifierErrorCodes::TIMER_UNAVAILABLE,
            ClassifierError::AlreadyMonitoring => ClassifierErrorCodes::ALREADY_MONITORING,
            ClassifierError::LockPoisoned { .. } => ClassifierErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            ClassifierError::TimerUnavailable { reason } => {
                format!(
                    "Timer facility unavailable, cannot run debounce logic: {}",
                    reason
                )
            }
            ClassifierError::AlreadyMonitoring => {
                "Monitoring already active. Call stop_monitoring() first.".to_string()
            }
            ClassifierError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
        }
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClassifierError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ClassifierError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_error_codes() {
        assert_eq!(
            ClassifierError::TimerUnavailable {
                reason: "test".to_string()
            }
            .code(),
            ClassifierErrorCodes::TIMER_UNAVAILABLE
        );
        assert_eq!(
            ClassifierError::AlreadyMonitoring.code(),
            ClassifierErrorCodes::ALREADY_MONITORING
        );
        assert_eq!(
            ClassifierError::LockPoisoned {
                component: "test".to_string()
            }
            .code(),
            ClassifierErrorCodes::LOCK_POISONED
        );
    }

    #[test]
    fn test_classifier_error_messages() {
        let err = ClassifierError::TimerUnavailable {
            reason: "no runtime".to_string(),
        };
        assert!(err.message().contains("no runtime"));

        let err = ClassifierError::AlreadyMonitoring;
        assert!(err.message().contains("already active"));

        let err = ClassifierError::LockPoisoned {
            component: "ClassifierState".to_string(),
        };
        assert_eq!(err.message(), "Lock poisoned on ClassifierState");
    }

    #[test]
    fn test_classifier_error_display() {
        let err = ClassifierError::AlreadyMonitoring;
        let display = format!("{}", err);
        assert!(display.contains("ClassifierError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
