//! Wireless transport boundary.
//!
//! The radio itself (scanning, pairing, GATT connection lifecycle) lives
//! outside this crate. The core only needs a write capability for short
//! command payloads, passed in explicitly so the classifier is unit-testable
//! without hardware — there is no global transport handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::TransportError;

/// Write capability for outbound commands.
///
/// `send` pushes one command payload to the pre-identified remote attribute.
/// No acknowledgement is awaited; delivery confidence is the transport's
/// responsibility.
pub trait Transport: Send + Sync {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError>;
}

/// Transport that logs and discards every command.
///
/// Used by the simulator and as a stand-in while no peripheral is paired.
#[derive(Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        log::debug!("[NullTransport] discarding command {:02x?}", payload);
        Ok(())
    }
}

/// Transport test double that records every payload it is asked to send.
pub struct RecordingTransport {
    sent: Mutex<Vec<Vec<u8>>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent sends fail with a write error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Payloads successfully sent so far, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().expect("sent payloads poisoned").clone()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::WriteFailed {
                reason: "recording transport set to fail".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("sent payloads poisoned")
            .push(payload.to_vec());
        Ok(())
    }
}
