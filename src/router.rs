//! Gesture-to-command routing.
//!
//! Maps semantic gesture events onto the peripheral's 3-command protocol and
//! invokes the transport capability. Only directional events carry a command;
//! press-count events are observable for logging and UI glue but are not
//! forwarded. Send failures are logged and the gesture is dropped — never
//! retried, never queued.

use std::sync::Arc;

use crate::error::log_transport_error;
use crate::gesture::{Direction, GestureEvent};
use crate::transport::Transport;

/// Routes gesture events to the outbound transport.
pub struct GestureRouter {
    transport: Arc<dyn Transport>,
    forward_release: bool,
}

impl GestureRouter {
    /// Create a router over the given transport capability.
    ///
    /// `forward_release` additionally forwards the 0x03 release command;
    /// the default wiring sends only Up/Down, mirroring the peripheral's
    /// original protocol use.
    pub fn new(transport: Arc<dyn Transport>, forward_release: bool) -> Self {
        Self {
            transport,
            forward_release,
        }
    }

    /// Route one gesture event, sending at most one command.
    pub fn route(&self, event: &GestureEvent) {
        match event {
            GestureEvent::DirectionChanged(direction) => {
                if *direction == Direction::Release && !self.forward_release {
                    tracing::debug!("release observed, not forwarded");
                    return;
                }
                let command = direction.command();
                if let Err(err) = self.transport.send(&command) {
                    log_transport_error(&err, "route");
                }
            }
            observed => {
                // Press-count and long-press events are surfaced to
                // subscribers only.
                tracing::debug!(?observed, "gesture observed, no command mapped");
            }
        }
    }
}
