//! Audio level source abstraction.
//!
//! The platform delivers "level changed" notifications with no payload worth
//! trusting, so the classifier re-queries the current level and the range
//! bounds on every event. These are pure queries with no ordering guarantee
//! against the notification that triggered them; callers must tolerate stale
//! values.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::error::SourceError;

/// Identifier of an audio stream on the host platform.
pub type StreamId = u32;

/// A raw "volume level changed" notification.
///
/// Carries only the stream it concerns (or None for a broadcast); the level
/// itself is sampled on demand because delivery is duplicated and unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNotification {
    pub stream: Option<StreamId>,
}

impl LevelNotification {
    pub fn broadcast() -> Self {
        Self { stream: None }
    }

    pub fn for_stream(stream: StreamId) -> Self {
        Self {
            stream: Some(stream),
        }
    }
}

/// Trait implemented by platform audio subsystems.
///
/// `stream == None` queries the default stream. Min and max are re-read per
/// event because the platform volume curve can change at runtime.
pub trait LevelSource: Send + Sync {
    fn current_level(&self, stream: Option<StreamId>) -> Result<i32, SourceError>;
    fn min_level(&self, stream: Option<StreamId>) -> Result<i32, SourceError>;
    fn max_level(&self, stream: Option<StreamId>) -> Result<i32, SourceError>;
}

/// In-memory level source for tests and the simulator.
///
/// Level and availability are settable from the outside; min and max are
/// fixed at construction.
pub struct StubLevelSource {
    min: AtomicI32,
    max: AtomicI32,
    level: AtomicI32,
    unavailable: AtomicBool,
}

impl StubLevelSource {
    pub fn new(min: i32, max: i32, initial: i32) -> Self {
        Self {
            min: AtomicI32::new(min),
            max: AtomicI32::new(max),
            level: AtomicI32::new(initial),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Move the stub volume, clamped to the configured range.
    pub fn set_level(&self, level: i32) {
        let min = self.min.load(Ordering::SeqCst);
        let max = self.max.load(Ordering::SeqCst);
        self.level.store(level.clamp(min, max), Ordering::SeqCst);
    }

    /// Step the stub volume by a delta, saturating at the range endpoints.
    pub fn step(&self, delta: i32) {
        let current = self.level.load(Ordering::SeqCst);
        self.set_level(current + delta);
    }

    /// Simulate the audio subsystem going away (all queries fail).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), SourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(SourceError::Unavailable {
                reason: "stub marked unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl LevelSource for StubLevelSource {
    fn current_level(&self, _stream: Option<StreamId>) -> Result<i32, SourceError> {
        self.check_available()?;
        Ok(self.level.load(Ordering::SeqCst))
    }

    fn min_level(&self, _stream: Option<StreamId>) -> Result<i32, SourceError> {
        self.check_available()?;
        Ok(self.min.load(Ordering::SeqCst))
    }

    fn max_level(&self, _stream: Option<StreamId>) -> Result<i32, SourceError> {
        self.check_available()?;
        Ok(self.max.load(Ordering::SeqCst))
    }
}
