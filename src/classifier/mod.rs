// PressClassifier - debounce/aggregate/timeout press state machine
//
// This module turns the raw "volume level changed" notification stream into
// semantic gesture events. The raw stream is hostile in three ways:
//
// - each physical press is observed to fire two identical notifications,
// - there is no burst-boundary marker, a press sequence only ends in silence,
// - at the ends of the volume range the level stops changing entirely, so
//   "level changed" cannot be the sole presence signal near the boundary.
//
// The classifier absorbs all three: notifications contribute fractional
// sub-events (1 / notifications_per_press each), saturation streaks infer
// direction when the level is pinned at min or max, and a generation-stamped
// settle timer resolves the burst once the stream has been silent for the
// release timeout.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, ErrorCode};
use crate::gesture::{Direction, GestureEvent};
use crate::source::{LevelNotification, LevelSource};
use crate::timer::TimerFacility;

/// Mutable classifier state, owned by a single mutex domain.
///
/// Notification handling and timer callbacks both touch this; unsynchronized
/// access to `sub_event_count` would silently lose presses, so every read and
/// mutation goes through the one lock.
#[derive(Debug)]
struct ClassifierState {
    /// Last observed level, init = sampled current level.
    prior_level: i32,
    /// Accumulated fractional sub-events for the current burst; exactly 0
    /// between bursts, never negative.
    sub_event_count: f64,
    /// Consecutive notifications with the level pinned at max.
    saturation_up_streak: u32,
    /// Consecutive notifications with the level pinned at min.
    saturation_down_streak: u32,
    /// Guards against a second LongPress within one burst.
    long_press_reported: bool,
    /// Strictly increasing; a timer callback captured under an older value
    /// is stale and must discard itself.
    burst_generation: u64,
}

/// Classifies raw level notifications into gesture events.
///
/// Gesture events are published on the broadcast channel handed in at
/// construction; per burst they arrive as direction changes (zero or more),
/// LongPress (zero or one), the final press-count event, then Release.
pub struct PressClassifier {
    source: Arc<dyn LevelSource>,
    config: ClassifierConfig,
    timers: TimerFacility,
    state: Arc<Mutex<ClassifierState>>,
    events_tx: broadcast::Sender<GestureEvent>,
}

impl PressClassifier {
    /// Create a classifier bound to the current async runtime.
    ///
    /// The prior level is sampled immediately so the first real press
    /// produces a correct direction. A failing sample is recoverable (the
    /// stream is simply unmonitorable until a query succeeds), but a missing
    /// timer facility is a construction error.
    pub fn new(
        source: Arc<dyn LevelSource>,
        config: ClassifierConfig,
        events_tx: broadcast::Sender<GestureEvent>,
    ) -> Result<Self, ClassifierError> {
        let timers = TimerFacility::from_current_runtime()?;

        let prior_level = match source.current_level(config.monitored_stream) {
            Ok(level) => level,
            Err(err) => {
                log::warn!(
                    "[PressClassifier] Initial level sample failed (code {}): {}",
                    err.code(),
                    err.message()
                );
                0
            }
        };

        Ok(Self {
            source,
            config,
            timers,
            state: Arc::new(Mutex::new(ClassifierState {
                prior_level,
                sub_event_count: 0.0,
                saturation_up_streak: 0,
                saturation_down_streak: 0,
                long_press_reported: false,
                burst_generation: 0,
            })),
            events_tx,
        })
    }

    /// Handle one raw level-change notification.
    ///
    /// Samples the current level and range bounds, emits a direction event
    /// when one can be inferred, accumulates the sub-event counter, and arms
    /// the settle timer when this notification opens a new burst. A failing
    /// level query produces no events at all.
    pub fn handle_notification(&self, notification: &LevelNotification) {
        if !self.matches_stream(notification) {
            return;
        }

        let stream = self.config.monitored_stream;
        let (level, min, max) = match (
            self.source.current_level(stream),
            self.source.min_level(stream),
            self.source.max_level(stream),
        ) {
            (Ok(level), Ok(min), Ok(max)) => (level, min, max),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                log::warn!(
                    "[PressClassifier] Level query failed, stream unmonitorable (code {}): {}",
                    err.code(),
                    err.message()
                );
                return;
            }
        };

        let new_burst_generation = {
            let mut state = match self.lock_state() {
                Some(state) => state,
                None => return,
            };

            self.observe_direction(&mut state, level, min, max);

            let was_idle = state.sub_event_count == 0.0;
            state.sub_event_count += self.config.sub_event_increment();

            if was_idle {
                state.burst_generation += 1;
                Some(state.burst_generation)
            } else {
                None
            }
        };

        if let Some(generation) = new_burst_generation {
            tracing::debug!(generation, "burst started, arming settle timer");
            self.arm_settle_timer(generation);
        }
    }

    /// Invalidate all pending timer callbacks and reset burst state.
    ///
    /// Called when monitoring stops: any settle timer still in flight sees a
    /// newer generation and discards itself, so nothing can mutate state or
    /// emit events after this returns.
    pub fn invalidate(&self) {
        if let Some(mut state) = self.lock_state() {
            state.burst_generation += 1;
            state.sub_event_count = 0.0;
            state.saturation_up_streak = 0;
            state.saturation_down_streak = 0;
            state.long_press_reported = false;
        }
    }

    fn matches_stream(&self, notification: &LevelNotification) -> bool {
        match (self.config.monitored_stream, notification.stream) {
            (Some(wanted), Some(stream)) => wanted == stream,
            // Broadcast notifications match any filter; an unset filter
            // matches any stream.
            _ => true,
        }
    }

    /// Infer and emit a direction for this notification, if one exists.
    ///
    /// A real level delta always wins and resets both saturation streaks.
    /// With the level pinned at an endpoint there is no delta to read, so
    /// every second consecutive pinned notification is surfaced as one press
    /// in the boundary direction — two, because each physical press is
    /// expected to deliver `notifications_per_press` raw notifications.
    fn observe_direction(&self, state: &mut ClassifierState, level: i32, min: i32, max: i32) {
        let pinned_streak_target = self.config.notifications_per_press.max(1);

        if level != state.prior_level {
            let direction = if level > state.prior_level {
                Direction::Up
            } else {
                Direction::Down
            };
            state.saturation_up_streak = 0;
            state.saturation_down_streak = 0;
            state.prior_level = level;
            self.emit(GestureEvent::DirectionChanged(direction));
        } else if level == min {
            state.saturation_down_streak += 1;
            if state.saturation_down_streak == pinned_streak_target {
                state.saturation_down_streak = 0;
                self.emit(GestureEvent::DirectionChanged(Direction::Down));
            }
        } else if level == max {
            state.saturation_up_streak += 1;
            if state.saturation_up_streak == pinned_streak_target {
                state.saturation_up_streak = 0;
                self.emit(GestureEvent::DirectionChanged(Direction::Up));
            }
        }
    }

    /// Arm the settle timer for a freshly started burst.
    ///
    /// Fires after `double_press_timeout - release_timeout`, then runs the
    /// poll loop: snapshot the counter, wait one release timeout, and either
    /// re-arm (counter moved, burst still active) or resolve the burst
    /// (counter silent). Modeled as an explicit loop, not re-entrant timer
    /// recursion, so the burst length bounds the iterations naturally.
    fn arm_settle_timer(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let events_tx = self.events_tx.clone();
        let release_timeout = self.config.release_timeout();

        let _ = self.timers.schedule(self.config.settle_delay(), async move {
            loop {
                let pushes_at_start = {
                    let state = match state.lock() {
                        Ok(state) => state,
                        Err(_) => {
                            log::error!("[PressClassifier] State lock poisoned in settle timer");
                            return;
                        }
                    };
                    if state.burst_generation != generation {
                        tracing::trace!(generation, "stale settle timer discarded");
                        return;
                    }
                    state.sub_event_count
                };

                tokio::time::sleep(release_timeout).await;

                // Lock once per iteration; events are sent while holding the
                // lock so a concurrent notification cannot interleave its
                // direction event into this burst's terminal sequence.
                let resolved = {
                    let mut state = match state.lock() {
                        Ok(state) => state,
                        Err(_) => {
                            log::error!("[PressClassifier] State lock poisoned in poll loop");
                            return;
                        }
                    };
                    if state.burst_generation != generation {
                        tracing::trace!(generation, "stale poll loop discarded");
                        return;
                    }

                    if state.sub_event_count != pushes_at_start {
                        // More presses arrived during the wait.
                        if state.sub_event_count > 2.0 && !state.long_press_reported {
                            state.long_press_reported = true;
                            send_event(&events_tx, GestureEvent::LongPress);
                        }
                        false
                    } else {
                        let count = state.sub_event_count.round() as u32;
                        send_event(&events_tx, GestureEvent::from_press_count(count));
                        send_event(
                            &events_tx,
                            GestureEvent::DirectionChanged(Direction::Release),
                        );
                        state.sub_event_count = 0.0;
                        state.long_press_reported = false;
                        true
                    }
                };

                if resolved {
                    return;
                }
            }
        });
    }

    fn emit(&self, event: GestureEvent) {
        send_event(&self.events_tx, event);
    }

    fn lock_state(&self) -> Option<MutexGuard<'_, ClassifierState>> {
        match self.state.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                log::error!("[PressClassifier] State lock poisoned in notification handler");
                None
            }
        }
    }
}

fn send_event(events_tx: &broadcast::Sender<GestureEvent>, event: GestureEvent) {
    tracing::debug!(?event, "gesture");
    // Send fails only when no subscriber exists, which is fine: the bridge
    // may run with observers detached.
    let _ = events_tx.send(event);
}
