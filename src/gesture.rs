// Gesture events produced by the press classifier.
//
// Direction carries the fixed one-byte command understood by the paired
// peripheral (0x01 up, 0x02 down, 0x03 release). GestureEvent is the closed
// tagged union consumed by the router and any observer subscribed to the
// gesture broadcast; there is deliberately no open listener interface.

use serde::{Deserialize, Serialize};

/// Direction of a volume movement, or the release of the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Release,
}

impl Direction {
    /// The fixed command payload written to the peripheral for this direction.
    pub const fn command(self) -> [u8; 1] {
        match self {
            Direction::Up => [0x01],
            Direction::Down => [0x02],
            Direction::Release => [0x03],
        }
    }
}

/// Semantic gesture emitted once the classifier has resolved raw notifications.
///
/// For a single burst the emission order is always: zero or more
/// `DirectionChanged`, at most one `LongPress`, exactly one press-count event,
/// then `DirectionChanged(Release)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// The volume level moved, or a saturated press was inferred at the
    /// range boundary.
    DirectionChanged(Direction),
    /// Exactly one press in the burst.
    SinglePress,
    /// Exactly two presses in the burst.
    DoublePress,
    /// N-fold press for any other count (including 0 for a half-counted burst).
    Pressed { count: u32 },
    /// The button was held past a double-press worth of sub-events.
    LongPress,
}

impl GestureEvent {
    /// Map a resolved press count to its gesture event.
    pub fn from_press_count(count: u32) -> Self {
        match count {
            1 => GestureEvent::SinglePress,
            2 => GestureEvent::DoublePress,
            count => GestureEvent::Pressed { count },
        }
    }
}
