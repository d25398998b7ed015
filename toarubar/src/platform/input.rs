//! Input events delivered to bars through registered hooks.
//!
//! Touch positions arrive normalized to `0.0..=1.0` across the touched
//! output, the way the host receives them from its input devices.

use std::time::Instant;

use strum::EnumIs;

use crate::types::{Point, Logical};

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum MouseButton {
    /// The primary button.
    Left,
    /// The middle button.
    Middle,
    /// The secondary button.
    Right,
    /// Any other button, by its evdev code.
    Other(u32),
}

/// A mouse button was pressed or released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    /// The button that changed state.
    pub button: MouseButton,
    /// Whether the button is now held down.
    pub pressed: bool,
    /// When the event happened.
    pub time: Instant,
}

/// The pointer moved. The new position is read from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMotionEvent {
    /// When the event happened.
    pub time: Instant,
}

/// A finger touched down.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchDownEvent {
    /// The touch point identifier.
    pub id: i32,
    /// The normalized position on the touched output.
    pub position: Point<f64, Logical>,
    /// The name of the output the touch device is mapped to, if any.
    pub output: Option<String>,
    /// When the event happened.
    pub time: Instant,
}

/// A finger was lifted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchUpEvent {
    /// The touch point identifier.
    pub id: i32,
    /// When the event happened.
    pub time: Instant,
}

/// A finger moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchMotionEvent {
    /// The touch point identifier.
    pub id: i32,
    /// The normalized position on the window's monitor.
    pub position: Point<f64, Logical>,
    /// When the event happened.
    pub time: Instant,
}

/// Whether an event handler claimed the event.
///
/// A consumed event is not delivered to the window underneath the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIs)]
pub enum EventResult {
    /// Let the host keep processing the event.
    #[default]
    Pass,
    /// Stop the host from processing the event further.
    Consume,
}

impl EventResult {
    /// Consume if either result consumes.
    #[must_use]
    pub fn or(self, other: EventResult) -> EventResult {
        if self.is_consume() || other.is_consume() {
            EventResult::Consume
        } else {
            EventResult::Pass
        }
    }
}

impl From<bool> for EventResult {
    fn from(consume: bool) -> Self {
        if consume {
            EventResult::Consume
        } else {
            EventResult::Pass
        }
    }
}
