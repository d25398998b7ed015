//! The press/drag/double-click state machine of a single bar.
//!
//! A [`GestureController`] turns presses, motion and releases on a bar into
//! [`HostAction`]s. It never talks to the host itself: the caller decides
//! whether input is valid, converts positions into bar-local coordinates,
//! then dispatches whatever actions come back.
//!
//! ```text
//!            press (not on a button)          motion
//!   Idle ---------------------------> PressPending ---------> Dragging
//!    ^                                     |                     |
//!    +------------- release ---------------+---------------------+
//! ```
//!
//! Only one pointer drives a gesture at a time: while a gesture is active,
//! presses from any other source are ignored.

use std::time::{Duration, Instant};

use strum::EnumIs;
use tracing::{debug, trace};

use crate::config::ButtonSpec;
use crate::layout::ButtonLayout;
use crate::platform::HostAction;
use crate::types::{WindowId, Point, Logical};

/// Two presses closer together than this form a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// The size a window dragged by touch is resized to, in percent of its monitor.
pub const TOUCH_DRAG_SIZE_PERCENT: u8 = 50;

/// The phase of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIs)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The bar was pressed and may turn into a drag.
    PressPending,
    /// The window is being moved.
    Dragging,
}

/// What is driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum PointerSource {
    /// The mouse.
    Mouse,
    /// A finger, by touch point identifier.
    Touch(i32),
}

/// A press on or near a bar.
#[derive(Debug, Clone, Copy)]
pub struct Press<'a> {
    /// What pressed.
    pub source: PointerSource,
    /// The press position, relative to the bar's top-left corner.
    pub position: Point<f64, Logical>,
    /// When the press happened.
    pub time: Instant,
    /// The window the bar belongs to.
    pub window: WindowId,
    /// Whether the window has focus.
    pub focused: bool,
    /// Whether the window is floating.
    pub floating: bool,
    /// The bar's button layout, in logical space.
    pub layout: &'a ButtonLayout<Logical>,
    /// The bar's effective buttons.
    pub buttons: &'a [ButtonSpec],
    /// The double-click command, if any.
    pub double_click: Option<&'a str>,
}

/// The result of feeding an event to a [`GestureController`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureOutput {
    /// Requests to hand to the host, in order.
    pub actions: Vec<HostAction>,
    /// Whether the event should be kept from the window.
    pub consume: bool,
}

impl GestureOutput {
    fn consumed(actions: Vec<HostAction>) -> Self {
        Self { actions, consume: true }
    }

    fn passed(actions: Vec<HostAction>) -> Self {
        Self { actions, consume: false }
    }
}

/// Tracks the gesture in progress on one bar.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
    source: Option<PointerSource>,
    last_press: Option<Instant>,
    consumed_down: bool,
    touch_floated: bool,
}

impl GestureController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// The pointer driving the current gesture, if any.
    pub fn source(&self) -> Option<PointerSource> {
        self.source
    }

    /// Whether a gesture other than one driven by `source` is in progress.
    fn busy_with_other(&self, source: PointerSource) -> bool {
        !self.state.is_idle() && self.source.is_some_and(|s| s != source)
    }

    /// Handles a press.
    ///
    /// A press outside the bar's active region ends any drag and is never consumed.
    pub fn press(&mut self, press: Press<'_>) -> GestureOutput {
        if self.busy_with_other(press.source) {
            trace!(target: "gesture", "ignoring {:?} during a {:?} gesture", press.source, self.source);
            return GestureOutput::default()
        }

        if !press.layout.contains(press.position) {
            let actions = self.end_drag();
            self.reset();
            return GestureOutput::passed(actions)
        }

        let mut actions = Vec::new();
        if !press.focused {
            actions.push(HostAction::Focus(press.window));
        }
        if press.floating {
            actions.push(HostAction::BringToTop(press.window));
        }
        self.consumed_down = true;

        if let Some(idx) = press.layout.hit_button(press.buttons, press.position) {
            debug!(target: "gesture", "button {} pressed on {}", idx, press.window);
            actions.push(HostAction::Exec(press.buttons[idx].command.clone()));
            return GestureOutput::consumed(actions)
        }

        if let Some(command) = press.double_click {
            let is_double = self.last_press
                .is_some_and(|last| press.time.saturating_duration_since(last) < DOUBLE_CLICK_WINDOW);
            if is_double {
                debug!(target: "gesture", "double click on {}", press.window);
                actions.push(HostAction::Exec(command.to_string()));
                self.last_press = None;
                return GestureOutput::consumed(actions)
            }
        }

        self.last_press = Some(press.time);
        self.state = GestureState::PressPending;
        self.source = Some(press.source);
        self.touch_floated = false;

        GestureOutput::consumed(actions)
    }

    /// Handles mouse motion. Turns a pending mouse press into a drag.
    pub fn mouse_motion(&mut self) -> GestureOutput {
        if self.state.is_press_pending() && self.source == Some(PointerSource::Mouse) {
            self.state = GestureState::Dragging;
            return GestureOutput::passed(vec![HostAction::BeginMove])
        }
        GestureOutput::default()
    }

    /// Handles touch motion.
    ///
    /// `position` is the finger in global logical coordinates and `bar_width`
    /// the width of the bar; the window is moved so the finger sits at the
    /// middle of its top edge, truncated to whole pixels. The first motion of a touch gesture floats,
    /// shrinks and pins the window.
    pub fn touch_motion(
        &mut self,
        id: i32,
        position: Point<f64, Logical>,
        bar_width: f64,
    ) -> GestureOutput {
        if self.state.is_idle() || self.source != Some(PointerSource::Touch(id)) {
            return GestureOutput::default()
        }

        let mut actions = Vec::new();
        if !self.touch_floated {
            actions.push(HostAction::SetFloating);
            actions.push(HostAction::ResizeExactPercent {
                width: TOUCH_DRAG_SIZE_PERCENT,
                height: TOUCH_DRAG_SIZE_PERCENT,
            });
            actions.push(HostAction::Pin);
            self.touch_floated = true;
        }

        let target = Point::new((position.x - bar_width / 2.0) as i32, position.y as i32);
        actions.push(HostAction::MoveExact(target));
        self.state = GestureState::Dragging;

        GestureOutput::passed(actions)
    }

    /// Handles a release.
    ///
    /// A mouse release only counts while the window has focus; a touch release
    /// only counts for the finger driving the gesture. The release is consumed
    /// if the matching press was.
    pub fn release(&mut self, source: PointerSource, focused: bool) -> GestureOutput {
        match source {
            PointerSource::Mouse if !focused => return GestureOutput::default(),
            PointerSource::Touch(_) if self.source != Some(source) => return GestureOutput::default(),
            _ if self.busy_with_other(source) => return GestureOutput::default(),
            _ => {}
        }

        let consume = self.consumed_down;
        let actions = self.end_drag();
        self.reset();

        GestureOutput { actions, consume }
    }

    /// Abandons the current gesture, ending a drag if one is in progress.
    pub fn cancel(&mut self) -> GestureOutput {
        let actions = self.end_drag();
        self.reset();
        GestureOutput::passed(actions)
    }

    fn end_drag(&self) -> Vec<HostAction> {
        if !self.state.is_dragging() {
            return Vec::new()
        }
        match self.source {
            Some(PointerSource::Touch(_)) => vec![HostAction::SetTiled, HostAction::EndMove],
            _ => vec![HostAction::EndMove],
        }
    }

    fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.source = None;
        self.consumed_down = false;
        self.touch_floated = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::types::{ButtonAlign, Size};

    const WIN: WindowId = WindowId(1);

    fn layout() -> ButtonLayout<Logical> {
        ButtonLayout {
            bar: Size::new(100.0, 20.0),
            scale: 1.0,
            align: ButtonAlign::Right,
            padding: 7.0,
            button_padding: 5.0,
        }
    }

    fn buttons() -> Vec<ButtonSpec> {
        vec![ButtonSpec::from_keyword("rgb(ff0000), 10, X, killactive").unwrap()]
    }

    fn press<'a>(
        layout: &'a ButtonLayout<Logical>,
        buttons: &'a [ButtonSpec],
        x: f64,
        time: Instant,
    ) -> Press<'a> {
        Press {
            source: PointerSource::Mouse,
            position: Point::new(x, 10.0),
            time,
            window: WIN,
            focused: true,
            floating: false,
            layout,
            buttons,
            double_click: Some("fullscreen"),
        }
    }

    #[test_log::test]
    fn test_button_press_never_arms_drag() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        let out = gc.press(press(&layout, &buttons, 90.0, Instant::now()));
        assert!(out.consume);
        assert_eq!(out.actions, vec![HostAction::Exec("killactive".into())]);
        assert!(gc.state().is_idle());

        assert!(gc.mouse_motion().actions.is_empty());
        assert!(gc.state().is_idle());
    }

    #[test_log::test]
    fn test_press_then_move_drags() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        let out = gc.press(press(&layout, &buttons, 20.0, Instant::now()));
        assert!(out.consume);
        assert!(out.actions.is_empty());
        assert!(gc.state().is_press_pending());

        assert_eq!(gc.mouse_motion().actions, vec![HostAction::BeginMove]);
        assert!(gc.state().is_dragging());

        let out = gc.release(PointerSource::Mouse, true);
        assert!(out.consume);
        assert_eq!(out.actions, vec![HostAction::EndMove]);
        assert!(gc.state().is_idle());
    }

    #[test_log::test]
    fn test_unfocused_floating_press() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        let mut p = press(&layout, &buttons, 20.0, Instant::now());
        p.focused = false;
        p.floating = true;

        let out = gc.press(p);
        assert_eq!(out.actions, vec![HostAction::Focus(WIN), HostAction::BringToTop(WIN)]);

        // mouse release on an unfocused window is ignored
        assert_eq!(gc.release(PointerSource::Mouse, false), GestureOutput::default());
        assert!(gc.state().is_press_pending());
    }

    #[test_log::test]
    fn test_double_click_fires_once() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();
        let t0 = Instant::now();

        gc.press(press(&layout, &buttons, 20.0, t0));
        gc.release(PointerSource::Mouse, true);

        let out = gc.press(press(&layout, &buttons, 20.0, t0 + Duration::from_millis(399)));
        assert_eq!(out.actions, vec![HostAction::Exec("fullscreen".into())]);
        assert!(gc.state().is_idle());
        gc.release(PointerSource::Mouse, true);

        // a third press right after does not fire again
        let out = gc.press(press(&layout, &buttons, 20.0, t0 + Duration::from_millis(500)));
        assert!(out.actions.is_empty());
        assert!(gc.state().is_press_pending());
    }

    #[test_log::test]
    fn test_slow_presses_never_double_click() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();
        let t0 = Instant::now();

        for i in 0..4 {
            let out = gc.press(press(&layout, &buttons, 20.0, t0 + Duration::from_millis(400 * i)));
            assert!(out.actions.is_empty());
            gc.release(PointerSource::Mouse, true);
        }
    }

    #[test_log::test]
    fn test_press_outside_ends_drag() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        gc.press(press(&layout, &buttons, 20.0, Instant::now()));
        gc.mouse_motion();

        let mut p = press(&layout, &buttons, 20.0, Instant::now());
        p.position = Point::new(20.0, 19.5);
        let out = gc.press(p);
        assert!(!out.consume);
        assert_eq!(out.actions, vec![HostAction::EndMove]);
        assert!(gc.state().is_idle());
    }

    #[test_log::test]
    fn test_touch_drag_floats_then_retiles() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        let mut p = press(&layout, &buttons, 20.0, Instant::now());
        p.source = PointerSource::Touch(0);
        gc.press(p);

        // another finger is ignored
        let mut other = p;
        other.source = PointerSource::Touch(1);
        assert_eq!(gc.press(other), GestureOutput::default());
        assert!(gc.touch_motion(1, Point::new(0.0, 0.0), 100.0).actions.is_empty());

        let out = gc.touch_motion(0, Point::new(500.0, 300.0), 100.0);
        assert_eq!(out.actions, vec![
            HostAction::SetFloating,
            HostAction::ResizeExactPercent { width: 50, height: 50 },
            HostAction::Pin,
            HostAction::MoveExact(Point::new(450, 300)),
        ]);

        let out = gc.touch_motion(0, Point::new(510.0, 310.0), 100.0);
        assert_eq!(out.actions, vec![HostAction::MoveExact(Point::new(460, 310))]);

        assert!(gc.release(PointerSource::Touch(1), true).actions.is_empty());
        let out = gc.release(PointerSource::Touch(0), false);
        assert!(out.consume);
        assert_eq!(out.actions, vec![HostAction::SetTiled, HostAction::EndMove]);
        assert!(gc.state().is_idle());
    }

    #[test_log::test]
    fn test_cancel_ends_drag() {
        let (layout, buttons) = (layout(), buttons());
        let mut gc = GestureController::new();

        let t0 = Instant::now();
        gc.press(press(&layout, &buttons, 20.0, t0));
        assert!(gc.cancel().actions.is_empty());

        gc.press(press(&layout, &buttons, 20.0, t0 + DOUBLE_CLICK_WINDOW * 2));
        assert!(gc.state().is_press_pending());
        gc.mouse_motion();
        assert!(gc.state().is_dragging());
        assert_eq!(gc.cancel().actions, vec![HostAction::EndMove]);
        assert!(gc.state().is_idle());
    }
}
