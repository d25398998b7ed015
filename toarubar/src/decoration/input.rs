//! Feeding host input events to a bar's gesture controller.

use tracing::{instrument, trace};

use crate::config::rules::Style;
use crate::gesture::{GestureOutput, PointerSource, Press};
use crate::manager::BarsState;
use crate::platform::{
    Host, MonitorInfo, EventResult,
    MouseButton, MouseButtonEvent, MouseMotionEvent,
    TouchDownEvent, TouchUpEvent, TouchMotionEvent,
};
use crate::types::{Point, Logical};

use super::{BarDecoration, WindowView};

impl BarDecoration {
    /// Whether the bar may react to input right now.
    fn input_is_valid<H: Host>(&self, host: &H, style: &Style, view: &WindowView) -> bool {
        if !style.enabled {
            return false
        }
        if !view.workspace.is_some_and(|ws| ws.visible) {
            return false
        }
        if host.exclusive_layer_active() {
            return false
        }
        if host.seat_grab_accepts(self.window) == Some(false) {
            return false
        }
        if host.window_under_cursor() != Some(self.window) && !view.focused {
            return false
        }
        !host.layer_surface_at(host.cursor_position())
    }

    /// Captures the window, the style and input validity in one go.
    fn input_context<H: Host>(&self, host: &H, state: &BarsState) -> Option<(Style, WindowView)> {
        let view = WindowView::capture(host, self.window)?;
        let style = self.style(state);
        if !self.input_is_valid(host, &style, &view) {
            trace!(target: "decoration::input", "input on {} is not valid", self.window);
            return None
        }
        Some((style, view))
    }

    fn press<H: Host>(
        &mut self,
        host: &mut H,
        style: &Style,
        view: &WindowView,
        source: PointerSource,
        position: Point<f64, Logical>,
        time: std::time::Instant,
    ) -> EventResult {
        let layout = self.logical_layout(style);
        let out = self.gesture.press(Press {
            source,
            position,
            time,
            window: self.window,
            focused: view.focused,
            floating: view.floating,
            layout: &layout,
            buttons: &style.buttons,
            double_click: style.double_click_command(),
        });
        self.finish(host, out)
    }

    fn finish<H: Host>(&mut self, host: &mut H, out: GestureOutput) -> EventResult {
        Self::dispatch_all(host, out.actions);
        out.consume.into()
    }

    /// Handles a mouse button event.
    ///
    /// Only the primary button starts or ends a gesture.
    #[instrument(level = "trace", skip(self, host, state), fields(window = %self.window))]
    pub fn on_mouse_button<H: Host>(
        &mut self,
        host: &mut H,
        state: &BarsState,
        event: &MouseButtonEvent,
    ) -> EventResult {
        if event.button != MouseButton::Left {
            return EventResult::Pass
        }
        let Some((style, view)) = self.input_context(host, state) else {
            return EventResult::Pass
        };

        if event.pressed {
            let position = host.cursor_position() - self.global_box_from(&view).point;
            self.press(host, &style, &view, PointerSource::Mouse, position, event.time)
        } else {
            let out = self.gesture.release(PointerSource::Mouse, view.focused);
            self.finish(host, out)
        }
    }

    /// Handles pointer motion: updates hover state and turns a pending press into a drag.
    #[instrument(level = "trace", skip(self, host, state), fields(window = %self.window))]
    pub fn on_mouse_motion<H: Host>(
        &mut self,
        host: &mut H,
        state: &BarsState,
        _event: &MouseMotionEvent,
    ) -> EventResult {
        let Some(view) = WindowView::capture(host, self.window) else {
            return EventResult::Pass
        };
        if view.mapped {
            let style = self.style(state);
            self.update_hover(host, &style, &view);
        }

        let out = self.gesture.mouse_motion();
        self.finish(host, out)
    }

    /// Handles a finger touching down.
    #[instrument(level = "trace", skip(self, host, state), fields(window = %self.window))]
    pub fn on_touch_down<H: Host>(
        &mut self,
        host: &mut H,
        state: &BarsState,
        event: &TouchDownEvent,
    ) -> EventResult {
        let Some((style, view)) = self.input_context(host, state) else {
            return EventResult::Pass
        };

        let monitor = event.output.as_deref()
            .and_then(|name| host.monitor_by_name(name))
            .or_else(|| host.last_monitor());
        let Some(monitor) = monitor else {
            return EventResult::Pass
        };

        let position = to_global(&monitor, event.position) - self.global_box_from(&view).point;
        self.press(host, &style, &view, PointerSource::Touch(event.id), position, event.time)
    }

    /// Handles a finger being lifted.
    #[instrument(level = "trace", skip(self, host, _state), fields(window = %self.window))]
    pub fn on_touch_up<H: Host>(
        &mut self,
        host: &mut H,
        _state: &BarsState,
        event: &TouchUpEvent,
    ) -> EventResult {
        let focused = host.focused_window() == Some(self.window);
        let out = self.gesture.release(PointerSource::Touch(event.id), focused);
        self.finish(host, out)
    }

    /// Handles a finger moving. Drags the window along once a touch gesture is underway.
    #[instrument(level = "trace", skip(self, host, _state), fields(window = %self.window))]
    pub fn on_touch_motion<H: Host>(
        &mut self,
        host: &mut H,
        _state: &BarsState,
        event: &TouchMotionEvent,
    ) -> EventResult {
        if self.gesture.source() != Some(PointerSource::Touch(event.id)) {
            return EventResult::Pass
        }
        let Some(view) = WindowView::capture(host, self.window) else {
            return EventResult::Pass
        };

        let monitor = view.monitor
            .and_then(|id| host.monitor(id))
            .or_else(|| host.last_monitor());
        let Some(monitor) = monitor else {
            return EventResult::Pass
        };

        let width = self.global_box_from(&view).size.width;
        let out = self.gesture.touch_motion(event.id, to_global(&monitor, event.position), width);
        self.finish(host, out)
    }
}

/// Maps a position normalized across `monitor` to global logical coordinates.
fn to_global(monitor: &MonitorInfo, normalized: Point<f64, Logical>) -> Point<f64, Logical> {
    Point::new(
        monitor.position.x + normalized.x * monitor.size.width,
        monitor.position.y + normalized.y * monitor.size.height,
    )
}
