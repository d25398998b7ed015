//! Traits describing the compositor a [`Bars`][1] instance runs inside of.
//!
//! This crate never talks to a compositor directly. Everything it needs from
//! its host, whether that is window state, monitor geometry, or the ability
//! to move and focus windows, goes through the traits defined here.
//!
//! ## The `Host` trait
//!
//! The core item in this module is the [`Host`] trait. It answers queries about
//! global state (the focused window, the cursor, monitors) and carries out
//! the requests a bar makes in response to input, expressed as [`HostAction`]s.
//!
//! ### Associated Types
//!
//! - `Window`: a type that represents a top-level window. It must implement
//!   the [`HostWindow`] trait.
//!
//! Windows are never held across calls: bars refer to them by [`WindowId`] and
//! look them up again every time, so a window the host has dropped simply
//! stops resolving.
//!
//! ## Rendering
//!
//! Drawing goes through the [`BarRenderer`] trait in the [`render`] module,
//! while textures are produced by the traits in [`crate::texture`].
//!
//! [1]: crate::manager::Bars

pub mod input;
pub mod render;

use std::fmt::Debug;
use std::time::{Duration, Instant};

use strum::{EnumIs, EnumIter, Display};

use crate::types::{
    WindowId, MonitorId, ColorF, Point, Size, Rectangle, Logical,
};
use crate::title::WindowSnapshot;

#[doc(inline)]
pub use input::{
    MouseButton, MouseButtonEvent, MouseMotionEvent,
    TouchDownEvent, TouchUpEvent, TouchMotionEvent, EventResult,
};
#[doc(inline)]
pub use render::{BarRenderer, Frame};

/// The version of the host API this crate was built against.
///
/// [`Bars::init`](crate::manager::Bars::init) refuses to start on a host
/// reporting anything else.
pub const HOST_API_VERSION: &str = "0.50";

/// A request made to the host on behalf of a window's bar.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum HostAction {
    /// Run a command through the host's `exec` dispatcher.
    Exec(String),
    /// Give keyboard focus to the window.
    Focus(WindowId),
    /// Raise a floating window above its siblings.
    BringToTop(WindowId),
    /// Start an interactive move of the window under the pointer.
    BeginMove,
    /// End the current interactive move.
    EndMove,
    /// Make the active window tiled.
    SetTiled,
    /// Make the active window floating.
    SetFloating,
    /// Resize the active window to a percentage of its monitor.
    ResizeExactPercent {
        /// Width, in percent.
        width: u8,
        /// Height, in percent.
        height: u8,
    },
    /// Pin the active window to every workspace.
    Pin,
    /// Move the active window to an exact position, in global coordinates.
    MoveExact(Point<i32, Logical>),
}

/// Events a bar registers hooks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumIs, Display)]
#[strum(serialize_all = "camelCase")]
#[allow(missing_docs)]
pub enum HookKind {
    MouseButton,
    MouseMove,
    TouchDown,
    TouchUp,
    TouchMove,
}

/// A handle to a registered hook, returned by [`Host::register_hook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub u64);

/// A monitor, as the bars see it.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    /// The host's identifier for the monitor.
    pub id: MonitorId,
    /// The output name, e.g. `DP-1`.
    pub name: String,
    /// The position of the monitor in global logical coordinates.
    pub position: Point<f64, Logical>,
    /// The logical size of the monitor.
    pub size: Size<f64, Logical>,
    /// The scale factor from logical to physical pixels.
    pub scale: f64,
}

impl MonitorInfo {
    /// The monitor's region in global logical coordinates.
    pub fn region(&self) -> Rectangle<f64, Logical> {
        Rectangle { point: self.position, size: self.size }
    }
}

/// The parts of a workspace that matter to a bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkspaceInfo {
    /// Whether the workspace is shown on some monitor.
    pub visible: bool,
    /// The current offset of the workspace's slide animation.
    pub render_offset: Point<f64, Logical>,
}

/// A top-level window managed by the host.
///
/// Positions and sizes are the current, possibly animated, values.
pub trait HostWindow: Debug {
    /// The window's unique identifier.
    fn id(&self) -> WindowId;

    /// The window's current title.
    fn title(&self) -> String;

    /// Whether the window is valid and mapped.
    fn is_mapped(&self) -> bool;

    /// Whether the window is hidden, e.g. in an inactive group tab.
    fn is_hidden(&self) -> bool;

    /// Whether the window is floating.
    fn is_floating(&self) -> bool;

    /// Whether the window is pinned to every workspace.
    fn is_pinned(&self) -> bool;

    /// Whether the window accepts server-side decorations.
    fn wants_decorations(&self) -> bool;

    /// The workspace the window is on, if any.
    fn workspace(&self) -> Option<WorkspaceInfo>;

    /// The monitor the window is on, if any.
    fn monitor(&self) -> Option<MonitorId>;

    /// The corner rounding of the window, in logical pixels.
    fn rounding(&self) -> f64;

    /// The exponent of the rounding curve.
    fn rounding_power(&self) -> f64;

    /// The real border size of the window, in logical pixels.
    fn border_size(&self) -> f64;

    /// The window's position in global logical coordinates.
    fn position(&self) -> Point<f64, Logical>;

    /// The window's logical size.
    fn size(&self) -> Size<f64, Logical>;

    /// The extra offset applied to floating windows while rendering.
    fn floating_offset(&self) -> Point<f64, Logical>;

    /// The point the top-edge decoration box is placed relative to.
    fn top_edge(&self) -> Point<f64, Logical>;

    /// The raw text of every window rule currently matching the window, in match order.
    fn matched_rules(&self) -> Vec<String>;

    /// A snapshot of the properties that can be substituted into a title template.
    fn snapshot(&self) -> WindowSnapshot;
}

/// The compositor that bars are attached to.
///
/// Queries take `&self`; anything that changes host state takes `&mut self`.
pub trait Host: Debug {
    /// The type used to represent windows.
    type Window: HostWindow;

    /// The host API version, compared against [`HOST_API_VERSION`].
    fn api_version(&self) -> String;

    /// Looks up a live window.
    fn window(&self, id: WindowId) -> Option<&Self::Window>;

    /// Every window the host currently knows of.
    fn windows(&self) -> Vec<WindowId>;

    /// The window with keyboard focus.
    fn focused_window(&self) -> Option<WindowId>;

    /// The topmost window under the cursor, counting decorations and
    /// reserved extents.
    fn window_under_cursor(&self) -> Option<WindowId>;

    /// The cursor position, in global logical coordinates.
    fn cursor_position(&self) -> Point<f64, Logical>;

    /// Whether a layer surface currently holds exclusive input.
    fn exclusive_layer_active(&self) -> bool;

    /// Whether an active seat grab lets `id` receive input.
    ///
    /// Returns `None` if there is no seat grab.
    fn seat_grab_accepts(&self, id: WindowId) -> Option<bool>;

    /// Whether a top or overlay layer surface sits at `point`.
    fn layer_surface_at(&self, point: Point<f64, Logical>) -> bool;

    /// Looks up a monitor by identifier.
    fn monitor(&self, id: MonitorId) -> Option<MonitorInfo>;

    /// Looks up a monitor by output name.
    fn monitor_by_name(&self, name: &str) -> Option<MonitorInfo>;

    /// The monitor that last had focus.
    fn last_monitor(&self) -> Option<MonitorInfo>;

    /// Whether blur is enabled in the host's own configuration.
    fn blur_enabled(&self) -> bool;

    /// The current time, used to drive animations.
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Carries out a request.
    fn dispatch(&mut self, action: HostAction);

    /// Marks a region, in global logical coordinates, as needing a redraw.
    fn damage(&mut self, region: Rectangle<f64, Logical>);

    /// Asks the host to lay out the window's decorations again.
    fn reposition_decorations(&mut self, id: WindowId);

    /// Asks the host to refresh the window's decorations after a rule change.
    fn update_decorations(&mut self, id: WindowId);

    /// Asks the host to recompute the window's layout.
    fn recalculate_window(&mut self, id: WindowId);

    /// Shows a notification to the user.
    fn notify(&mut self, text: &str, color: ColorF, timeout: Duration);

    /// Registers interest in an event.
    fn register_hook(&mut self, kind: HookKind) -> HookHandle;

    /// Releases a hook previously returned by [`Host::register_hook`].
    fn unregister_hook(&mut self, handle: HookHandle);
}
