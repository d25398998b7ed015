//! The title bar attached to a single window.
//!
//! A [`BarDecoration`] ties every other part of this crate together for one
//! window: it resolves the window's rules into a [`Style`], answers the
//! host's layout queries, draws itself each frame and turns input on the bar
//! into requests to the host.
//!
//! Decorations never hold on to their window. They store its [`WindowId`]
//! and look it up through the [`Host`] whenever they need it, so a window
//! the host has already dropped simply stops resolving.

mod animation;
mod input;
mod render;

pub use animation::AnimatedColor;

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIs, IntoEnumIterator};
use tracing::{debug, warn, instrument};

use crate::config::rules::{StyleOverrides, Style};
use crate::gesture::GestureController;
use crate::layout::ButtonLayout;
use crate::manager::BarsState;
use crate::platform::{
    Host, HostWindow, HostAction, HookHandle, HookKind, WorkspaceInfo,
};
use crate::texture::{TextureCache, TextureId};
use crate::types::{WindowId, MonitorId, Color, Point, Size, Rectangle, Logical};
use crate::{BarError, Result};

/// The name bars are listed under by the host.
pub const DISPLAY_NAME: &str = "toarubar";

/// The layout priority of bars laid out outside the border.
pub const PRIORITY_OVER_BORDER: u32 = 10005;

/// The layout priority of bars laid out inside the border.
pub const PRIORITY_DEFAULT: u32 = 5000;

bitflags! {
    /// Capabilities a decoration advertises to the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DecorationFlags: u32 {
        /// The decoration receives pointer input.
        const ALLOWS_MOUSE_INPUT  = 1 << 0;
        /// The decoration counts as part of the window's main surface.
        const PART_OF_MAIN_WINDOW = 1 << 1;
    }
}

/// Which window edge a decoration sits against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[allow(missing_docs)]
pub enum DecorationEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// How the host lays a decoration out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
pub enum PositioningPolicy {
    /// Placed by the decoration itself, taking no space from the window.
    Absolute,
    /// Stacked against its edge along with other decorations.
    Sticky,
}

/// Where a decoration is drawn relative to the window surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[allow(missing_docs)]
pub enum DecorationLayer {
    Bottom,
    Under,
    Over,
    Overlay,
}

/// A decoration's answer to the host's layout query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositioningInfo {
    /// The edge the decoration is attached to.
    pub edge: DecorationEdge,
    /// How the decoration is laid out.
    pub policy: PositioningPolicy,
    /// Whether the window's content area shrinks to make room.
    pub reserves_space: bool,
    /// Higher priorities are placed closer to the window.
    pub priority: u32,
    /// The extent of the decoration away from its edge, in logical pixels.
    pub desired_thickness: f64,
}

/// What a decoration needs to know about its window for one frame or event.
///
/// Captured up front so the host can be mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowView {
    pub mapped: bool,
    pub hidden: bool,
    pub wants_decorations: bool,
    pub floating: bool,
    pub pinned: bool,
    pub focused: bool,
    pub workspace: Option<WorkspaceInfo>,
    pub monitor: Option<MonitorId>,
    pub rounding: f64,
    pub rounding_power: f64,
    pub border: f64,
    pub position: Point<f64, Logical>,
    pub size: Size<f64, Logical>,
    pub floating_offset: Point<f64, Logical>,
    pub top_edge: Point<f64, Logical>,
}

impl WindowView {
    pub(crate) fn capture<H: Host>(host: &H, id: WindowId) -> Option<WindowView> {
        let window = host.window(id)?;
        Some(WindowView {
            mapped: window.is_mapped(),
            hidden: window.is_hidden(),
            wants_decorations: window.wants_decorations(),
            floating: window.is_floating(),
            pinned: window.is_pinned(),
            focused: host.focused_window() == Some(id),
            workspace: window.workspace(),
            monitor: window.monitor(),
            rounding: window.rounding(),
            rounding_power: window.rounding_power(),
            border: window.border_size(),
            position: window.position(),
            size: window.size(),
            floating_offset: window.floating_offset(),
            top_edge: window.top_edge(),
        })
    }

    /// The workspace animation offset, or zero for pinned windows.
    pub(crate) fn workspace_offset(&self) -> Point<f64, Logical> {
        match self.workspace {
            Some(ws) if !self.pinned => ws.render_offset,
            _ => Point::zeroed(),
        }
    }
}

/// A title bar attached to a window.
///
/// Must be torn down with [`destroy`](BarDecoration::destroy), which
/// unregisters its hooks and hands back its textures.
pub struct BarDecoration {
    window: WindowId,
    overrides: StyleOverrides,
    /// Relative to the window's top edge.
    assigned: Rectangle<f64, Logical>,

    textures: TextureCache,
    gesture: GestureController,
    hovered: Vec<bool>,
    hooks: Vec<HookHandle>,
    color: AnimatedColor,

    last_height: i64,
    last_enabled: bool,
    had_focus: bool,
}

impl fmt::Debug for BarDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarDecoration")
            .field("window", &self.window)
            .field("assigned", &self.assigned)
            .field("hidden", &self.overrides.hidden)
            .field("gesture", &self.gesture.state())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl BarDecoration {
    /// Attaches a new bar to `window`, resolving its rules and registering
    /// input hooks with the host.
    #[instrument(level = "debug", skip(host, state))]
    pub fn new<H: Host>(host: &mut H, window: WindowId, state: &BarsState) -> Result<Self> {
        let rules = host.window(window)
            .ok_or(BarError::UnknownWindow(window))?
            .matched_rules();
        let overrides = StyleOverrides::resolve(rules.iter().map(String::as_str));
        let style = state.style(&overrides);

        let hooks = HookKind::iter().map(|kind| host.register_hook(kind)).collect();
        let now = host.now();

        Ok(Self {
            window,
            assigned: Rectangle::zeroed(),
            textures: TextureCache::new(),
            gesture: GestureController::new(),
            hovered: Vec::new(),
            hooks,
            color: AnimatedColor::new(style.color, now),
            last_height: style.height,
            last_enabled: style.enabled,
            had_focus: host.focused_window() == Some(window),
            overrides,
        })
    }

    /// The window this bar belongs to.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The resolved rule overrides.
    pub fn overrides(&self) -> &StyleOverrides {
        &self.overrides
    }

    /// The effective style of this bar.
    pub fn style(&self, state: &BarsState) -> Style {
        state.style(&self.overrides)
    }

    /// The textures this bar currently owns.
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// The gesture in progress on this bar.
    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    /// The name this decoration is listed under.
    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    /// The layer the bar is drawn in.
    pub fn layer(&self) -> DecorationLayer {
        DecorationLayer::Under
    }

    /// The capabilities this bar advertises.
    pub fn flags(&self, state: &BarsState) -> DecorationFlags {
        let mut flags = DecorationFlags::ALLOWS_MOUSE_INPUT;
        if self.style(state).part_of_window {
            flags |= DecorationFlags::PART_OF_MAIN_WINDOW;
        }
        flags
    }

    /// Answers the host's layout query.
    pub fn positioning(&self, state: &BarsState) -> PositioningInfo {
        let style = self.style(state);
        let hidden = style.hidden;

        PositioningInfo {
            edge: DecorationEdge::Top,
            policy: if hidden { PositioningPolicy::Absolute } else { PositioningPolicy::Sticky },
            reserves_space: !hidden,
            priority: if style.precedence_over_border { PRIORITY_OVER_BORDER } else { PRIORITY_DEFAULT },
            desired_thickness: if hidden { 0.0 } else { style.height as f64 },
        }
    }

    /// Accepts the box the host laid the bar out in, relative to the window's top edge.
    pub fn on_layout_assigned(&mut self, assigned: Rectangle<f64, Logical>) {
        if assigned.size != self.assigned.size {
            self.textures.size_changed = true;
        }
        self.assigned = assigned;
    }

    /// The assigned box, relative to the window's top edge.
    pub fn assigned_box(&self) -> Rectangle<f64, Logical> {
        self.assigned
    }

    /// The bar's box in global logical coordinates, if the window is mapped.
    pub fn global_box<H: Host>(&self, host: &H) -> Option<Rectangle<f64, Logical>> {
        let view = WindowView::capture(host, self.window)?;
        view.mapped.then(|| self.global_box_from(&view))
    }

    pub(crate) fn global_box_from(&self, view: &WindowView) -> Rectangle<f64, Logical> {
        self.assigned
            .translate(view.top_edge)
            .translate(view.workspace_offset())
    }

    /// Damages the whole bar.
    pub fn invalidate<H: Host>(&self, host: &mut H) {
        if let Some(region) = self.global_box(host) {
            host.damage(region);
        }
    }

    /// Called when the host changes something about the window that may
    /// affect the bar, such as its title.
    pub fn on_window_profile_changed<H: Host>(&mut self, host: &mut H) {
        self.invalidate(host);
    }

    /// Re-resolves the window's rules.
    ///
    /// Every override is reset before the rules are replayed, so removed
    /// rules fall back to the global configuration.
    #[instrument(level = "debug", skip(self, host), fields(window = %self.window))]
    pub fn on_rules_changed<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let rules = host.window(self.window)
            .ok_or(BarError::UnknownWindow(self.window))?
            .matched_rules();

        let prev_hidden = self.overrides.hidden;
        let prev_title_color: Option<Color> = self.overrides.title_color;
        let prev_buttons = self.overrides.buttons.clone();

        self.overrides.replay(rules.iter().map(String::as_str));

        if prev_hidden != self.overrides.hidden {
            debug!(target: "decoration", "{} hidden: {}", self.window, self.overrides.hidden);
            host.reposition_decorations(self.window);
        }
        if prev_title_color != self.overrides.title_color {
            self.textures.title_color_changed = true;
        }
        if prev_buttons != self.overrides.buttons {
            self.textures.buttons_dirty = true;
        }

        host.update_decorations(self.window);
        Ok(())
    }

    /// Marks the buttons texture for regeneration.
    pub fn mark_buttons_dirty(&mut self) {
        self.textures.buttons_dirty = true;
    }

    /// The button layout in bar-local logical coordinates.
    pub(crate) fn logical_layout(&self, style: &Style) -> ButtonLayout<Logical> {
        ButtonLayout {
            bar: Size::new(self.assigned.size.width, style.height as f64),
            scale: 1.0,
            align: style.buttons_alignment,
            padding: style.padding as f64,
            button_padding: style.button_padding as f64,
        }
    }

    /// Detaches the bar from its window.
    ///
    /// Hooks are unregistered, a drag in progress is ended, and the bar's
    /// textures are returned so they can be freed.
    #[instrument(level = "debug", skip(self, host), fields(window = %self.window))]
    pub fn destroy<H: Host>(mut self, host: &mut H) -> Vec<TextureId> {
        for hook in std::mem::take(&mut self.hooks) {
            host.unregister_hook(hook);
        }
        for action in self.gesture.cancel().actions {
            host.dispatch(action);
        }
        self.textures.take_all()
    }

    pub(crate) fn dispatch_all<H: Host>(host: &mut H, actions: Vec<HostAction>) {
        for action in actions {
            debug!(target: "decoration", "dispatching {:?}", action);
            host.dispatch(action);
        }
    }
}

impl Drop for BarDecoration {
    fn drop(&mut self) {
        if !self.hooks.is_empty() {
            warn!(target: "decoration", "bar for {} dropped with {} hooks registered", self.window, self.hooks.len());
        }
    }
}
