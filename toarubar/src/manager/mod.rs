//! The registry of every bar, and the entry points the host calls into.

pub mod state;

#[doc(inline)]
pub use state::BarsState;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use custom_debug_derive::Debug as CustomDebug;
use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use crate::config::{BarConfig, ButtonSpec, ConfigError};
use crate::decoration::{BarDecoration, DecorationFlags, PositioningInfo};
use crate::platform::{
    Host, HostWindow, Frame, EventResult, HOST_API_VERSION,
    MouseButtonEvent, MouseMotionEvent, TouchDownEvent, TouchUpEvent, TouchMotionEvent,
};
use crate::texture::TextureUploader;
use crate::types::{WindowId, ColorF, Rectangle, Logical};
use crate::util::log::{DefaultErrorHandler, ERROR_COLOR};
use crate::{BarError, ErrorHandler, Result};

/// The color of the notification posted after a successful start.
pub const SUCCESS_COLOR: ColorF = ColorF::new(0.2, 1.0, 0.2, 1.0);

/// How long start-up notifications stay up.
pub const INIT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Owns every bar and the state they share.
///
/// `Bars` is what the host talks to: it forwards window lifecycle, rule,
/// configuration, input and draw events to the right [`BarDecoration`].
///
/// # Recover boundaries
///
/// Every entry point runs its body inside a recover boundary. An error, or
/// a panic, is handed to the [`ErrorHandler`] instead of being returned, and
/// the entry point returns a neutral value. Input events that fail are passed
/// through to the window.
///
/// Everything happens on the host's event loop, so there is no locking.
#[derive(CustomDebug)]
pub struct Bars<H: Host> {
    state: BarsState,
    bars: IndexMap<WindowId, BarDecoration>,
    #[debug(skip)]
    handler: Box<dyn ErrorHandler<H>>,
}

impl<H: Host> Default for Bars<H> {
    fn default() -> Self {
        Self::new(BarConfig::default())
    }
}

impl<H: Host> Bars<H> {
    /// Creates an empty registry that reports errors with [`DefaultErrorHandler`].
    pub fn new(config: BarConfig) -> Self {
        Self::with_handler(config, DefaultErrorHandler)
    }

    /// Creates an empty registry with a custom error handler.
    pub fn with_handler<E>(config: BarConfig, handler: E) -> Self
    where
        E: ErrorHandler<H> + 'static,
    {
        Self {
            state: BarsState::new(config),
            bars: IndexMap::new(),
            handler: Box::new(handler),
        }
    }

    /// The state shared by every bar.
    pub fn state(&self) -> &BarsState {
        &self.state
    }

    /// The bar attached to `window`, if any.
    pub fn bar(&self, window: WindowId) -> Option<&BarDecoration> {
        self.bars.get(&window)
    }

    /// Every bar, in the order the windows were decorated.
    pub fn iter(&self) -> impl Iterator<Item = &BarDecoration> {
        self.bars.values()
    }

    /// The number of decorated windows.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether no window is decorated.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Runs `f` inside a recover boundary.
    ///
    /// Returns `None` if `f` failed or panicked, after reporting it.
    pub(crate) fn guarded<R, F>(&mut self, host: &mut H, context: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Self, &mut H) -> Result<R>,
    {
        let err = match panic::catch_unwind(AssertUnwindSafe(|| f(self, host))) {
            Ok(Ok(ret)) => return Some(ret),
            Ok(Err(e)) => e,
            Err(payload) => BarError::OtherError(panic_message(payload)),
        };
        self.handler.call(host, context, err);
        None
    }

    /// Checks the host version and attaches bars to every mapped window.
    ///
    /// This is the only operation that fails hard: on a version mismatch
    /// no bar is created and the error is returned.
    #[instrument(level = "debug", skip_all)]
    pub fn init(&mut self, host: &mut H) -> Result<()> {
        let version = host.api_version();
        if version != HOST_API_VERSION {
            host.notify(
                "[toarubar] Failure in initialization: Version mismatch (host API version is not the one toarubar was built for)",
                ERROR_COLOR,
                INIT_NOTIFICATION_TIMEOUT,
            );
            warn!(target: "bars", "version mismatch: host {} != client {}", version, HOST_API_VERSION);
            return Err(BarError::VersionMismatch {
                host: version,
                client: HOST_API_VERSION.to_string(),
            })
        }

        for id in host.windows() {
            let visible = host.window(id).is_some_and(|w| w.is_mapped() && !w.is_hidden());
            if visible {
                self.on_window_open(host, id);
            }
        }

        info!(target: "bars", "initialized with {} bars", self.bars.len());
        host.notify("[toarubar] Initialized successfully!", SUCCESS_COLOR, INIT_NOTIFICATION_TIMEOUT);
        Ok(())
    }

    /// Detaches every bar, freeing their textures.
    #[instrument(level = "debug", skip_all)]
    pub fn exit(&mut self, host: &mut H, uploader: &mut dyn TextureUploader) {
        for (id, bar) in self.bars.drain(..) {
            self.state.released.extend(bar.destroy(host));
            host.recalculate_window(id);
        }
        for texture in self.state.take_released() {
            uploader.release(texture);
        }
        info!(target: "bars", "all bars removed");
    }

    /// Attaches a bar to a newly opened window.
    ///
    /// Windows that opt out of decorations, are not mapped, or already have
    /// a bar are left alone.
    #[instrument(level = "debug", skip(self, host))]
    pub fn on_window_open(&mut self, host: &mut H, window: WindowId) {
        self.guarded(host, "on_window_open", |bars, host| {
            let w = host.window(window).ok_or(BarError::UnknownWindow(window))?;
            if !w.wants_decorations() || !w.is_mapped() || bars.bars.contains_key(&window) {
                debug!(target: "bars::event", "not decorating {}", window);
                return Ok(())
            }

            let bar = BarDecoration::new(host, window, &bars.state)?;
            bars.bars.insert(window, bar);
            debug!(target: "bars::event", "decorated {}", window);
            Ok(())
        });
    }

    /// Removes the bar of a closing window.
    ///
    /// Its textures are freed at the start of the next [`draw`](Bars::draw).
    #[instrument(level = "debug", skip(self, host))]
    pub fn on_window_close(&mut self, host: &mut H, window: WindowId) {
        self.guarded(host, "on_window_close", |bars, host| {
            if let Some(bar) = bars.bars.shift_remove(&window) {
                bars.state.released.extend(bar.destroy(host));
                debug!(target: "bars::event", "removed bar of {}", window);
            }
            Ok(())
        });
    }

    /// Re-resolves a window's rules after the host re-evaluated them.
    #[instrument(level = "debug", skip(self, host))]
    pub fn on_rules_changed(&mut self, host: &mut H, window: WindowId) {
        self.guarded(host, "on_rules_changed", |bars, host| {
            match bars.bars.get_mut(&window) {
                Some(bar) => bar.on_rules_changed(host),
                None => Ok(()),
            }
        });
    }

    /// Called when something about a window that the bar shows, such as its title, changed.
    pub fn on_window_profile_changed(&mut self, host: &mut H, window: WindowId) {
        self.guarded(host, "on_window_profile_changed", |bars, host| {
            if let Some(bar) = bars.bars.get_mut(&window) {
                bar.on_window_profile_changed(host);
            }
            Ok(())
        });
    }

    /// Clears keyword declarations before the host replays its config.
    pub fn on_pre_config_reload(&mut self, host: &mut H) {
        self.guarded(host, "on_pre_config_reload", |bars, _| {
            bars.state.clear_declarations();
            debug!(target: "bars::config", "cleared declarations for reload");
            Ok(())
        });
    }

    /// Sets a global config value.
    ///
    /// Parse failures are returned for the host's config parser to report.
    pub fn on_config_value(&mut self, host: &mut H, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        self.guarded(host, "on_config_value", |bars, _| {
            let res = bars.state.config.set(key, value);
            if res.is_ok() {
                bars.mark_all_buttons_dirty();
            }
            Ok(res)
        }).unwrap_or(Ok(()))
    }

    /// Handles a `toarubar-button` declaration.
    ///
    /// On success every bar redraws its buttons.
    pub fn on_button_keyword(&mut self, host: &mut H, value: &str) -> std::result::Result<(), ConfigError> {
        self.guarded(host, "on_button_keyword", |bars, _| {
            let res = bars.state.add_button(value).map(|_| ());
            if res.is_ok() {
                bars.mark_all_buttons_dirty();
            }
            Ok(res)
        }).unwrap_or(Ok(()))
    }

    /// Handles a `title-var` declaration, running its command.
    pub fn on_title_var_keyword(&mut self, host: &mut H, value: &str) -> std::result::Result<(), ConfigError> {
        self.guarded(host, "on_title_var_keyword", |bars, _| {
            Ok(bars.state.title_vars.declare(value))
        }).unwrap_or(Ok(()))
    }

    fn mark_all_buttons_dirty(&mut self) {
        for bar in self.bars.values_mut() {
            bar.mark_buttons_dirty();
        }
    }

    /// The buttons declared with the button keyword.
    pub fn buttons(&self) -> &[ButtonSpec] {
        &self.state.buttons
    }

    /// Answers the host's layout query for a window's bar.
    pub fn positioning(&self, window: WindowId) -> Option<PositioningInfo> {
        self.bars.get(&window).map(|bar| bar.positioning(&self.state))
    }

    /// The capabilities a window's bar advertises.
    pub fn flags(&self, window: WindowId) -> Option<DecorationFlags> {
        self.bars.get(&window).map(|bar| bar.flags(&self.state))
    }

    /// Hands a window's bar the box the host laid it out in.
    pub fn on_layout_assigned(&mut self, window: WindowId, assigned: Rectangle<f64, Logical>) {
        if let Some(bar) = self.bars.get_mut(&window) {
            bar.on_layout_assigned(assigned);
        }
    }

    /// Draws a window's bar.
    ///
    /// Textures of bars removed since the last frame are freed first.
    pub fn draw(&mut self, host: &mut H, window: WindowId, frame: &mut Frame<'_>) {
        self.guarded(host, "draw", |bars, host| {
            for texture in bars.state.take_released() {
                frame.uploader.release(texture);
            }
            if let Some(bar) = bars.bars.get_mut(&window) {
                bar.draw(host, &bars.state, frame);
            }
            Ok(())
        });
    }

    /// Offers a mouse button event to every bar.
    pub fn on_mouse_button(&mut self, host: &mut H, event: &MouseButtonEvent) -> EventResult {
        self.dispatch_input(host, "on_mouse_button", |bar, host, state| {
            bar.on_mouse_button(host, state, event)
        })
    }

    /// Offers pointer motion to every bar.
    pub fn on_mouse_motion(&mut self, host: &mut H, event: &MouseMotionEvent) -> EventResult {
        self.dispatch_input(host, "on_mouse_motion", |bar, host, state| {
            bar.on_mouse_motion(host, state, event)
        })
    }

    /// Offers a touch down event to every bar.
    pub fn on_touch_down(&mut self, host: &mut H, event: &TouchDownEvent) -> EventResult {
        self.dispatch_input(host, "on_touch_down", |bar, host, state| {
            bar.on_touch_down(host, state, event)
        })
    }

    /// Offers a touch up event to every bar.
    pub fn on_touch_up(&mut self, host: &mut H, event: &TouchUpEvent) -> EventResult {
        self.dispatch_input(host, "on_touch_up", |bar, host, state| {
            bar.on_touch_up(host, state, event)
        })
    }

    /// Offers touch motion to every bar.
    pub fn on_touch_motion(&mut self, host: &mut H, event: &TouchMotionEvent) -> EventResult {
        self.dispatch_input(host, "on_touch_motion", |bar, host, state| {
            bar.on_touch_motion(host, state, event)
        })
    }

    fn dispatch_input<F>(&mut self, host: &mut H, context: &str, mut f: F) -> EventResult
    where
        F: FnMut(&mut BarDecoration, &mut H, &BarsState) -> EventResult,
    {
        self.guarded(host, context, |bars, host| {
            let Bars { state, bars, .. } = bars;
            Ok(bars.values_mut().fold(EventResult::Pass, |acc, bar| acc.or(f(bar, host, &*state))))
        }).unwrap_or_default()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let msg = payload.downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("panicked: {}", msg)
}
