//! Custom title templates.
//!
//! A template is a string with `{Token}` placeholders, set per window with the
//! `title` rule. Expansion is literal substring replacement with no escaping:
//! every occurrence of a known token is replaced, and anything that is not a
//! known token is left verbatim.
//!
//! Tokens are substituted in three passes:
//!
//! 1. named variables declared with `title-var`,
//! 2. `{Date}` (`YYYY-MM-DD`) and `{Time}` (`HH:MM:SS`) in local time,
//! 3. window properties, listed in [`WindowSnapshot::TOKENS`].

use std::fmt;

use chrono::{Local, NaiveDateTime};

use crate::config::TitleVars;
use crate::types::{ColorF, Point, Logical};

/// An opaque identity of a host object, rendered as a stable integer.
///
/// Zero means "no object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identity(pub u64);

/// A size acknowledgement the window has yet to send.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeAck {
    /// The configure serial.
    pub serial: u32,
    /// The size sent with the configure.
    pub size: Point<f64, Logical>,
}

/// The value of a single window property, formatted the way titles show it.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Inserted as-is.
    Str(String),
    /// Rendered `true` or `false`.
    Bool(bool),
    /// Rendered in decimal.
    Int(i64),
    /// Rendered with six decimal places.
    Float(f64),
    /// Rendered `x,y`.
    Vec2(Point<f64, Logical>),
    /// Rendered `r,g,b,a`.
    Color(ColorF),
    /// Rendered as the identity integer.
    Identity(Identity),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Str(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{:.6}", v),
            PropertyValue::Vec2(p) => write!(f, "{:.6},{:.6}", p.x, p.y),
            PropertyValue::Color(c) => write!(f, "{}", c),
            PropertyValue::Identity(id) => write!(f, "{}", id.0),
        }
    }
}

macro_rules! __impl_property_from {
    ($($from:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$from> for PropertyValue {
                fn from(from: $from) -> Self {
                    PropertyValue::$variant(from)
                }
            }
        )+
    };
}

__impl_property_from! {
    String => Str,
    bool => Bool,
    i64 => Int,
    f64 => Float,
    Point<f64, Logical> => Vec2,
    ColorF => Color,
    Identity => Identity,
}

impl From<Option<String>> for PropertyValue {
    /// An absent string renders as `none`.
    fn from(from: Option<String>) -> Self {
        PropertyValue::Str(from.unwrap_or_else(|| "none".into()))
    }
}

impl From<Option<SizeAck>> for PropertyValue {
    /// Renders `serial:x,y`, or `none`.
    fn from(from: Option<SizeAck>) -> Self {
        PropertyValue::Str(match from {
            Some(ack) => format!("{}:{:.6},{:.6}", ack.serial, ack.size.x, ack.size.y),
            None => "none".into(),
        })
    }
}

macro_rules! window_snapshot {
    ($(
        $(#[$doc:meta])*
        $field:ident : $ty:ty => $token:literal
    ),+ $(,)?) => {
        /// A copy of the window properties titles can refer to.
        ///
        /// Hosts fill in what they track and leave the rest at their defaults.
        #[derive(Debug, Clone, Default, PartialEq)]
        #[allow(missing_docs)]
        pub struct WindowSnapshot {
            $(
                $(#[$doc])*
                pub $field: $ty,
            )+
        }

        impl WindowSnapshot {
            /// Every window token, without braces, in substitution order.
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            /// Looks up the value of a token, given without braces.
            pub fn property(&self, token: &str) -> Option<PropertyValue> {
                match token {
                    $($token => Some(PropertyValue::from(self.$field.clone())),)+
                    _ => None,
                }
            }
        }
    };
}

window_snapshot! {
    /// The current title.
    title: String => "Title",
    /// The current class or app id.
    class: String => "Class",
    /// The title when the window was first mapped.
    initial_title: String => "InitialTitle",
    /// The class when the window was first mapped.
    initial_class: String => "InitialClass",
    /// The activation token the window was launched with.
    initial_workspace_token: String => "initialWorkspaceToken",

    is_pseudotiled: bool => "isPseudotiled",
    first_map: bool => "firstMap",
    is_floating: bool => "isFloating",
    dragging_tiled: bool => "draggingTiled",
    is_mapped: bool => "isMapped",
    requests_float: bool => "requestsFloat",
    created_over_fullscreen: bool => "createdOverFullscreen",
    is_x11: bool => "isX11",
    x11_doesnt_want_borders: bool => "X11DoesntWantBorders",
    x11_shouldnt_focus: bool => "X11ShouldntFocus",
    no_initial_focus: bool => "noInitialFocus",
    wants_initial_fullscreen: bool => "wantsInitialFullscreen",
    fading_out: bool => "fadingOut",
    ready_to_delete: bool => "readyToDelete",
    animating_in: bool => "animatingIn",
    pinned: bool => "pinned",
    pin_fullscreened: bool => "pinFullscreened",
    is_urgent: bool => "isUrgent",
    monitor_moved_from: i64 => "monitorMovedFrom",
    currently_swallowed: bool => "currentlySwallowed",
    group_swallowed: bool => "groupSwallowed",
    stay_focused: bool => "stayFocused",
    tearing_hint: bool => "tearingHint",
    x11_surface_scaled_by: f64 => "X11SurfaceScaledBy",

    floating_offset: Point<f64, Logical> => "floatingOffset",
    last_floating_position: Point<f64, Logical> => "lastFloatingPosition",
    last_floating_size: Point<f64, Logical> => "lastFloatingSize",
    original_closed_pos: Point<f64, Logical> => "originalClosedPos",
    original_closed_size: Point<f64, Logical> => "originalClosedSize",
    pending_reported_size: Point<f64, Logical> => "pendingReportedSize",
    position: Point<f64, Logical> => "position",
    pseudo_size: Point<f64, Logical> => "pseudoSize",
    relative_cursor_coords_on_last_warp: Point<f64, Logical> => "relativeCursorCoordsOnLastWarp",
    reported_position: Point<f64, Logical> => "reportedPosition",
    reported_size: Point<f64, Logical> => "reportedSize",
    size: Point<f64, Logical> => "size",

    active_inactive_alpha: f64 => "activeInactiveAlpha",
    alpha: f64 => "alpha",
    border_angle_animation_progress: f64 => "borderAngleAnimationProgress",
    border_fade_animation_progress: f64 => "borderFadeAnimationProgress",
    dim_percent: f64 => "dimPercent",
    moving_from_workspace_alpha: f64 => "movingFromWorkspaceAlpha",
    moving_to_workspace_alpha: f64 => "movingToWorkspaceAlpha",
    not_responding_tint: f64 => "notRespondingTint",
    real_position: Point<f64, Logical> => "realPosition",
    real_size: Point<f64, Logical> => "realSize",
    real_shadow_color: ColorF => "realShadowColor",

    monitor: Identity => "monitor",
    last_cycled_window: Identity => "lastCycledWindow",
    /// The identity of the window itself.
    self_id: Identity => "self",
    swallowed: Identity => "swallowed",
    /// The workspace name, or `None` if the window has no workspace.
    workspace: Option<String> => "workspace",
    pending_size_ack: Option<SizeAck> => "pendingSizeAck",

    window_decorations_count: i64 => "windowDecorationsCount",
    matched_rules_count: i64 => "matchedRulesCount",
    fullscreen_internal: i64 => "fullscreenInternal",
    fullscreen_client: i64 => "fullscreenClient",
    idle_inhibit_mode: i64 => "idleInhibitMode",
    last_surface_monitor_id: i64 => "lastSurfaceMonitorID",
    wants_initial_fullscreen_monitor: i64 => "wantsInitialFullscreenMonitor",
}

/// Expands `template` against a window and the named variables, using the current local time.
pub fn expand(template: &str, window: &WindowSnapshot, vars: &TitleVars) -> String {
    expand_at(template, window, vars, Local::now().naive_local())
}

/// Expands `template` as if the local time were `now`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use toarubar::config::TitleVars;
/// use toarubar::title::{expand_at, WindowSnapshot};
///
/// let window = WindowSnapshot { title: "vim".into(), ..Default::default() };
/// let now = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(8, 5, 0).unwrap();
///
/// let title = expand_at("[{Time}] {Title} {Unknown}", &window, &TitleVars::new(), now);
/// assert_eq!(title, "[08:05:00] vim {Unknown}");
/// ```
pub fn expand_at(
    template: &str,
    window: &WindowSnapshot,
    vars: &TitleVars,
    now: NaiveDateTime,
) -> String {
    let mut result = template.to_string();
    if !result.contains('{') {
        return result
    }

    for (name, value) in vars.iter() {
        replace_token(&mut result, name, || value.to_string());
    }

    replace_token(&mut result, "Date", || now.format("%Y-%m-%d").to_string());
    replace_token(&mut result, "Time", || now.format("%H:%M:%S").to_string());

    for token in WindowSnapshot::TOKENS {
        replace_token(&mut result, token, || {
            window.property(token).map(|v| v.to_string()).unwrap_or_default()
        });
    }

    result
}

/// Replaces every `{token}` in `s`, computing the value only if the token occurs.
///
/// Replacement proceeds left to right and never rescans inserted text.
fn replace_token<F>(s: &mut String, token: &str, value: F)
where
    F: FnOnce() -> String,
{
    let braced = format!("{{{}}}", token);
    if s.contains(&braced) {
        *s = s.replace(&braced, &value());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 31)
            .and_then(|d| d.and_hms_opt(12, 0, 59))
            .unwrap()
    }

    fn window() -> WindowSnapshot {
        WindowSnapshot {
            title: "~/src".into(),
            class: "foot".into(),
            is_floating: true,
            size: Point::new(800.0, 600.5),
            real_shadow_color: ColorF::new(0.0, 0.0, 0.0, 0.5),
            self_id: Identity(4096),
            monitor_moved_from: -1,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_tokens_unchanged() {
        let vars = TitleVars::new();
        for template in ["", "plain title", "{not a token}", "{{}}", "{title}"] {
            assert_eq!(expand_at(template, &window(), &vars, noon()), template);
        }
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let title = expand_at("{Class}/{Class}/{Class}", &window(), &TitleVars::new(), noon());
        assert_eq!(title, "foot/foot/foot");
    }

    #[test]
    fn test_value_formatting() {
        let vars = TitleVars::new();
        let w = window();

        assert_eq!(expand_at("{isFloating} {pinned}", &w, &vars, noon()), "true false");
        assert_eq!(expand_at("{size}", &w, &vars, noon()), "800.000000,600.500000");
        assert_eq!(
            expand_at("{realShadowColor}", &w, &vars, noon()),
            "0.000000,0.000000,0.000000,0.500000"
        );
        assert_eq!(expand_at("{self} {swallowed}", &w, &vars, noon()), "4096 0");
        assert_eq!(expand_at("{monitorMovedFrom}", &w, &vars, noon()), "-1");
        assert_eq!(expand_at("{workspace} {pendingSizeAck}", &w, &vars, noon()), "none none");
        assert_eq!(expand_at("{Date} {Time}", &w, &vars, noon()), "2025-12-31 12:00:59");
    }

    #[test]
    fn test_named_vars_first() {
        let mut vars = TitleVars::new();
        vars.insert("host", "box");
        // a named var may expand into a built-in token, which is then substituted.
        vars.insert("both", "{Class}@{host}");

        let title = expand_at("{both} {host}: {Title}", &window(), &vars, noon());
        assert_eq!(title, "foot@{host} box: ~/src");
    }

    #[test]
    fn test_every_token_resolves() {
        let w = WindowSnapshot::default();
        for token in WindowSnapshot::TOKENS {
            assert!(w.property(token).is_some(), "{} has no property", token);
        }
        assert!(WindowSnapshot::TOKENS.len() >= 40);
        assert_eq!(w.property("nope"), None);
    }
}
