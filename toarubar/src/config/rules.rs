//! Window rules and per-window style resolution.
//!
//! The host matches rules against windows; this module only interprets the
//! rules that matched. A rule string has the form
//! `plugin:toarubar:<key> <argument...>`, and rules outside the namespace
//! are ignored.
//!
//! Resolution is last-write-wins per property, in the order the host matched
//! the rules. [`StyleOverrides`] holds what the rules set, and
//! [`StyleOverrides::style`] merges it over the global [`BarConfig`].

use std::str::FromStr;

use strum::{EnumString, Display, EnumIter};
use tracing::trace;

use crate::types::{Color, TextAlign, ButtonAlign};

use super::{BarConfig, ButtonSpec, NAMESPACE, parse_config_int};

/// The keys recognized in window rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum RuleKey {
    // bar geometry and behaviour
    #[strum(serialize = "nobar")]
    NoBar,
    BarHeight,
    BarPadding,
    BarColor,
    BarBlur,
    BarPartOfWindow,
    BarPrecedenceOverBorder,
    OnDoubleClick,
    // title
    BarTitleEnabled,
    BarTextFont,
    BarTextSize,
    BarTextAlign,
    TitleColor,
    Title,
    // buttons
    IconOnHover,
    BarButtonsAlignment,
    BarButtonPadding,
    InactiveButtonColor,
    Button,
}

/// A sparse set of per-window overrides.
///
/// Every property is `None` until a rule sets it. Resolution always starts
/// from a fresh, fully unset value, so a rule that stops matching falls back
/// to the global default on the next pass.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct StyleOverrides {
    /// Set by the `nobar` rule.
    pub hidden: bool,

    pub height: Option<i64>,
    pub padding: Option<i64>,
    pub color: Option<Color>,
    pub blur: Option<bool>,
    pub part_of_window: Option<bool>,
    pub precedence_over_border: Option<bool>,
    pub on_double_click: Option<String>,

    pub title_enabled: Option<bool>,
    pub font: Option<String>,
    pub text_size: Option<i64>,
    pub text_align: Option<TextAlign>,
    pub title_color: Option<Color>,
    pub custom_title: Option<String>,

    pub icon_on_hover: Option<bool>,
    pub buttons_alignment: Option<ButtonAlign>,
    pub button_padding: Option<i64>,
    pub inactive_button_color: Option<Color>,
    /// Buttons declared by rules. If non-empty, replaces the global buttons.
    pub buttons: Vec<ButtonSpec>,
}

impl StyleOverrides {
    /// Resolves the overrides set by `rules`, applied in order.
    ///
    /// ```rust
    /// use toarubar::config::rules::StyleOverrides;
    ///
    /// let overrides = StyleOverrides::resolve([
    ///     "plugin:toarubar:bar_height 30",
    ///     "plugin:toarubar:bar_height 40",
    ///     "float",
    /// ]);
    /// assert_eq!(overrides.height, Some(40));
    /// ```
    pub fn resolve<'r, I>(rules: I) -> StyleOverrides
    where
        I: IntoIterator<Item = &'r str>,
    {
        let mut overrides = StyleOverrides::default();
        overrides.replay(rules);
        overrides
    }

    /// Unsets every override, then applies `rules` in order.
    pub fn replay<'r, I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = &'r str>,
    {
        *self = StyleOverrides::default();
        for rule in rules {
            self.apply_rule(rule);
        }
    }

    /// Applies a single rule on top of the current overrides.
    ///
    /// Rules outside the namespace or with an unknown key are ignored.
    pub fn apply_rule(&mut self, rule: &str) {
        let Some(rule) = rule.trim().strip_prefix(NAMESPACE) else {
            return
        };
        let (key, arg) = rule.split_once(' ').unwrap_or((rule, ""));
        let arg = arg.trim();

        let Ok(key) = RuleKey::from_str(key) else {
            trace!(target: "config::rules", "ignoring unknown rule key {}", key);
            return
        };

        let int = || parse_config_int(arg).unwrap_or(0);
        let color = || Color::from_hex(int() as u32);

        match key {
            RuleKey::NoBar => self.hidden = true,
            RuleKey::BarHeight => self.height = Some(int()),
            RuleKey::BarPadding => self.padding = Some(int()),
            RuleKey::BarColor => self.color = Some(color()),
            RuleKey::BarBlur => self.blur = Some(int() != 0),
            RuleKey::BarPartOfWindow => self.part_of_window = Some(int() != 0),
            RuleKey::BarPrecedenceOverBorder => self.precedence_over_border = Some(int() != 0),
            RuleKey::OnDoubleClick => self.on_double_click = Some(arg.to_string()),
            RuleKey::BarTitleEnabled => self.title_enabled = Some(int() != 0),
            RuleKey::BarTextFont => self.font = Some(arg.to_string()),
            RuleKey::BarTextSize => self.text_size = Some(int()),
            RuleKey::BarTextAlign => self.text_align = Some(TextAlign::parse_lossy(arg)),
            RuleKey::TitleColor => self.title_color = Some(color()),
            RuleKey::Title => self.custom_title = Some(arg.to_string()),
            RuleKey::IconOnHover => self.icon_on_hover = Some(int() != 0),
            RuleKey::BarButtonsAlignment => self.buttons_alignment = Some(ButtonAlign::parse_lossy(arg)),
            RuleKey::BarButtonPadding => self.button_padding = Some(int()),
            RuleKey::InactiveButtonColor => self.inactive_button_color = Some(color()),
            RuleKey::Button => {
                if let Some(button) = ButtonSpec::from_rule(arg) {
                    self.buttons.push(button);
                }
            }
        }
    }

    /// Merges the overrides over `defaults`.
    ///
    /// `global_buttons` are used only when no rule declared any buttons.
    pub fn style(&self, defaults: &BarConfig, global_buttons: &[ButtonSpec]) -> Style {
        let buttons = if self.buttons.is_empty() {
            global_buttons.to_vec()
        } else {
            self.buttons.clone()
        };

        Style {
            hidden: self.hidden,
            enabled: defaults.enabled,
            height: self.height.unwrap_or(defaults.bar_height),
            padding: self.padding.unwrap_or(defaults.bar_padding),
            color: self.color.unwrap_or(defaults.bar_color),
            blur: self.blur.unwrap_or(defaults.bar_blur),
            part_of_window: self.part_of_window.unwrap_or(defaults.bar_part_of_window),
            precedence_over_border: self.precedence_over_border
                .unwrap_or(defaults.bar_precedence_over_border),
            on_double_click: self.on_double_click.clone()
                .unwrap_or_else(|| defaults.on_double_click.clone()),
            title_enabled: self.title_enabled.unwrap_or(defaults.bar_title_enabled),
            font: self.font.clone().unwrap_or_else(|| defaults.bar_text_font.clone()),
            text_size: self.text_size.unwrap_or(defaults.bar_text_size),
            text_align: self.text_align.unwrap_or(defaults.bar_text_align),
            title_color: self.title_color.unwrap_or(defaults.text_color),
            custom_title: self.custom_title.clone(),
            icon_on_hover: self.icon_on_hover.unwrap_or(defaults.icon_on_hover),
            buttons_alignment: self.buttons_alignment.unwrap_or(defaults.bar_buttons_alignment),
            button_padding: self.button_padding.unwrap_or(defaults.bar_button_padding),
            inactive_button_color: self.inactive_button_color
                .unwrap_or(defaults.inactive_button_color),
            buttons,
        }
    }
}

/// The effective style of one bar, with every property resolved.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Style {
    pub hidden: bool,
    /// Whether bars are enabled globally.
    pub enabled: bool,

    pub height: i64,
    pub padding: i64,
    pub color: Color,
    pub blur: bool,
    pub part_of_window: bool,
    pub precedence_over_border: bool,
    pub on_double_click: String,

    pub title_enabled: bool,
    pub font: String,
    pub text_size: i64,
    pub text_align: TextAlign,
    pub title_color: Color,
    pub custom_title: Option<String>,

    pub icon_on_hover: bool,
    pub buttons_alignment: ButtonAlign,
    pub button_padding: i64,
    pub inactive_button_color: Color,
    pub buttons: Vec<ButtonSpec>,
}

impl Style {
    /// The double-click command, if one is configured.
    pub fn double_click_command(&self) -> Option<&str> {
        Some(self.on_double_click.as_str()).filter(|c| !c.is_empty())
    }

    /// The button color to use given the window's focus.
    ///
    /// The inactive color only applies when it is not fully transparent.
    pub fn button_color(&self, button: &ButtonSpec, focused: bool) -> Color {
        if !focused && self.inactive_button_color.is_visible() {
            self.inactive_button_color
        } else {
            button.bg
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    use crate::config::ButtonOrigin;

    fn global_button() -> ButtonSpec {
        ButtonSpec::from_keyword("rgb(ff0000), 10, X, exit").unwrap()
    }

    #[test]
    fn test_no_rules_is_default() {
        let config = BarConfig::default();
        let style = StyleOverrides::resolve([]).style(&config, &[]);

        assert!(!style.hidden);
        assert_eq!(style.height, config.bar_height);
        assert_eq!(style.padding, config.bar_padding);
        assert_eq!(style.color, config.bar_color);
        assert_eq!(style.font, config.bar_text_font);
        assert_eq!(style.title_color, config.text_color);
        assert_eq!(style.text_align, config.bar_text_align);
        assert_eq!(style.buttons_alignment, config.bar_buttons_alignment);
        assert_eq!(style.custom_title, None);
        assert_eq!(style.double_click_command(), None);
    }

    #[test]
    fn test_every_key_is_recognized() {
        for key in RuleKey::iter() {
            let rule = format!("{}{} 1", NAMESPACE, key);
            let overrides = StyleOverrides::resolve([rule.as_str()]);
            // button rules with one field are dropped, everything else must land.
            if key != RuleKey::Button {
                assert_ne!(overrides, StyleOverrides::default(), "{} was ignored", key);
            }
        }
    }

    #[test]
    fn test_rule_overrides_then_reverts() {
        let mut config = BarConfig::default();
        config.set("bar_height", "20").unwrap();

        let mut overrides = StyleOverrides::resolve(["plugin:toarubar:bar_height 30"]);
        assert_eq!(overrides.style(&config, &[]).height, 30);

        overrides.replay([]);
        assert_eq!(overrides.style(&config, &[]).height, 20);
    }

    #[test]
    fn test_last_write_wins() {
        let overrides = StyleOverrides::resolve([
            "plugin:toarubar:bar_color rgb(ff0000)",
            "plugin:toarubar:bar_text_font Mono",
            "plugin:toarubar:bar_color rgba(00ff0080)",
        ]);

        assert_eq!(overrides.color, Some(Color::from_hex(0x00ff0080)));
        assert_eq!(overrides.font.as_deref(), Some("Mono"));
    }

    #[test]
    fn test_bad_arguments_fall_back_to_zero() {
        let overrides = StyleOverrides::resolve([
            "plugin:toarubar:bar_height huge",
            "plugin:toarubar:title_color",
            "plugin:toarubar:bar_text_align sideways",
        ]);

        assert_eq!(overrides.height, Some(0));
        assert_eq!(overrides.title_color, Some(Color::from_hex(0)));
        assert_eq!(overrides.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn test_foreign_rules_ignored() {
        let overrides = StyleOverrides::resolve([
            "float",
            "plugin:otherbars:bar_height 40",
            "plugin:toarubar:bar_weight 40",
        ]);

        assert_eq!(overrides, StyleOverrides::default());
    }

    #[test]
    fn test_nobar_and_title() {
        let overrides = StyleOverrides::resolve([
            "plugin:toarubar:nobar",
            "plugin:toarubar:title {Class}: {Title}",
        ]);

        assert!(overrides.hidden);
        assert_eq!(overrides.custom_title.as_deref(), Some("{Class}: {Title}"));
    }

    #[test]
    fn test_rule_buttons_replace_globals() {
        let config = BarConfig::default();
        let globals = vec![global_button(), global_button()];

        let style = StyleOverrides::resolve([]).style(&config, &globals);
        assert_eq!(style.buttons, globals);

        let overrides = StyleOverrides::resolve([
            "plugin:toarubar:button rgb(00ff00) >|< 12 >|< + >|< notify-send plus",
            "plugin:toarubar:button rgb(00ff00) >|< 12",
        ]);
        let style = overrides.style(&config, &globals);

        assert_eq!(style.buttons.len(), 1);
        assert!(style.buttons.iter().all(|b| b.origin == ButtonOrigin::WindowRule));
        assert_eq!(style.buttons[0].command, "notify-send plus");
    }

    #[test]
    fn test_inactive_button_color() {
        let config = BarConfig::default();
        let button = global_button();

        let style = StyleOverrides::resolve([]).style(&config, &[]);
        assert_eq!(style.button_color(&button, false), button.bg);

        let style = StyleOverrides::resolve(["plugin:toarubar:inactive_button_color rgb(444444)"])
            .style(&config, &[]);
        assert_eq!(style.button_color(&button, true), button.bg);
        assert_eq!(style.button_color(&button, false), Color::from_hex(0x444444ff));
    }
}
