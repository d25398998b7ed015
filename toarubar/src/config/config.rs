//! The global configuration section.
//!
//! This module contains [`BarConfig`], which holds the values every
//! bar falls back to when no window rule overrides them.

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use toarubar_macro::ConfigSection;

use crate::types::{Color, TextAlign, ButtonAlign};

use super::{ConfigSection, ConfigError, parse_config_int, strip_namespace};

/// The global bar configuration.
///
/// Every field is exposed through [`ConfigSection`] under the name it is
/// registered with in the host's config, minus the `plugin:toarubar:` prefix.
///
/// # Example
///
/// ```rust
/// use toarubar::config::{BarConfig, ConfigSection};
///
/// let mut config = BarConfig::default();
/// config.set("plugin:toarubar:bar_height", "20").unwrap();
///
/// assert_eq!(config.bar_height, 20);
/// assert_eq!(config.get_key_static::<i64>("bar_height"), Some(&20));
/// ```
#[derive(Debug, Clone, PartialEq, ConfigSection)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarConfig {
    /// The background color of the bar.
    #[key]
    pub bar_color: Color,
    /// The height of the bar, in logical pixels.
    #[key]
    pub bar_height: i64,
    /// The color of the title text.
    #[key(name = "col.text")]
    pub text_color: Color,
    /// The font size of the title, in points.
    #[key]
    pub bar_text_size: i64,
    /// Whether the title is drawn at all.
    #[key]
    pub bar_title_enabled: bool,
    /// Whether the bar background requests blur.
    #[key]
    pub bar_blur: bool,
    /// The font family of the title.
    #[key]
    pub bar_text_font: String,
    /// Where the title is placed within the bar.
    #[key]
    pub bar_text_align: TextAlign,
    /// Whether the bar counts as part of the window for input and layout.
    #[key]
    pub bar_part_of_window: bool,
    /// Whether the bar is laid out before (outside of) the border.
    #[key]
    pub bar_precedence_over_border: bool,
    /// Which edge of the bar the buttons are packed against.
    #[key]
    pub bar_buttons_alignment: ButtonAlign,
    /// Padding between the bar edges and its contents.
    #[key]
    pub bar_padding: i64,
    /// Padding between buttons.
    #[key]
    pub bar_button_padding: i64,
    /// Whether bars are drawn.
    #[key]
    pub enabled: bool,
    /// Whether button icons are only drawn while hovered.
    #[key]
    pub icon_on_hover: bool,
    /// The button color for unfocused windows. Ignored if fully transparent.
    #[key]
    pub inactive_button_color: Color,
    /// A command run when the bar is double-clicked.
    #[key]
    pub on_double_click: String,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_color: Color::from_hex(0x33333388),
            bar_height: 15,
            text_color: Color::WHITE,
            bar_text_size: 10,
            bar_title_enabled: true,
            bar_blur: false,
            bar_text_font: String::from("Sans"),
            bar_text_align: TextAlign::Center,
            bar_part_of_window: true,
            bar_precedence_over_border: false,
            bar_buttons_alignment: ButtonAlign::Right,
            bar_padding: 7,
            bar_button_padding: 5,
            enabled: true,
            icon_on_hover: false,
            inactive_button_color: Color::from_hex(0),
            on_double_click: String::new(),
        }
    }
}

impl BarConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value from its string form, as it appears in the host's config.
    ///
    /// `key` may carry the `plugin:toarubar:` prefix. On error the
    /// stored value is left untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = strip_namespace(key);
        let value = value.trim();

        match key {
            "bar_color" => self.bar_color = value.parse()?,
            "bar_height" => self.bar_height = parse_int(value)?,
            "col.text" => self.text_color = value.parse()?,
            "bar_text_size" => self.bar_text_size = parse_int(value)?,
            "bar_title_enabled" => self.bar_title_enabled = parse_bool(value)?,
            "bar_blur" => self.bar_blur = parse_bool(value)?,
            "bar_text_font" => self.bar_text_font = value.to_string(),
            "bar_text_align" => self.bar_text_align = TextAlign::parse_lossy(value),
            "bar_part_of_window" => self.bar_part_of_window = parse_bool(value)?,
            "bar_precedence_over_border" => self.bar_precedence_over_border = parse_bool(value)?,
            "bar_buttons_alignment" => self.bar_buttons_alignment = ButtonAlign::parse_lossy(value),
            "bar_padding" => self.bar_padding = parse_int(value)?,
            "bar_button_padding" => self.bar_button_padding = parse_int(value)?,
            "enabled" => self.enabled = parse_bool(value)?,
            "icon_on_hover" => self.icon_on_hover = parse_bool(value)?,
            "inactive_button_color" => self.inactive_button_color = value.parse()?,
            "on_double_click" => self.on_double_click = value.to_string(),
            unknown => return Err(ConfigError::UnknownKey(unknown.to_string())),
        }

        debug!(target: "config", "set {} = {}", key, value);
        Ok(())
    }

    /// Whether a key is recognized by [`set`](Self::set).
    pub fn is_known_key(&self, key: &str) -> bool {
        self.keys().contains(&strip_namespace(key))
    }
}

fn parse_int(value: &str) -> Result<i64, ConfigError> {
    parse_config_int(value).ok_or_else(|| ConfigError::InvalidNumber(value.to_string()))
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    parse_int(value).map(|v| v != 0)
}
