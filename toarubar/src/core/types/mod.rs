//! Basic core types used throughout this crate at a high level.

pub mod geometry;

pub use geometry::*;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use strum::{EnumIs, EnumString, Display};

use crate::config::{parse_config_int, ConfigError};

/// A unique identifier for a window, as handed out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A unique identifier for a monitor, as handed out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorId(pub u64);

/// A representation of a color, following the RGBA model.
///
/// The color is packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(u32);

impl Color {
    /// Fully opaque white.
    pub const WHITE: Color = Color(0xffffffff);

    /// Fully opaque black.
    pub const BLACK: Color = Color(0x000000ff);

    /// Creates the Color from a 32-bit integer.
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex)
    }

    /// Expresses the Color as a hex string.
    pub fn as_string(&self) -> String {
        format!("{:#x}", self.as_u32())
    }

    /// Returns the (R, G, B, A) values of the Color
    /// as bytes.
    pub fn rgba(&self) -> (u8, u8, u8, u8) {
        let [r, g, b, a] = u32::to_be_bytes(self.0);
        (r, g, b, a)
    }

    /// Returns the (R, G, B, A) components of the Color
    /// as proportions of max intensity (255.0).
    pub fn rgba_f32(&self) -> (f32, f32, f32, f32) {
        let (r, g, b, a) = self.rgba();

        (
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Whether the alpha channel is non-zero.
    pub fn is_visible(&self) -> bool {
        self.rgba().3 > 0
    }

    /// Returns the color as a u32.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Converts the Color to its floating point representation.
    pub fn to_f32(&self) -> ColorF {
        let (r, g, b, a) = self.rgba_f32();
        ColorF { r, g, b, a }
    }
}

impl From<u32> for Color {
    fn from(from: u32) -> Self {
        Self::from_hex(from)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    /// Parses a color from a decimal integer, a bare hex literal, `rgb(rrggbb)`
    /// or `rgba(rrggbbaa)`.
    ///
    /// ```rust
    /// use toarubar::types::Color;
    ///
    /// let a: Color = "rgb(ff0000)".parse().unwrap();
    /// let b: Color = "rgba(ff0000ff)".parse().unwrap();
    /// assert_eq!(a, b);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_config_int(s)
            .map(|v| Color(v as u32))
            .ok_or_else(|| ConfigError::InvalidColor(s.trim().to_string()))
    }
}

/// A color with floating point components in `0.0..=1.0`.
///
/// This is the form colors take when handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorF {
    /// The color placeholders are drawn in when a texture could not be produced.
    pub const PLACEHOLDER: ColorF = ColorF { r: 1.0, g: 0.0, b: 1.0, a: 0.85 };

    /// Creates a new ColorF.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha multiplied by `alpha`.
    #[must_use]
    pub fn with_alpha_mul(self, alpha: f32) -> Self {
        Self { a: self.a * alpha, ..self }
    }

    /// Linearly interpolates between `self` and `other`.
    ///
    /// `t` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: ColorF, t: f32) -> ColorF {
        let t = t.clamp(0.0, 1.0);
        ColorF {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl From<Color> for ColorF {
    fn from(from: Color) -> Self {
        from.to_f32()
    }
}

impl fmt::Display for ColorF {
    /// Renders as `r,g,b,a` with the raw component values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6},{:.6},{:.6}", self.r, self.g, self.b, self.a)
    }
}

/// Where the title text is placed within the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// Parses an alignment, falling back to `Center` for anything unknown.
    pub fn parse_lossy(s: &str) -> TextAlign {
        s.trim().parse().unwrap_or_default()
    }
}

/// Which edge of the bar the buttons are packed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum ButtonAlign {
    Left,
    #[default]
    Right,
}

impl ButtonAlign {
    /// Only the literal `left` selects the left edge.
    pub fn parse_lossy(s: &str) -> ButtonAlign {
        if s.trim() == "left" {
            ButtonAlign::Left
        } else {
            ButtonAlign::Right
        }
    }
}
