//! Types and helpers for configuring the title bars.
//!
//! Configuration reaches this crate in three shapes:
//!
//! - plain values (`plugin:toarubar:bar_height = 20`), stored in a [`BarConfig`];
//! - keyword declarations (`toarubar-button = ...`, `title-var = ...`), parsed
//!   by the functions in [`keywords`];
//! - window rules, resolved per window into [`rules::StyleOverrides`].
//!
//! Value and keyword parsing report a [`ConfigError`] to the host's config parser.
//! Rule parsing never fails: bad arguments fall back to zero.

mod config;
mod section;

pub mod keywords;
pub mod rules;

#[doc(inline)]
pub use config::*;
#[doc(inline)]
pub use section::ConfigSection;
#[doc(inline)]
pub use keywords::{ButtonSpec, ButtonOrigin, TitleVars};

use thiserror::Error;

/// The namespace every value and window rule key is registered under.
pub const NAMESPACE: &str = "plugin:toarubar:";

/// The keyword used to declare a global button.
pub const BUTTON_KEYWORD: &str = "toarubar-button";

/// The keyword used to declare a named title variable.
pub const TITLE_VAR_KEYWORD: &str = "title-var";

/// A structured failure while parsing a config value or declaration.
///
/// The offending declaration is ignored; the error is reported back to
/// the host's config parser so the user can see it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field was left empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A declaration had too few fields.
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields {
        /// The minimum number of fields.
        expected: usize,
        /// The number of fields supplied.
        found: usize,
    },

    /// A color value could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A numeric value could not be parsed.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// A `title-var` declaration was not of the form `name,command`.
    #[error("title-var must be in the form name,command")]
    InvalidTitleVar,

    /// The key is not known to this section.
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// The command for a title variable could not be run.
    #[error("could not run command: {0}")]
    Command(String),
}

/// Parses an integer the way config values are parsed.
///
/// Accepted forms, after trimming surrounding whitespace:
///
/// - `rgb(rrggbb)` and `rgba(rrggbbaa)`, hex digits with whitespace ignored;
///   six digits get a fully opaque alpha appended;
/// - decimal integers, optionally signed;
/// - bare hexadecimal literals.
///
/// ```rust
/// use toarubar::config::parse_config_int;
///
/// assert_eq!(parse_config_int("rgb(ff0000)"), parse_config_int("rgba(ff0000ff)"));
/// assert_eq!(parse_config_int(" 42 "), Some(42));
/// assert_eq!(parse_config_int("ff"), Some(255));
/// assert_eq!(parse_config_int("nope"), None);
/// ```
pub fn parse_config_int(s: &str) -> Option<i64> {
    let t = s.trim();
    if t.is_empty() {
        return None
    }

    if t.starts_with("rgb(") || t.starts_with("rgba(") {
        let start = t.find('(')?;
        let end = t.find(')')?;
        if end <= start + 1 {
            return None
        }
        let mut hex: String = t[start + 1..end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if hex.len() == 6 {
            hex.push_str("ff");
        }
        return u32::from_str_radix(&hex, 16).ok().map(i64::from)
    }

    if t.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-') {
        return t.parse::<i64>().ok()
    }

    if t.chars().all(|c| c.is_ascii_hexdigit()) {
        return i64::from_str_radix(t, 16).ok()
    }

    None
}

/// Strips [`NAMESPACE`] from `key`, if present.
pub fn strip_namespace(key: &str) -> &str {
    key.trim().strip_prefix(NAMESPACE).unwrap_or(key.trim())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_config_int() {
        assert_eq!(parse_config_int("rgba(33333388)"), Some(0x33333388));
        assert_eq!(parse_config_int("rgb(ffffff)"), Some(0xffffffff));
        assert_eq!(parse_config_int("-3"), Some(-3));
        assert_eq!(parse_config_int("+7"), Some(7));
        assert_eq!(parse_config_int("rgb()"), None);
        assert_eq!(parse_config_int("rgb)("), None);
        assert_eq!(parse_config_int(""), None);
        assert_eq!(parse_config_int("--"), None);
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("plugin:toarubar:bar_height"), "bar_height");
        assert_eq!(strip_namespace(" bar_height "), "bar_height");
    }
}
