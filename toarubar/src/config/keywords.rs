//! Keyword declarations: buttons and named title variables.
//!
//! Both keywords are handled while the host parses its config. A declaration
//! that fails to parse yields a [`ConfigError`] and is otherwise ignored.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::types::{Color, ColorF};
use crate::util::spawn::capture_output;

use super::ConfigError;

/// The delimiter separating fields of a button declared through a window rule.
pub const RULE_BUTTON_DELIMITER: &str = ">|<";

/// Where a button was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ButtonOrigin {
    /// Declared with the button keyword; shared by every window without rule buttons.
    Global,
    /// Declared by a window rule; only applies to windows matching the rule.
    WindowRule,
}

/// A clickable button drawn on the bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonSpec {
    /// Where the button was declared.
    pub origin: ButtonOrigin,
    /// The fill color of the button circle.
    pub bg: Color,
    /// An explicit icon color. `None` picks black or white for contrast.
    pub fg: Option<Color>,
    /// The diameter of the button, in logical pixels.
    pub size: f64,
    /// The glyph or text drawn on top of the button.
    pub icon: String,
    /// The command run when the button is clicked.
    pub command: String,
}

impl ButtonSpec {
    /// Parses a `bgcolor, size, icon, command[, fgcolor]` keyword declaration.
    ///
    /// ```rust
    /// use toarubar::config::ButtonSpec;
    ///
    /// let button = ButtonSpec::from_keyword("rgb(ff4040), 10, 󰖭, killactive").unwrap();
    /// assert_eq!(button.size, 10.0);
    /// assert_eq!(button.command, "killactive");
    /// assert!(!button.user_fg());
    /// ```
    pub fn from_keyword(value: &str) -> Result<ButtonSpec, ConfigError> {
        let fields: Vec<&str> = value.split(',').map(str::trim).collect();

        let bg = fields.first().copied().unwrap_or_default();
        let size = fields.get(1).copied().unwrap_or_default();
        if bg.is_empty() {
            return Err(ConfigError::EmptyField("bgcolor"))
        }
        if size.is_empty() {
            return Err(ConfigError::EmptyField("size"))
        }
        if fields.len() < 4 {
            return Err(ConfigError::MissingFields { expected: 4, found: fields.len() })
        }

        let size: f64 = size.parse()
            .map_err(|_| ConfigError::InvalidNumber(size.to_string()))?;
        let bg: Color = bg.parse()?;
        let fg = match fields.get(4) {
            Some(fg) => Some(fg.parse::<Color>()?),
            None => None,
        };

        Ok(ButtonSpec {
            origin: ButtonOrigin::Global,
            bg,
            fg,
            size,
            icon: fields[2].to_string(),
            command: fields[3].to_string(),
        })
    }

    /// Parses a button declared through a window rule.
    ///
    /// Fields are separated by [`RULE_BUTTON_DELIMITER`], in the order
    /// `bg >|< size >|< icon >|< command [>|< fg]`. Returns `None` for
    /// a malformed declaration, which is dropped without an error.
    /// Colors that fail to parse become transparent.
    pub fn from_rule(arg: &str) -> Option<ButtonSpec> {
        let fields: Vec<&str> = arg.split(RULE_BUTTON_DELIMITER).map(str::trim).collect();
        if fields.len() < 4 {
            debug!(target: "config::rules", "dropping button rule with {} fields", fields.len());
            return None
        }

        let Ok(size) = fields[1].parse::<i64>() else {
            debug!(target: "config::rules", "dropping button rule with size {:?}", fields[1]);
            return None
        };

        Some(ButtonSpec {
            origin: ButtonOrigin::WindowRule,
            bg: fields[0].parse().unwrap_or_default(),
            fg: fields.get(4).map(|fg| fg.parse().unwrap_or_default()),
            size: size as f64,
            icon: fields[2].to_string(),
            command: fields[3].to_string(),
        })
    }

    /// Whether the icon color was given explicitly.
    pub fn user_fg(&self) -> bool {
        self.fg.is_some()
    }

    /// The color the icon is drawn in.
    ///
    /// An explicit foreground wins; otherwise dark buttons get a
    /// white icon and light buttons a black one.
    pub fn icon_color(&self) -> ColorF {
        if let Some(fg) = self.fg {
            return fg.to_f32()
        }

        let bg = self.bg.to_f32();
        if bg.r + bg.g + bg.b < 1.0 {
            Color::WHITE.to_f32()
        } else {
            Color::BLACK.to_f32()
        }
    }
}

/// Named variables available to custom title templates.
///
/// Each variable is declared once as `name,command`; the command's output
/// at declaration time becomes the value. Declaration order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleVars {
    vars: IndexMap<String, String>,
}

impl TitleVars {
    /// Creates an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `name,command` declaration, runs the command, and stores its output.
    ///
    /// Blocks until the command exits.
    pub fn declare(&mut self, decl: &str) -> Result<(), ConfigError> {
        let (name, command) = parse_title_var(decl)?;

        let value = capture_output(command)
            .map_err(|e| ConfigError::Command(e.to_string()))?;
        debug!(target: "config::keywords", "title-var {} = {:?}", name, value);

        self.insert(name, value);
        Ok(())
    }

    /// Stores a variable directly. A variable with the same name is replaced.
    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        if self.vars.insert(name.clone(), value.into()).is_some() {
            warn!(target: "config::keywords", "title-var {} redeclared", name);
        }
    }

    /// Looks up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Iterates over (name, value) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of declared variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are declared.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Removes every variable.
    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

impl fmt::Display for TitleVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{{{}}} = {:?}", name, value)?;
        }
        Ok(())
    }
}

/// Splits a `name,command` declaration at its first comma, trimming spaces and tabs.
pub fn parse_title_var(decl: &str) -> Result<(&str, &str), ConfigError> {
    let (name, command) = decl.split_once(',').ok_or(ConfigError::InvalidTitleVar)?;

    Ok((trim_blank(name), trim_blank(command)))
}

fn trim_blank(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_button() {
        let button = ButtonSpec::from_keyword("rgb(ffffff), 12.5, X, exit, rgb(ff0000)").unwrap();

        assert_eq!(button.origin, ButtonOrigin::Global);
        assert_eq!(button.bg, Color::WHITE);
        assert_eq!(button.fg, Some(Color::from_hex(0xff0000ff)));
        assert_eq!(button.size, 12.5);
        assert_eq!(button.icon, "X");
        assert_eq!(button.command, "exit");
        assert!(button.user_fg());
    }

    #[test]
    fn test_keyword_button_errors() {
        assert_eq!(
            ButtonSpec::from_keyword(", 10, X, exit"),
            Err(ConfigError::EmptyField("bgcolor"))
        );
        assert_eq!(
            ButtonSpec::from_keyword("rgb(ffffff)"),
            Err(ConfigError::EmptyField("size"))
        );
        assert_eq!(
            ButtonSpec::from_keyword("rgb(ffffff), 10, X"),
            Err(ConfigError::MissingFields { expected: 4, found: 3 })
        );
        assert_eq!(
            ButtonSpec::from_keyword("rgb(ffffff), big, X, exit"),
            Err(ConfigError::InvalidNumber("big".into()))
        );
        assert!(matches!(
            ButtonSpec::from_keyword("white, 10, X, exit"),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_rule_button() {
        let button = ButtonSpec::from_rule("rgb(000000) >|< 20 >|< ? >|< notify-send hi").unwrap();

        assert_eq!(button.origin, ButtonOrigin::WindowRule);
        assert_eq!(button.size, 20.0);
        assert_eq!(button.command, "notify-send hi");
        assert_eq!(button.fg, None);

        // too few fields and bad sizes are dropped
        assert!(ButtonSpec::from_rule("rgb(000000) >|< 20 >|< ?").is_none());
        assert!(ButtonSpec::from_rule("rgb(000000) >|< 2.5 >|< ? >|< cmd").is_none());

        // bad colors fall back to transparent
        let button = ButtonSpec::from_rule("nope >|< 20 >|< ? >|< cmd >|< nope").unwrap();
        assert_eq!(button.bg, Color::default());
        assert_eq!(button.fg, Some(Color::default()));
    }

    #[test]
    fn test_icon_contrast() {
        let mut button = ButtonSpec::from_keyword("rgb(202020), 10, X, exit").unwrap();
        assert_eq!(button.icon_color(), Color::WHITE.to_f32());

        button.bg = Color::from_hex(0xe0e0e0ff);
        assert_eq!(button.icon_color(), Color::BLACK.to_f32());

        button.fg = Some(Color::from_hex(0x00ff00ff));
        assert_eq!(button.icon_color(), Color::from_hex(0x00ff00ff).to_f32());
    }

    #[test]
    fn test_title_var_parsing() {
        assert_eq!(parse_title_var(" host ,\t hostname "), Ok(("host", "hostname")));
        assert_eq!(parse_title_var("a,b,c"), Ok(("a", "b,c")));
        assert_eq!(parse_title_var("nocomma"), Err(ConfigError::InvalidTitleVar));
    }

    #[test]
    fn test_title_var_declare() {
        let mut vars = TitleVars::new();

        vars.declare("greeting, echo hello").unwrap();
        vars.declare("greeting, echo again").unwrap();
        vars.insert("user", "me");

        assert_eq!(vars.get("greeting"), Some("again"));
        assert_eq!(vars.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["greeting", "user"]);
        assert!(vars.declare("broken").is_err());
        assert_eq!(vars.len(), 2);
    }
}
