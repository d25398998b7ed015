//! State shared by every bar.

use tracing::debug;

use crate::config::{BarConfig, ButtonSpec, TitleVars, ConfigError};
use crate::config::rules::{StyleOverrides, Style};
use crate::texture::TextureId;

/// Global state that outlives every decoration.
///
/// Decorations read from it while drawing and handling input, but it is
/// only changed by configuration events, which never happen mid-frame.
#[derive(Debug, Clone, Default)]
pub struct BarsState {
    /// The global configuration section.
    pub config: BarConfig,
    /// Buttons declared with the button keyword, in declaration order.
    pub buttons: Vec<ButtonSpec>,
    /// Named variables for custom titles.
    pub title_vars: TitleVars,
    /// Textures of destroyed decorations, waiting for the next frame to be freed.
    pub(crate) released: Vec<TextureId>,
}

impl BarsState {
    /// Creates a state with the default configuration and no buttons.
    pub fn new(config: BarConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// The effective style of a bar with the given overrides.
    pub fn style(&self, overrides: &StyleOverrides) -> Style {
        overrides.style(&self.config, &self.buttons)
    }

    /// Parses a button keyword and appends it to the global buttons.
    pub fn add_button(&mut self, value: &str) -> Result<&ButtonSpec, ConfigError> {
        let button = ButtonSpec::from_keyword(value)?;
        debug!(target: "bars::config", "global button {:?} -> {:?}", button.icon, button.command);
        self.buttons.push(button);
        Ok(&self.buttons[self.buttons.len() - 1])
    }

    /// Clears everything declared through keywords, ahead of a config reload.
    pub fn clear_declarations(&mut self) {
        self.buttons.clear();
        self.title_vars.clear();
    }

    /// Takes the textures queued for release.
    pub(crate) fn take_released(&mut self) -> Vec<TextureId> {
        std::mem::take(&mut self.released)
    }
}
