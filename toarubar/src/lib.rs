//! # toarubar - title bars for a certain desktop
//!
//! toarubar draws a draggable title bar with clickable buttons on top of each
//! window managed by a compositor, and lets users restyle individual windows
//! through window rules. It is meant to be loaded into a compositor as a
//! plugin: the compositor owns windows, input, rendering and configuration,
//! and this crate only decides what a bar looks like and what input on it means.
//!
//! ## Design
//!
//! Like the rest of the toaru ecosystem, toarubar is built around traits.
//! The compositor is described by the [`Host`] and [`HostWindow`] traits in
//! the [`platform`] module, drawing goes through [`BarRenderer`], and
//! turning text into pixels is delegated to the [`Rasterizer`] and
//! [`TextureUploader`] traits. Nothing in this crate talks to a display
//! server, a GPU or a font library directly.
//!
//! ### Core Types
//!
//! - [`Bars`] is the registry the host talks to. It owns one
//!   [`BarDecoration`] per decorated window along with the [`BarsState`]
//!   shared between them, and routes host events to the right bar.
//! - [`BarDecoration`] is the bar attached to a single window. It resolves
//!   the window's rules into a [`Style`], lays itself out, draws itself and
//!   runs the press/drag/double-click [gesture](gesture) state machine.
//! - [`BarConfig`] is the global configuration section, filled in from the
//!   host's config through [`ConfigSection`].
//!
//! ### Errors
//!
//! Every host-facing entry point on [`Bars`] is a recover boundary: errors
//! and panics inside it are reported through an [`ErrorHandler`] and never
//! reach the host. The only hard failure is [`Bars::init`] refusing to run
//! against a host whose API version does not match [`HOST_API_VERSION`].
//!
//! [`Host`]: crate::platform::Host
//! [`HostWindow`]: crate::platform::HostWindow
//! [`BarRenderer`]: crate::platform::BarRenderer
//! [`Rasterizer`]: crate::texture::Rasterizer
//! [`TextureUploader`]: crate::texture::TextureUploader
//! [`Style`]: crate::config::rules::Style
//! [`ConfigSection`]: crate::config::ConfigSection
//! [`HOST_API_VERSION`]: crate::platform::HOST_API_VERSION

#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]

pub mod config;
pub mod core;
pub mod decoration;
pub mod gesture;
pub mod layout;
pub mod manager;
pub mod platform;
pub mod texture;
pub mod title;
pub mod util;

#[cfg(test)]
mod mock;

pub use crate::core::types;
#[doc(inline)]
pub use crate::manager::{Bars, BarsState};
#[doc(inline)]
pub use crate::decoration::BarDecoration;
#[doc(inline)]
pub use crate::config::{BarConfig, ConfigError};
#[doc(inline)]
pub use crate::platform::{Host, HostWindow};

use std::io;

use thiserror::Error;

use crate::texture::{RasterError, UploadError, TextureError};
use crate::types::WindowId;

/// Everything that could possibly go wrong while bars are running.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    /// A config value or keyword declaration could not be parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Text or shapes could not be rasterized.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A raster buffer could not be uploaded.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The host reports a different API version than this crate was built for.
    #[error("version mismatch: host is {host}, toarubar was built for {client}")]
    VersionMismatch {
        /// The version reported by the host.
        host: String,
        /// The version this crate was built against.
        client: String,
    },

    /// Received a reference to a window the host does not know.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    /// Unable to run an external command.
    #[error("error while running program: {0}")]
    Spawn(String),

    /// An error not covered by the above.
    #[error("error: {0}")]
    OtherError(String),
}

/// Quickly construct a BarError.
///
/// ```rust
/// use toarubar::{barerr, BarError};
/// use toarubar::types::WindowId;
///
/// assert_eq!(barerr!(unknownwin: WindowId(3)), BarError::UnknownWindow(WindowId(3)));
/// assert_eq!(barerr!(other: "oops".into()), BarError::OtherError("oops".into()));
/// ```
#[macro_export]
macro_rules! barerr {
    // Config
    (config: $t:expr) => {
        $crate::BarError::Config($t)
    };
    // VersionMismatch
    (version: $host:expr, $client:expr) => {
        $crate::BarError::VersionMismatch { host: $host, client: $client }
    };
    // UnknownWindow
    (unknownwin: $t:expr) => {
        $crate::BarError::UnknownWindow($t)
    };
    // Spawn
    (spawn: $t:expr) => {
        $crate::BarError::Spawn($t)
    };
    // OtherError
    (other: $t:expr) => {
        $crate::BarError::OtherError($t)
    };
}

impl From<TextureError> for BarError {
    fn from(e: TextureError) -> BarError {
        match e {
            TextureError::Raster(e) => BarError::Raster(e),
            TextureError::Upload(e) => BarError::Upload(e),
        }
    }
}

impl From<io::Error> for BarError {
    fn from(e: io::Error) -> BarError {
        BarError::Spawn(e.to_string())
    }
}

/// The general result type used by toarubar.
pub type Result<T> = ::core::result::Result<T, BarError>;

/// An error handler that can be used to handle a [`BarError`].
///
/// Typically this would log the error and show it to the user through the
/// host, but it can be anything.
pub trait ErrorHandler<H: Host> {
    /// Calls the error handler. `context` names the entry point that failed.
    fn call(&self, host: &mut H, context: &str, err: BarError);
}
