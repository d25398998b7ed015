//! Error reporting and the persistent file log.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::platform::Host;
use crate::types::ColorF;
use crate::{BarError, ErrorHandler, Result};

/// The color of error notifications.
pub const ERROR_COLOR: ColorF = ColorF::new(1.0, 0.2, 0.2, 1.0);

/// How long error notifications stay up.
pub const ERROR_TIMEOUT: Duration = Duration::from_millis(8000);

const LOG_FILE: &str = "toarubar.log";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The default error handler.
///
/// Logs the error and shows it to the user as a host notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl<H: Host> ErrorHandler<H> for DefaultErrorHandler {
    fn call(&self, host: &mut H, context: &str, err: BarError) {
        error!(target: "bars", "{} error: {}", context, err);
        host.notify(&format!("[toarubar] {} error: {}", context, err), ERROR_COLOR, ERROR_TIMEOUT);
    }
}

/// Installs a global subscriber writing to `toarubar.log` in the cache directory.
///
/// The directory is `$XDG_CACHE_HOME/toarubar`, falling back to
/// `$HOME/.cache/toarubar` and then `/tmp/toarubar`, and is created if missing.
/// Fails without side effects if a global subscriber is already installed.
pub fn init_file_log() -> Result<PathBuf> {
    let dir = log_dir(env::var_os("XDG_CACHE_HOME"), env::var_os("HOME"));
    fs::create_dir_all(&dir)
        .map_err(|e| BarError::OtherError(format!("could not create {}: {}", dir.display(), e)))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_max_level(tracing::Level::TRACE)
        .try_init()
        .map_err(|e| BarError::OtherError(format!("could not install file log: {}", e)))?;

    let path = dir.join(LOG_FILE);
    info!(target: "bars", "logging to {}", path.display());
    Ok(path)
}

fn log_dir(xdg_cache: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);

    non_empty(xdg_cache)
        .or_else(|| non_empty(home).map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("toarubar")
}
