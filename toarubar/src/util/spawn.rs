//! Utilities for running external commands.

use std::ffi::OsStr;
use std::io;
use std::process::{Command, Stdio};

use tracing::{instrument, debug};

/// Runs `command` through `sh -c`, waits for it, and returns its standard output.
///
/// A single trailing newline is removed from the output. Output that is not
/// valid UTF-8 is converted lossily. The exit status is not checked: a command
/// that fails but prints something still produces a value.
///
/// This blocks until the command exits, so it must only be used while
/// configuration is being parsed.
#[instrument(level = "trace")]
pub fn capture_output<S>(command: S) -> io::Result<String>
where
    S: AsRef<OsStr> + std::fmt::Debug,
{
    let output = Command::new("sh")
        .arg("-c")
        .arg(command.as_ref())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;

    let mut out = String::from_utf8_lossy(&output.stdout).into_owned();
    if out.ends_with('\n') {
        out.pop();
    }

    debug!(target: "spawn", "command exited with {}, captured {} bytes", output.status, out.len());
    Ok(out)
}
