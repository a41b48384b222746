//! Bounded execution of external extraction tools

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Longest a single tool invocation may run
pub(crate) const TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs `command` and returns its stdout if it exits successfully in time
///
/// Output pipes are drained on background threads while waiting, so a
/// chatty tool cannot block on a full pipe. A tool that is missing, fails,
/// or outlives `timeout` (it is killed) yields `None` and a warning.
pub(crate) fn run_with_timeout(mut command: Command, timeout: Duration) -> Option<Vec<u8>> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = match command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("Could not run {}: {}", program, e);
            return None;
        }
    };

    let stdout = child.stdout.take().map(|pipe| thread::spawn(move || drain(pipe)));
    let stderr = child.stderr.take().map(|pipe| thread::spawn(move || drain(pipe)));

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => Some(status),
        Ok(None) => {
            tracing::warn!("{} timed out after {}s", program, timeout.as_secs_f64());
            None
        }
        Err(e) => {
            tracing::warn!("Failed to wait for {}: {}", program, e);
            None
        }
    };

    if status.is_none() {
        let _ = child.kill();
        let _ = child.wait();
    }

    // Pipes close once the process is gone
    let stdout = collect(stdout);
    let stderr = collect(stderr);

    let status = status?;
    if !status.success() {
        tracing::warn!(
            "{} failed ({}): {}",
            program,
            status,
            String::from_utf8_lossy(&stderr).trim()
        );
        return None;
    }

    Some(stdout)
}

fn drain(mut pipe: impl Read) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    buf
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
