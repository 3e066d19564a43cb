// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External tool invocation with a hard deadline.
//
// Poppler and Tesseract run as child processes. A hung child is killed once
// its deadline passes so one bad page cannot stall the pipeline.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use faro_core::error::{FaroError, Result};
use tracing::{debug, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of a finished tool.
#[derive(Debug, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Run `command` to completion or until `deadline` elapses.
///
/// A non-zero exit status is reported as an extraction error carrying the
/// tool's stderr. Expiry kills the child and returns
/// [`FaroError::ToolTimeout`].
#[instrument(skip(command, deadline), fields(deadline_ms = deadline.as_millis() as u64))]
pub fn run_with_deadline(mut command: Command, tool: &str, deadline: Duration) -> Result<ToolOutput> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| FaroError::Extraction(format!("failed to spawn {tool}: {err}")))?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= deadline {
            warn!(tool, elapsed_ms = started.elapsed().as_millis() as u64, "Tool deadline exceeded, killing");
            // The child may have exited between try_wait and kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(FaroError::ToolTimeout {
                tool: tool.to_string(),
                seconds: deadline.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let output = ToolOutput {
        stdout: collect(stdout),
        stderr: collect(stderr),
    };

    if !status.success() {
        let detail = String::from_utf8_lossy(&output.stderr);
        return Err(FaroError::Extraction(format!(
            "{tool} exited with {status}: {}",
            detail.trim()
        )));
    }

    debug!(
        tool,
        stdout_len = output.stdout.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Tool finished"
    );
    Ok(output)
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
