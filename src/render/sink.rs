// src/render/sink.rs

//! Where rendered output goes.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::StyledLine;

/// Destination for rendered lines and progress frames.
///
/// Both stream readers write through the same sink concurrently, so
/// implementations must be `Send + Sync` and must emit a whole line at once.
pub trait OutputSink: Send + Sync {
    /// Write one complete line.
    fn line(&self, line: &StyledLine);

    /// Overwrite the in-place progress line with `frame`.
    ///
    /// Frames start with `\r` and carry no newline.
    fn progress(&self, frame: &str);
}

/// Writes painted output to the process' stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    /// A progress frame is on screen and the cursor sits at its end.
    bar_open: AtomicBool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_line(&self, out: &mut impl Write, line: &StyledLine) -> std::io::Result<()> {
        if self.bar_open.swap(false, Ordering::SeqCst) {
            writeln!(out)?;
        }
        writeln!(out, "{}", line.paint())
    }
}

impl OutputSink for ConsoleSink {
    fn line(&self, line: &StyledLine) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = self.write_line(&mut out, line) {
            debug!(error = %e, "failed to write output line");
        }
    }

    fn progress(&self, frame: &str) {
        let mut out = std::io::stdout().lock();
        let res = write!(out, "{frame}").and_then(|_| out.flush());
        match res {
            Ok(()) => self.bar_open.store(true, Ordering::SeqCst),
            Err(e) => debug!(error = %e, "failed to write progress frame"),
        }
    }
}
