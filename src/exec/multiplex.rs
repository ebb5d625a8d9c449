// src/exec/multiplex.rs

//! Concurrent draining of a child's stdout and stderr.
//!
//! One Tokio task per stream reads lines, classifies them and writes the
//! rendered result to the shared [`OutputSink`]. Each stream keeps its own
//! line order; there is no ordering between the two streams.
//!
//! Only the stdout reader drives progress: the [`ProgressTracker`] is moved
//! into that task and handed back in its report, so no other task can touch
//! it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, warn};

use crate::classify::{StreamSource, classify};
use crate::progress::ProgressTracker;
use crate::render::{OutputSink, Renderer};

/// What one reader saw before its stream ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub lines: u64,
    pub downloads: u64,
}

/// Combined result once both readers are done, or were aborted.
#[derive(Debug, Clone, Default)]
pub struct MultiplexReport {
    pub stdout: StreamSummary,
    pub stderr: StreamSummary,
    /// Final tracker state; `None` if the stdout reader did not finish.
    pub progress: Option<ProgressTracker>,
}

impl MultiplexReport {
    /// Raw number of progress increments.
    ///
    /// Falls back to the stdout line count when the reader was aborted and
    /// its tracker was lost.
    pub fn downloads(&self) -> u64 {
        self.progress
            .as_ref()
            .map_or(self.stdout.downloads, ProgressTracker::current)
    }
}

/// Counters a reader bumps as it goes, readable after it is aborted.
#[derive(Debug, Default)]
struct LiveCounts {
    lines: AtomicU64,
    downloads: AtomicU64,
}

impl LiveCounts {
    fn summary(&self) -> StreamSummary {
        StreamSummary {
            lines: self.lines.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
        }
    }
}

/// Handle to the running readers.
pub struct Multiplexer {
    joined: JoinHandle<MultiplexReport>,
    readers: [AbortHandle; 2],
    counts: [Arc<LiveCounts>; 2],
}

impl Multiplexer {
    /// Spawn both readers on the current Tokio runtime.
    pub fn spawn<O, E>(
        stdout: O,
        stderr: E,
        tracker: ProgressTracker,
        renderer: Arc<Renderer>,
        sink: Arc<dyn OutputSink>,
    ) -> Self
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        let counts: [Arc<LiveCounts>; 2] = Default::default();

        let out_task = tokio::spawn(read_stream(
            stdout,
            StreamSource::Stdout,
            Some(tracker),
            Arc::clone(&counts[0]),
            Arc::clone(&renderer),
            Arc::clone(&sink),
        ));
        let err_task = tokio::spawn(read_stream(
            stderr,
            StreamSource::Stderr,
            None,
            Arc::clone(&counts[1]),
            renderer,
            sink,
        ));
        let readers = [out_task.abort_handle(), err_task.abort_handle()];

        let [out_counts, err_counts] = counts.clone();
        let joined = tokio::spawn(async move {
            let (out, err) = tokio::join!(out_task, err_task);
            let mut report = MultiplexReport {
                stdout: out_counts.summary(),
                stderr: err_counts.summary(),
                progress: None,
            };
            match out {
                Ok(tracker) => report.progress = tracker,
                Err(e) => error!(error = %e, "stdout reader task failed"),
            }
            if let Err(e) = err {
                error!(error = %e, "stderr reader task failed");
            }
            report
        });

        Self {
            joined,
            readers,
            counts,
        }
    }

    /// Wait until both streams have reached end-of-stream.
    ///
    /// Must not be called again once it has returned.
    pub async fn wait(&mut self) -> MultiplexReport {
        match (&mut self.joined).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "stream multiplexer task failed");
                MultiplexReport::default()
            }
        }
    }

    /// Stop both readers, discarding unread output.
    ///
    /// The returned report holds everything counted before the abort; its
    /// tracker is gone, so `progress` is `None`.
    pub fn abort(&self) -> MultiplexReport {
        for reader in &self.readers {
            reader.abort();
        }
        self.joined.abort();
        MultiplexReport {
            stdout: self.counts[0].summary(),
            stderr: self.counts[1].summary(),
            progress: None,
        }
    }
}

/// Convenience: spawn both readers and wait for them.
pub async fn multiplex<O, E>(
    stdout: O,
    stderr: E,
    tracker: ProgressTracker,
    renderer: Arc<Renderer>,
    sink: Arc<dyn OutputSink>,
) -> MultiplexReport
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
{
    let mut mux = Multiplexer::spawn(stdout, stderr, tracker, renderer, sink);
    mux.wait().await
}

async fn read_stream<R>(
    stream: R,
    source: StreamSource,
    mut tracker: Option<ProgressTracker>,
    counts: Arc<LiveCounts>,
    renderer: Arc<Renderer>,
    sink: Arc<dyn OutputSink>,
) -> Option<ProgressTracker>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(stream = %source, error = %e, "read error; stopping reader");
                break;
            }
        }

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        let classified = classify(&line, source);
        counts.lines.fetch_add(1, Ordering::Relaxed);

        sink.line(&renderer.line(&classified));

        if classified.is_download() {
            counts.downloads.fetch_add(1, Ordering::Relaxed);
            if let Some(tracker) = tracker.as_mut() {
                tracker.increment();
                if let Some(frame) = tracker.maybe_emit(Instant::now()) {
                    sink.progress(&frame);
                }
            }
        }
    }

    let summary = counts.summary();
    debug!(
        stream = %source,
        lines = summary.lines,
        downloads = summary.downloads,
        "stream reader reached end of stream"
    );
    tracker
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings_are_stripped_once() {
        assert_eq!(trim_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc"), b"abc");
        assert_eq!(trim_line_ending(b"abc\n\n"), b"abc\n");
    }
}
