// src/progress.rs

//! Heuristic download progress.
//!
//! The mirroring tool never announces how many resources it is going to
//! fetch, so the percentage is computed against a fixed nominal `total`
//! (100 by default). It is an estimate of "percent of expected downloads",
//! not a measured fraction: it can exceed 100%, and reaching 100% does not
//! mean the run is complete. [`ProgressTracker::current`] exposes the raw
//! count for callers that prefer not to show a percentage.
//!
//! The tracker is a plain value with no interior locking. It is owned by the
//! stdout reader task, which is the only writer.

use std::time::{Duration, Instant};

pub const DEFAULT_TOTAL: u64 = 100;
pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(500);
pub const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    current: u64,
    interval: Duration,
    last_emit: Instant,
}

impl ProgressTracker {
    /// Create a tracker whose rate-limit window starts at `now`.
    ///
    /// `total` is clamped to at least 1.
    pub fn new(total: u64, interval: Duration, now: Instant) -> Self {
        Self {
            total: total.max(1),
            current: 0,
            interval,
            last_emit: now,
        }
    }

    /// Record one completed unit. There is no upper clamp.
    pub fn increment(&mut self) {
        self.current += 1;
    }

    /// Return a frame if more than `interval` has passed since the last one.
    pub fn maybe_emit(&mut self, now: Instant) -> Option<String> {
        if now.saturating_duration_since(self.last_emit) > self.interval {
            self.last_emit = now;
            Some(self.frame())
        } else {
            None
        }
    }

    /// Unclamped percentage of `total`.
    pub fn percent(&self) -> f64 {
        self.current as f64 / self.total as f64 * 100.0
    }

    /// In-place progress line, starting with `\r` and without a newline.
    pub fn frame(&self) -> String {
        let percent = self.percent();
        let filled = ((percent / 5.0).floor() as usize).min(BAR_WIDTH);
        format!(
            "\rProgress: [{:<width$}] {:.2}%",
            "=".repeat(filled),
            percent,
            width = BAR_WIDTH
        )
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
