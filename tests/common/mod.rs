#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use copypasta::progress::{DEFAULT_RENDER_INTERVAL, DEFAULT_TOTAL, ProgressTracker};
use copypasta::render::{MemorySink, OutputSink, Renderer};

pub use copypasta_test_utils::init_tracing;

/// Default renderer plus a recording sink, ready to hand to the multiplexer.
pub fn capture() -> (Arc<Renderer>, Arc<dyn OutputSink>, MemorySink) {
    let sink = MemorySink::new();
    let out: Arc<dyn OutputSink> = Arc::new(sink.clone());
    (Arc::new(Renderer::default()), out, sink)
}

pub fn fresh_tracker() -> ProgressTracker {
    ProgressTracker::new(DEFAULT_TOTAL, DEFAULT_RENDER_INTERVAL, Instant::now())
}
