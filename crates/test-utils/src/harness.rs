use std::sync::Arc;

use copypasta::errors::Result;
use copypasta::exec::{MirrorCommand, RunReport, SupervisorOptions};
use copypasta::render::{MemorySink, OutputSink, Renderer};
use copypasta::run_mirror;

/// Run `command` under a supervisor that renders into a [`MemorySink`].
pub async fn run_captured(
    command: MirrorCommand,
    options: SupervisorOptions,
) -> (Result<RunReport>, MemorySink) {
    let sink = MemorySink::new();
    let out: Arc<dyn OutputSink> = Arc::new(sink.clone());
    let result = run_mirror(command, options, Arc::new(Renderer::default()), out).await;
    (result, sink)
}
