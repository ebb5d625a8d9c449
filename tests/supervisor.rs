// tests/supervisor.rs
#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::sync::Arc;
use std::time::Duration;

use copypasta::errors::CopypastaError;
use copypasta::exec::{
    MirrorCommand, RunOutcome, Supervisor, SupervisorOptions, SupervisorState,
};
use copypasta::render::{MemorySink, OutputSink, Renderer};
use copypasta_test_utils::builders::{quick_options, sh};
use copypasta_test_utils::harness::run_captured;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test]
async fn successful_run_renders_both_streams_and_success_message() -> TestResult {
    init_tracing();

    let script = r#"
echo "Downloaded: index.html"
echo "Saving to: ./index.html"
echo "Resolving example.com" >&2
echo "Downloaded: style.css"
"#;
    let (result, sink) = run_captured(sh(script), quick_options(Duration::from_secs(10))).await;
    let report = result?;

    assert_eq!(report.outcome, RunOutcome::Succeeded);
    assert_eq!(report.outcome.exit_code(), 0);
    assert_eq!(report.streams.downloads(), 2);
    assert_eq!(report.streams.stdout.lines, 3);
    assert_eq!(report.streams.stderr.lines, 1);

    let lines = sink.lines();
    let stdout_lines: Vec<_> = lines
        .iter()
        .filter(|l| l.starts_with("Downloaded") || l.starts_with("Saving"))
        .cloned()
        .collect();
    assert_eq!(
        stdout_lines,
        vec![
            "Downloaded: index.html",
            "Saving to: ./index.html",
            "Downloaded: style.css",
        ]
    );
    assert!(lines.contains(&"Resolving example.com".to_string()));
    assert!(
        lines[0].starts_with("Running command: sh -c "),
        "got {:?}",
        lines[0]
    );
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Download completed successfully!")
    );
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_and_propagated() -> TestResult {
    init_tracing();

    let script = r#"echo "Connecting to example.com" >&2; exit 8"#;
    let (result, sink) = run_captured(sh(script), quick_options(Duration::from_secs(10))).await;
    let report = result?;

    match &report.outcome {
        RunOutcome::Failed { code, detail } => {
            assert_eq!(*code, Some(8));
            assert!(detail.contains('8'), "detail was {detail:?}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(report.outcome.exit_code(), 8);

    let last = sink.lines().pop().unwrap_or_default();
    assert!(last.starts_with("Command finished with error: "), "got {last:?}");
    Ok(())
}

#[tokio::test]
async fn deadline_kills_a_process_that_never_exits() -> TestResult {
    init_tracing();

    let deadline = Duration::from_millis(300);
    let script = r#"echo "Downloaded: first.html"; exec sleep 30"#;
    let (result, sink) = run_captured(sh(script), quick_options(deadline)).await;
    let report = result?;

    assert_eq!(report.outcome, RunOutcome::TimedOut { after: deadline });
    assert!(!report.outcome.is_success());
    assert_eq!(report.outcome.exit_code(), 1);
    assert!(report.elapsed < Duration::from_secs(10));

    let lines = sink.lines();
    assert!(lines.contains(&"Downloaded: first.html".to_string()));
    let last = lines.last().cloned().unwrap_or_default();
    assert!(last.starts_with("Command finished with error: deadline"), "got {last:?}");
    Ok(())
}

#[tokio::test]
async fn deadline_with_grandchild_holding_pipes_still_returns() -> TestResult {
    init_tracing();

    // The background `sleep` inherits stdout and outlives the killed shell.
    let script = r#"echo "Downloaded: first.html"; sleep 30 & sleep 30"#;
    let options = SupervisorOptions {
        deadline: Duration::from_millis(200),
        drain_grace: Duration::from_millis(200),
        ..SupervisorOptions::default()
    };
    let (result, _sink) = run_captured(sh(script), options).await;
    let report = result?;

    assert!(matches!(report.outcome, RunOutcome::TimedOut { .. }));
    assert!(report.elapsed < Duration::from_secs(10));
    // Readers were aborted, but what they already counted survives.
    assert!(report.streams.progress.is_none());
    assert_eq!(report.streams.downloads(), 1);
    assert_eq!(report.streams.stdout.lines, 1);
    Ok(())
}

#[tokio::test]
async fn deadline_beyond_the_clock_is_a_config_error() {
    init_tracing();

    let options = SupervisorOptions {
        deadline: Duration::MAX,
        ..quick_options(Duration::from_secs(1))
    };
    let sink = MemorySink::new();
    let out: Arc<dyn OutputSink> = Arc::new(sink.clone());
    let mut supervisor = Supervisor::new(sh("true"), options, Arc::new(Renderer::default()), out);

    match supervisor.run().await {
        Err(CopypastaError::ConfigError(msg)) => assert!(msg.contains("deadline"), "got {msg:?}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    assert_eq!(supervisor.state(), SupervisorState::Idle);
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn missing_program_is_a_launch_error() {
    init_tracing();

    let sink = MemorySink::new();
    let out: Arc<dyn OutputSink> = Arc::new(sink.clone());
    let command = MirrorCommand::new("copypasta-no-such-program", vec![]);
    let mut supervisor = Supervisor::new(
        command,
        SupervisorOptions::default(),
        Arc::new(Renderer::default()),
        out,
    );

    match supervisor.run().await {
        Err(CopypastaError::LaunchError { program, .. }) => {
            assert_eq!(program, "copypasta-no-such-program");
        }
        other => panic!("expected LaunchError, got {other:?}"),
    }
    assert_eq!(supervisor.state(), SupervisorState::Failed);
    assert!(sink.events().is_empty(), "launch errors render nothing");
}

#[tokio::test]
async fn supervisor_runs_only_once() -> TestResult {
    init_tracing();

    let sink = MemorySink::new();
    let out: Arc<dyn OutputSink> = Arc::new(sink);
    let mut supervisor = Supervisor::new(
        sh("true"),
        quick_options(Duration::from_secs(10)),
        Arc::new(Renderer::default()),
        out,
    );

    let report = supervisor.run().await?;
    assert!(report.outcome.is_success());
    assert_eq!(supervisor.state(), SupervisorState::Succeeded);

    match supervisor.run().await {
        Err(CopypastaError::InvalidTransition { from, to }) => {
            assert_eq!(from, SupervisorState::Succeeded);
            assert_eq!(to, SupervisorState::Launching);
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
    Ok(())
}
