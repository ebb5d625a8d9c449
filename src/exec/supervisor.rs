// src/exec/supervisor.rs

//! Running the mirroring tool under a deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{CopypastaError, Result};
use crate::exec::command::MirrorCommand;
use crate::exec::multiplex::{MultiplexReport, Multiplexer};
use crate::exec::state::SupervisorState;
use crate::progress::{DEFAULT_RENDER_INTERVAL, DEFAULT_TOTAL, ProgressTracker};
use crate::render::{OutputSink, Renderer};

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10 * 60);

/// How long readers may keep draining buffered output after a deadline kill.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited with status zero.
    Succeeded,
    /// The process exited unsuccessfully or could not be waited on.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    Failed { code: Option<i32>, detail: String },
    /// The deadline elapsed and the process was killed.
    TimedOut { after: Duration },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }

    /// Human-readable reason for a failure; empty for success.
    pub fn detail(&self) -> String {
        match self {
            RunOutcome::Succeeded => String::new(),
            RunOutcome::Failed { detail, .. } => detail.clone(),
            RunOutcome::TimedOut { after } => {
                format!("deadline of {after:?} exceeded; process killed")
            }
        }
    }

    /// Exit code for `copypasta` itself.
    ///
    /// The child's exit code is propagated when there is one; signals and
    /// timeouts map to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Succeeded => 0,
            RunOutcome::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            RunOutcome::Failed { .. } | RunOutcome::TimedOut { .. } => 1,
        }
    }

    fn terminal_state(&self) -> SupervisorState {
        match self {
            RunOutcome::Succeeded => SupervisorState::Succeeded,
            RunOutcome::Failed { .. } => SupervisorState::Failed,
            RunOutcome::TimedOut { .. } => SupervisorState::TimedOut,
        }
    }
}

/// Everything known about a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub streams: MultiplexReport,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct SupervisorOptions {
    pub deadline: Duration,
    pub drain_grace: Duration,
    pub progress_total: u64,
    pub progress_interval: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            drain_grace: DEFAULT_DRAIN_GRACE,
            progress_total: DEFAULT_TOTAL,
            progress_interval: DEFAULT_RENDER_INTERVAL,
        }
    }
}

/// Owns one invocation of the mirroring tool from launch to final status.
pub struct Supervisor {
    command: MirrorCommand,
    options: SupervisorOptions,
    renderer: Arc<Renderer>,
    sink: Arc<dyn OutputSink>,
    state: SupervisorState,
}

impl Supervisor {
    pub fn new(
        command: MirrorCommand,
        options: SupervisorOptions,
        renderer: Arc<Renderer>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            command,
            options,
            renderer,
            sink,
            state: SupervisorState::Idle,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Launch the process, drain its output and wait for it to exit.
    ///
    /// Once the process has started, a `Running command:` banner is rendered.
    /// Launch problems (spawn failure, missing pipes) are returned as errors
    /// without a status line. Every other ending is rendered as a
    /// success/failure line and returned in the [`RunReport`].
    pub async fn run(&mut self) -> Result<RunReport> {
        let started = Instant::now();
        let deadline = started.checked_add(self.options.deadline).ok_or_else(|| {
            CopypastaError::ConfigError(format!(
                "deadline of {:?} is too far in the future",
                self.options.deadline
            ))
        })?;

        self.transition(SupervisorState::Launching)?;
        info!(command = %self.command, "starting mirror process");

        let mut child = match self.command.to_command().spawn() {
            Ok(child) => child,
            Err(source) => {
                self.transition(SupervisorState::Failed)?;
                return Err(CopypastaError::LaunchError {
                    program: self.command.program.clone(),
                    source,
                });
            }
        };

        self.sink.line(&self.renderer.banner(&self.command));

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            (out, _) => {
                // Dropping `child` kills it.
                self.transition(SupervisorState::Failed)?;
                let which = if out.is_none() { "stdout" } else { "stderr" };
                return Err(CopypastaError::StreamUnavailable(which));
            }
        };

        self.transition(SupervisorState::Running)?;
        debug!(pid = ?child.id(), "mirror process running");

        let tracker = ProgressTracker::new(
            self.options.progress_total,
            self.options.progress_interval,
            std::time::Instant::now(),
        );
        let mut mux = Multiplexer::spawn(
            stdout,
            stderr,
            tracker,
            Arc::clone(&self.renderer),
            Arc::clone(&self.sink),
        );

        let mut streams = None;
        let waited = tokio::time::timeout_at(deadline, async {
            streams = Some(mux.wait().await);
            child.wait().await
        })
        .await;

        let outcome = match waited {
            Ok(Ok(status)) if status.success() => RunOutcome::Succeeded,
            Ok(Ok(status)) => RunOutcome::Failed {
                code: status.code(),
                detail: status.to_string(),
            },
            Ok(Err(e)) => RunOutcome::Failed {
                code: None,
                detail: format!("waiting for process: {e}"),
            },
            Err(_elapsed) => {
                warn!(
                    command = %self.command,
                    deadline = ?self.options.deadline,
                    "deadline elapsed; killing mirror process"
                );
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to kill mirror process");
                }
                if streams.is_none() {
                    streams = Some(self.drain_after_kill(&mut mux).await);
                }
                RunOutcome::TimedOut {
                    after: self.options.deadline,
                }
            }
        };

        self.transition(outcome.terminal_state())?;

        let streams = streams.unwrap_or_default();
        let elapsed = started.elapsed();
        info!(
            success = outcome.is_success(),
            exit_code = outcome.exit_code(),
            downloads = streams.downloads(),
            stdout_lines = streams.stdout.lines,
            stderr_lines = streams.stderr.lines,
            elapsed = ?elapsed,
            "mirror process finished"
        );

        self.sink.line(&self.renderer.outcome(&outcome));

        Ok(RunReport {
            outcome,
            streams,
            elapsed,
        })
    }

    async fn drain_after_kill(&self, mux: &mut Multiplexer) -> MultiplexReport {
        let drained = tokio::time::timeout(self.options.drain_grace, mux.wait()).await;
        match drained {
            Ok(report) => report,
            Err(_) => {
                warn!(
                    grace = ?self.options.drain_grace,
                    "output streams still open after kill; aborting readers"
                );
                mux.abort()
            }
        }
    }

    fn transition(&mut self, next: SupervisorState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CopypastaError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "supervisor state change");
        self.state = next;
        Ok(())
    }
}
