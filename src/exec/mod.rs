// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the mirroring tool with `tokio::process::Command` and
//! turns its output into rendered lines.
//!
//! - [`command`] builds the invocation from the URL and settings.
//! - [`multiplex`] drains stdout and stderr concurrently.
//! - [`supervisor`] launches the process under a deadline and reports the
//!   final outcome.
//! - [`state`] is the supervisor lifecycle.

pub mod command;
pub mod multiplex;
pub mod state;
pub mod supervisor;

pub use command::{DEFAULT_PROGRAM, MirrorCommand, MirrorMode};
pub use multiplex::{MultiplexReport, Multiplexer, StreamSummary, multiplex};
pub use state::SupervisorState;
pub use supervisor::{RunOutcome, RunReport, Supervisor, SupervisorOptions};
