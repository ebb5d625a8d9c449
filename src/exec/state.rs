// src/exec/state.rs

//! Supervisor lifecycle.
//!
//! ```text
//! Idle -> Launching -> Running -> Succeeded
//!             |           |  \--> Failed
//!             v           \----> TimedOut
//!           Failed
//! ```
//!
//! Terminal states have no outgoing transitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Launching,
    Running,
    Succeeded,
    Failed,
    TimedOut,
}

impl SupervisorState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SupervisorState::Succeeded | SupervisorState::Failed | SupervisorState::TimedOut
        )
    }

    pub fn can_transition_to(self, next: SupervisorState) -> bool {
        use SupervisorState::*;
        matches!(
            (self, next),
            (Idle, Launching)
                | (Launching, Running)
                | (Launching, Failed)
                | (Running, Succeeded)
                | (Running, Failed)
                | (Running, TimedOut)
        )
    }
}
