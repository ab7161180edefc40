use std::fmt;

use crate::shared::options::RunOptions;

/// Where a session is in its capture loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
    Detecting,
    Processing,
    Presenting,
    Stopped,
}

impl SessionState {
    /// `Stopped` is reachable from every live state; otherwise the loop
    /// only moves forward through one frame and back to `Capturing`.
    pub fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Capturing)
                | (Capturing, Detecting)
                | (Detecting, Processing)
                | (Processing, Presenting)
                | (Presenting, Capturing)
                | (Idle | Capturing | Detecting | Processing | Presenting, Stopped)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-run context handed to each stage: the options, the loop state and
/// the counter that numbers recorded frames.
///
/// A fresh session starts at `Idle` with the counter at zero.
#[derive(Debug)]
pub struct TrifaceSession {
    options: RunOptions,
    state: SessionState,
    next_frame: u64,
}

impl TrifaceSession {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
            next_frame: 0,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == SessionState::Stopped
    }

    pub fn advance(&mut self, next: SessionState) -> Result<(), Box<dyn std::error::Error>> {
        if !self.state.can_advance_to(next) {
            return Err(format!("invalid session transition {} -> {next}", self.state).into());
        }
        log::trace!("session {} -> {next}", self.state);
        self.state = next;
        Ok(())
    }

    /// Hands out 0, 1, 2, ... for naming recorded frames.
    pub fn next_frame_number(&mut self) -> u64 {
        let n = self.next_frame;
        self.next_frame += 1;
        n
    }

    pub fn frames_numbered(&self) -> u64 {
        self.next_frame
    }
}
