//! Send-operation state machine with thread-safe transitions.
//!
//! Enforces valid state transitions for one send operation:
//! - Idle -> ExtractingAttachments (send with attachments)
//! - Idle -> AwaitingResponse (send without attachments)
//! - ExtractingAttachments -> AwaitingResponse (all extractions succeeded)
//! - ExtractingAttachments -> Idle (extraction failed, send aborted)
//! - AwaitingResponse -> Idle (reply or synthesized error appended)
//!
//! Terminal state is always Idle; every entry into a non-idle state has
//! exactly one exit path back.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::ChatError;

/// Phase of the current send operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendPhase {
    /// No send in progress. Ready for input.
    Idle,
    /// Concurrently extracting text from the pending attachments.
    ExtractingAttachments,
    /// Waiting for the remote assistant to answer.
    AwaitingResponse,
}

impl fmt::Display for SendPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendPhase::Idle => write!(f, "Idle"),
            SendPhase::ExtractingAttachments => write!(f, "ExtractingAttachments"),
            SendPhase::AwaitingResponse => write!(f, "AwaitingResponse"),
        }
    }
}

impl SendPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SendPhase) -> bool {
        matches!(
            (self, target),
            (SendPhase::Idle, SendPhase::ExtractingAttachments)
                | (SendPhase::Idle, SendPhase::AwaitingResponse)
                | (SendPhase::ExtractingAttachments, SendPhase::AwaitingResponse)
                // Abort and completion transitions
                | (SendPhase::ExtractingAttachments, SendPhase::Idle)
                | (SendPhase::AwaitingResponse, SendPhase::Idle)
        )
    }
}

/// Thread-safe state machine for send-phase transitions.
///
/// All transitions are validated before being applied. An invalid transition
/// request doubles as the in-flight guard: starting a send while one is
/// already running is rejected here.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Arc<Mutex<SendPhase>>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    /// Create a new machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            phase: Arc::new(Mutex::new(SendPhase::Idle)),
        }
    }

    /// Returns the current phase.
    pub fn current(&self) -> SendPhase {
        *self.phase.lock().expect("phase mutex poisoned")
    }

    /// Attempt to transition to the target phase.
    pub fn transition(&self, target: SendPhase) -> Result<(), ChatError> {
        let mut phase = self.phase.lock().expect("phase mutex poisoned");
        if phase.can_transition_to(&target) {
            tracing::debug!("Send phase: {} -> {}", *phase, target);
            *phase = target;
            Ok(())
        } else {
            Err(ChatError::State(format!(
                "invalid phase transition: {} -> {}",
                *phase, target
            )))
        }
    }

    /// Force the machine back to Idle. Used on every send exit so no error
    /// path can leave the loading indicator stuck.
    pub fn reset(&self) {
        let mut phase = self.phase.lock().expect("phase mutex poisoned");
        if *phase != SendPhase::Idle {
            tracing::debug!("Send phase reset to Idle from {}", *phase);
        }
        *phase = SendPhase::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
