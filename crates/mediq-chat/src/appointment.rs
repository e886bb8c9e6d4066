//! Appointment booking flow with validated transitions.
//!
//! Enforces the allowed state transitions for the booking sub-machine:
//! Closed -> Open -> Confirmed -> Closed

use serde::{Deserialize, Serialize};

use mediq_core::types::AppointmentRequest;

use crate::error::ChatError;

/// State of the booking flow within one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentState {
    /// No booking in progress.
    #[default]
    Closed,
    /// The appointment-entry form is open, waiting for a confirm action.
    /// Stays open until confirmed or the session ends; no expiry.
    Open,
    /// A `{date, time}` pair was accepted. Transient: the flow returns to
    /// `Closed` within the same confirm call.
    Confirmed,
}

impl std::fmt::Display for AppointmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentState::Closed => "closed",
            AppointmentState::Open => "open",
            AppointmentState::Confirmed => "confirmed",
        };
        f.write_str(s)
    }
}

/// Validate that a booking state transition is allowed.
///
/// Valid transitions:
/// - Closed -> Open
/// - Open -> Confirmed
/// - Confirmed -> Closed
pub fn validate_transition(
    from: AppointmentState,
    to: AppointmentState,
) -> Result<(), ChatError> {
    let valid = matches!(
        (from, to),
        (AppointmentState::Closed, AppointmentState::Open)
            | (AppointmentState::Open, AppointmentState::Confirmed)
            | (AppointmentState::Confirmed, AppointmentState::Closed)
    );

    if valid {
        Ok(())
    } else {
        Err(ChatError::InvalidTransition(from, to))
    }
}

/// The booking sub-state-machine for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFlow {
    state: AppointmentState,
}

impl AppointmentFlow {
    /// Create a flow in the `Closed` state.
    pub fn new() -> Self {
        Self {
            state: AppointmentState::Closed,
        }
    }

    /// Current state.
    pub fn state(&self) -> AppointmentState {
        self.state
    }

    /// Whether the appointment-entry form is open.
    pub fn is_open(&self) -> bool {
        self.state == AppointmentState::Open
    }

    /// Open the booking form.
    ///
    /// Opening an already-open flow is a no-op, so repeated booking intents
    /// within one session do not error.
    pub fn open(&mut self) {
        if self.state == AppointmentState::Closed {
            self.state = AppointmentState::Open;
        }
    }

    /// Confirm a booking with the given `{date, time}` pair.
    ///
    /// Valid only while `Open`. Drives the flow through `Confirmed` back to
    /// `Closed` and returns the confirmation message for the transcript.
    pub fn confirm(&mut self, request: &AppointmentRequest) -> Result<String, ChatError> {
        validate_transition(self.state, AppointmentState::Confirmed)?;
        self.state = AppointmentState::Confirmed;

        let message = request.confirmation_message();

        validate_transition(self.state, AppointmentState::Closed)?;
        self.state = AppointmentState::Closed;

        Ok(message)
    }
}

// =============================================================================
// Tests
// =============================================================================
