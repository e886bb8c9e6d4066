use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The author of a transcript turn.
///
/// Serializes as `"User"` / `"Assistant"`, the role labels used in the
/// on-disk transcript format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A message typed (or quick-selected) by the person in the session.
    User,
    /// A reply produced by the engine.
    Assistant,
}

impl Role {
    /// Returns the canonical wire label for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    /// Parse a wire label back into a role.
    ///
    /// Accepts the labels case-insensitively; anything else is `None`.
    pub fn parse(label: &str) -> Option<Role> {
        if label.eq_ignore_ascii_case("user") {
            Some(Role::User)
        } else if label.eq_ignore_ascii_case("assistant") {
            Some(Role::Assistant)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Structs
// =============================================================================

/// One conversational entry: a role-tagged message.
///
/// Turns are immutable once appended to a transcript; ordering is insertion
/// order and is never reordered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored the turn.
    pub role: Role,
    /// Message text. Assistant turns may be empty only when the generation
    /// backend failed and the fallback itself could not be produced.
    pub text: String,
}

impl Turn {
    /// Construct a turn.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// An ephemeral booking request: a date and a time of day.
///
/// Produced only when the user confirms the booking prompt; rendered into a
/// single confirmation turn and never persisted on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    /// Calendar date of the appointment.
    pub date: NaiveDate,
    /// Time of day of the appointment.
    pub time: NaiveTime,
}

impl AppointmentRequest {
    /// Construct a request.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Render the confirmation message appended to the transcript.
    pub fn confirmation_message(&self) -> String {
        format!(
            "Appointment confirmed on {} at {}.",
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M")
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
