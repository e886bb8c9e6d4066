use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The coarse category assigned to a user message.
///
/// Determines which response strategy applies. The tag set is closed; the
/// `Symptom` variant carries the keyword that matched so the resolver can
/// look up the corresponding advisory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Booking-related message; routes to the appointment flow.
    Appointment,
    /// A recognized symptom keyword; routes to a canned safety advisory.
    Symptom(String),
    /// Anything else; routes to the generation backend.
    General,
}

/// Quick-action buttons surfaced next to the input box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Fever,
    Cough,
    Cold,
    Pain,
    BookAppointment,
}

impl QuickAction {
    /// The display label of this action.
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Fever => "Fever",
            QuickAction::Cough => "Cough",
            QuickAction::Cold => "Cold",
            QuickAction::Pain => "Pain",
            QuickAction::BookAppointment => "Book Appointment",
        }
    }

    /// Look up an action by its display label, case-insensitively.
    pub fn from_label(label: &str) -> Option<QuickAction> {
        const ALL: [QuickAction; 5] = [
            QuickAction::Fever,
            QuickAction::Cough,
            QuickAction::Cold,
            QuickAction::Pain,
            QuickAction::BookAppointment,
        ];
        ALL.into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(label.trim()))
    }
}

// =============================================================================
// Structs
// =============================================================================

/// Outcome of resolving one intent.
///
/// The appointment-form signal is part of the result rather than a hidden
/// side effect, so callers decide what to do with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The reply text to surface.
    pub reply: String,
    /// Whether the caller should surface the appointment-entry form.
    pub open_appointment_form: bool,
}

/// Result of one engine operation as seen by the UI collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReply {
    /// The assistant reply produced for this turn.
    pub reply: String,
    /// Whether this turn opened the appointment flow.
    pub appointment_opened: bool,
}

// =============================================================================
// Tests
// =============================================================================
