//! Per-session conversational state.
//!
//! A session owns its transcript and booking flow exclusively. Distinct
//! sessions share nothing and may run in parallel.

use chrono::Local;
use uuid::Uuid;

use mediq_storage::TranscriptStore;

use crate::appointment::AppointmentFlow;

/// Process-scoped mutable state for one conversation session.
///
/// Explicitly constructed and passed to every engine operation; there is no
/// process-wide singleton. Created empty at session start and destroyed
/// with the session (the transcript may be persisted externally first).
#[derive(Debug)]
pub struct SessionContext {
    /// Session identifier.
    pub id: Uuid,
    /// Epoch seconds at session creation.
    pub started_at: i64,
    /// The ordered turn log, owned exclusively by this session.
    pub transcript: TranscriptStore,
    /// Booking flow state; reset with the session.
    pub appointment: AppointmentFlow,
}

impl SessionContext {
    /// Create a fresh session with an empty transcript and a closed
    /// booking flow.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            transcript: TranscriptStore::new(),
            appointment: AppointmentFlow::new(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
