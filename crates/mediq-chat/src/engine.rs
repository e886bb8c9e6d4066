//! Conversation engine: central coordinator wiring classifier, resolver,
//! and the per-session transcript.
//!
//! Each user action is handled to completion (classify -> resolve ->
//! append) before the next action is accepted for that session. Sessions
//! are independent values and may execute in parallel.

use std::sync::Arc;

use tracing::debug;

use mediq_core::config::{ChatConfig, MediqConfig};
use mediq_core::types::{AppointmentRequest, Role, Turn};

use crate::backend::GenerationBackend;
use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::resolver::ResponseResolver;
use crate::session::SessionContext;
use crate::types::{EngineReply, QuickAction};

/// Notice returned when a quick action opens the booking panel directly.
pub const OPEN_PANEL_NOTICE: &str = "Appointment panel is open.";

/// Central conversation engine.
///
/// Holds the stateless parts (classifier, resolver, limits); all mutable
/// per-session state lives in the [`SessionContext`] passed to each
/// operation.
pub struct ConversationEngine {
    classifier: IntentClassifier,
    resolver: ResponseResolver,
    config: ChatConfig,
}

impl ConversationEngine {
    /// Create an engine from configuration and a generation backend.
    pub fn new(config: &MediqConfig, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            classifier: IntentClassifier::new(&config.classifier),
            resolver: ResponseResolver::new(backend, config.generation.clone()),
            config: config.chat.clone(),
        }
    }

    /// Handle one submitted message.
    ///
    /// Blank input appends nothing and surfaces [`ChatError::EmptyInput`]
    /// so the caller can ask the user to re-enter. Otherwise the user turn
    /// and the resolved assistant turn are appended, in that order, and the
    /// reply is returned together with the appointment-form signal.
    pub async fn submit_message(
        &self,
        session: &mut SessionContext,
        text: &str,
    ) -> Result<EngineReply, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if trimmed.chars().count() > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong(self.config.max_message_chars));
        }

        let intent = self.classifier.classify(trimmed);
        debug!(session = %session.id, ?intent, "Message classified");

        let resolution = self.resolver.resolve(&intent, trimmed).await;
        if resolution.open_appointment_form {
            session.appointment.open();
        }

        session.transcript.append(Role::User, trimmed)?;
        session
            .transcript
            .append(Role::Assistant, resolution.reply.clone())?;

        Ok(EngineReply {
            reply: resolution.reply,
            appointment_opened: resolution.open_appointment_form,
        })
    }

    /// Handle a quick-action button press.
    ///
    /// `Book Appointment` opens the booking panel without touching the
    /// transcript; symptom labels behave like a submitted message of that
    /// word.
    pub async fn select_quick_action(
        &self,
        session: &mut SessionContext,
        label: &str,
    ) -> Result<EngineReply, ChatError> {
        let action = QuickAction::from_label(label)
            .ok_or_else(|| ChatError::UnknownQuickAction(label.to_string()))?;

        match action {
            QuickAction::BookAppointment => {
                session.appointment.open();
                Ok(EngineReply {
                    reply: OPEN_PANEL_NOTICE.to_string(),
                    appointment_opened: true,
                })
            }
            _ => self.submit_message(session, action.label()).await,
        }
    }

    /// Explicitly open the booking panel.
    pub fn open_appointment(&self, session: &mut SessionContext) {
        session.appointment.open();
    }

    /// Confirm a booking.
    ///
    /// Appends exactly one Assistant confirmation turn and returns the
    /// booking flow to `Closed`.
    pub fn confirm_appointment(
        &self,
        session: &mut SessionContext,
        request: AppointmentRequest,
    ) -> Result<String, ChatError> {
        let message = session.appointment.confirm(&request)?;
        session.transcript.append(Role::Assistant, message.clone())?;
        Ok(message)
    }

    /// Read-only view of the last `n` turns, for rendering.
    pub fn transcript_view<'a>(&self, session: &'a SessionContext, n: usize) -> &'a [Turn] {
        session.transcript.recent(n)
    }

    /// Read-only view of the trailing summary window.
    pub fn transcript_summary<'a>(&self, session: &'a SessionContext) -> &'a [Turn] {
        session.transcript.recent(self.config.summary_turns)
    }
}

// =============================================================================
// Tests
// =============================================================================
