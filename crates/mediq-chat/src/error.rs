//! Error types for the conversational engine.

use mediq_core::error::MediqError;

use crate::appointment::AppointmentState;

/// Errors from the conversation engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyInput,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("generation backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("generation backend timed out after {0} ms")]
    BackendTimeout(u64),
    #[error("invalid appointment transition: {0} -> {1}")]
    InvalidTransition(AppointmentState, AppointmentState),
    #[error("unknown quick action: {0}")]
    UnknownQuickAction(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<MediqError> for ChatError {
    fn from(err: MediqError) -> Self {
        ChatError::Storage(err.to_string())
    }
}
