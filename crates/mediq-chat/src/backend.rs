//! Generation backend trait and implementations.
//!
//! - [`GenerationBackend`] is the narrow interface the resolver delegates
//!   unrecognized input to; it is independent of whatever model or service
//!   backs it.
//! - [`TemplateBackend`] provides deterministic templated completions for
//!   running without a model.

use async_trait::async_trait;

use crate::error::ChatError;

/// Opaque text-completion capability.
///
/// Implementations may be slow or fail outright; callers own the deadline
/// (see the resolver) and must guard against replies exceeding `max_chars`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce a completion for `prompt`, aiming for at most `max_chars`
    /// characters of output.
    async fn generate(&self, prompt: &str, max_chars: usize) -> Result<String, ChatError>;
}

/// Deterministic offline backend.
///
/// Produces a templated completion derived from the patient text, so
/// identical prompts always produce identical replies. This lets the engine
/// run (and be tested) without a model behind it.
#[derive(Debug, Clone, Default)]
pub struct TemplateBackend;

impl TemplateBackend {
    pub fn new() -> Self {
        Self
    }

    /// Strip the system preamble, keeping only the patient's text.
    ///
    /// Prompts are formed as `<preamble>Patient: <text>`; a prompt without
    /// the marker is used as-is.
    fn patient_text(prompt: &str) -> &str {
        match prompt.rfind("Patient: ") {
            Some(idx) => prompt[idx + "Patient: ".len()..].trim(),
            None => prompt.trim(),
        }
    }
}

#[async_trait]
impl GenerationBackend for TemplateBackend {
    async fn generate(&self, prompt: &str, max_chars: usize) -> Result<String, ChatError> {
        let text = Self::patient_text(prompt);
        if text.is_empty() {
            return Err(ChatError::BackendUnavailable(
                "cannot complete an empty prompt".to_string(),
            ));
        }

        let reply = format!(
            "I can only offer general information on \"{}\". Rest, hydration, \
             and monitoring usually help; please consult a clinician if this \
             persists or worsens.",
            text
        );
        Ok(reply.chars().take(max_chars).collect())
    }
}
