//! Response resolution for classified intents.
//!
//! Maps (intent, text) to a reply: canned safety advisories for symptoms,
//! a booking prompt for appointments, and a bounded delegation to the
//! generation backend for everything else.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use tracing::warn;

use mediq_core::config::GenerationConfig;

use crate::backend::GenerationBackend;
use crate::types::{Intent, Resolution};

/// Reply for booking intents, alongside the open-form signal.
pub const APPOINTMENT_REPLY: &str =
    "Would you like to schedule an appointment? Use the 'Book Appointment' \
     quick action or the booking panel.";

/// Reply when a symptom tag has no advisory entry.
pub const MORE_DETAILS_REPLY: &str = "Please provide more details.";

/// Reply substituted for any backend failure or timeout.
pub const FALLBACK_REPLY: &str = "Sorry — I couldn't generate an answer right now.";

// Canned safety advisories, keyed by lowercase symptom keyword. Each keyword
// maps to exactly one fixed string; lookup is O(1); a Symptom intent never
// falls through to the generation backend.
static SYMPTOM_ADVISORIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (
            "fever",
            "If the fever is below 102\u{b0}F, take Paracetamol and rest. If above \
             102\u{b0}F or persistent, contact a healthcare provider.",
        ),
        (
            "cough",
            "For a mild cough, try warm drinks and honey. If severe or persistent \
             >1 week, consult a doctor.",
        ),
        (
            "cold",
            "For a mild cold, steam inhalation and antihistamine (like cetirizine) \
             can help.",
        ),
        (
            "congestion",
            "For congestion, steam inhalation and an antihistamine (like \
             cetirizine) can help. See a doctor if it persists.",
        ),
        (
            "pain",
            "For mild pain, over-the-counter analgesics like ibuprofen (after \
             food) can help; seek medical advice for persistent pain.",
        ),
    ])
});

/// Resolves a classified intent into a reply.
pub struct ResponseResolver {
    backend: Arc<dyn GenerationBackend>,
    config: GenerationConfig,
}

impl ResponseResolver {
    /// Create a resolver delegating `General` intents to `backend`.
    pub fn new(backend: Arc<dyn GenerationBackend>, config: GenerationConfig) -> Self {
        Self { backend, config }
    }

    /// Resolve an intent into a reply and the appointment-form signal.
    ///
    /// Never returns an error: backend failures and timeouts are recovered
    /// locally as [`FALLBACK_REPLY`] so the conversational loop stays
    /// available when generation is degraded.
    pub async fn resolve(&self, intent: &Intent, raw_text: &str) -> Resolution {
        match intent {
            Intent::Appointment => Resolution {
                reply: APPOINTMENT_REPLY.to_string(),
                open_appointment_form: true,
            },
            Intent::Symptom(keyword) => {
                let reply = SYMPTOM_ADVISORIES
                    .get(keyword.as_str())
                    .copied()
                    .unwrap_or(MORE_DETAILS_REPLY);
                Resolution {
                    reply: reply.to_string(),
                    open_appointment_form: false,
                }
            }
            Intent::General => Resolution {
                reply: self.generate(raw_text).await,
                open_appointment_form: false,
            },
        }
    }

    /// Delegate to the backend under the configured deadline.
    async fn generate(&self, raw_text: &str) -> String {
        let prompt = format!("{}{}", self.config.preamble, raw_text);
        let deadline = Duration::from_millis(self.config.timeout_ms);
        let call = self.backend.generate(&prompt, self.config.max_reply_chars);

        match tokio::time::timeout(deadline, call).await {
            Ok(Ok(reply)) => truncate_chars(reply, self.config.max_reply_chars),
            Ok(Err(e)) => {
                warn!(error = %e, "Generation backend failed");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.timeout_ms,
                    "Generation backend timed out"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Instant;

    use crate::error::ChatError;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, _prompt: &str, _max_chars: usize) -> Result<String, ChatError> {
            Ok(self.0.to_string())
        }
    }

    struct EchoPromptBackend;

    #[async_trait]
    impl GenerationBackend for EchoPromptBackend {
        async fn generate(&self, prompt: &str, _max_chars: usize) -> Result<String, ChatError> {
            Ok(prompt.to_string())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl GenerationBackend for FailingBackend {
        async fn generate(&self, _prompt: &str, _max_chars: usize) -> Result<String, ChatError> {
            Err(ChatError::BackendUnavailable("model not loaded".to_string()))
        }
    }

    struct HangingBackend;

    #[async_trait]
    impl GenerationBackend for HangingBackend {
        async fn generate(&self, _prompt: &str, _max_chars: usize) -> Result<String, ChatError> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn resolver_with(backend: Arc<dyn GenerationBackend>) -> ResponseResolver {
        ResponseResolver::new(backend, GenerationConfig::default())
    }

    fn symptom(keyword: &str) -> Intent {
        Intent::Symptom(keyword.to_string())
    }

    // ---- Appointment ----

    #[tokio::test]
    async fn test_appointment_reply_and_signal() {
        let resolver = resolver_with(Arc::new(FixedBackend("unused")));
        let res = resolver.resolve(&Intent::Appointment, "book me in").await;
        assert_eq!(res.reply, APPOINTMENT_REPLY);
        assert!(res.open_appointment_form);
    }

    // ---- Symptoms ----

    #[tokio::test]
    async fn test_fever_reply_is_deterministic() {
        let resolver = resolver_with(Arc::new(FixedBackend("unused")));
        let first = resolver.resolve(&symptom("fever"), "fever").await;
        let second = resolver.resolve(&symptom("fever"), "fever").await;
        assert_eq!(first.reply, second.reply);
        assert!(first.reply.contains("102\u{b0}F"));
        assert!(!first.open_appointment_form);
    }

    #[tokio::test]
    async fn test_every_default_symptom_has_an_advisory() {
        let resolver = resolver_with(Arc::new(FixedBackend("unused")));
        for keyword in ["fever", "cough", "cold", "congestion", "pain"] {
            let res = resolver.resolve(&symptom(keyword), keyword).await;
            assert_ne!(res.reply, MORE_DETAILS_REPLY, "missing advisory: {}", keyword);
            assert!(!res.open_appointment_form);
        }
    }

    #[tokio::test]
    async fn test_cough_advisory_mentions_persistence() {
        let resolver = resolver_with(Arc::new(FixedBackend("unused")));
        let res = resolver.resolve(&symptom("cough"), "cough").await;
        assert!(res.reply.contains(">1 week"));
    }

    #[tokio::test]
    async fn test_unknown_symptom_key_falls_back_to_details_prompt() {
        // Reachable when the configured keyword list is user-extended.
        let resolver = resolver_with(Arc::new(FixedBackend("unused")));
        let res = resolver.resolve(&symptom("rash"), "a rash").await;
        assert_eq!(res.reply, MORE_DETAILS_REPLY);
        assert!(!res.open_appointment_form);
    }

    #[tokio::test]
    async fn test_symptom_never_reaches_backend() {
        // A failing backend must not matter for symptom intents.
        let resolver = resolver_with(Arc::new(FailingBackend));
        let res = resolver.resolve(&symptom("fever"), "fever").await;
        assert_ne!(res.reply, FALLBACK_REPLY);
    }

    // ---- General: delegation ----

    #[tokio::test]
    async fn test_general_delegates_to_backend() {
        let resolver = resolver_with(Arc::new(FixedBackend("generated answer")));
        let res = resolver.resolve(&Intent::General, "tell me about sleep").await;
        assert_eq!(res.reply, "generated answer");
        assert!(!res.open_appointment_form);
    }

    #[tokio::test]
    async fn test_general_prompt_carries_preamble_and_text() {
        let resolver = ResponseResolver::new(
            Arc::new(EchoPromptBackend),
            GenerationConfig {
                max_reply_chars: 10_000,
                ..GenerationConfig::default()
            },
        );
        let res = resolver.resolve(&Intent::General, "tell me about sleep").await;
        assert!(res.reply.contains("cautious medical assistant"));
        assert!(res.reply.ends_with("Patient: tell me about sleep"));
    }

    #[tokio::test]
    async fn test_general_reply_truncated_to_ceiling() {
        let resolver = ResponseResolver::new(
            Arc::new(EchoPromptBackend),
            GenerationConfig {
                max_reply_chars: 12,
                ..GenerationConfig::default()
            },
        );
        let res = resolver.resolve(&Intent::General, "a long question").await;
        assert_eq!(res.reply.chars().count(), 12);
    }

    // ---- General: degraded backends ----

    #[tokio::test]
    async fn test_backend_failure_yields_fallback() {
        let resolver = resolver_with(Arc::new(FailingBackend));
        let res = resolver.resolve(&Intent::General, "tell me a story").await;
        assert_eq!(res.reply, FALLBACK_REPLY);
        assert!(!res.open_appointment_form);
    }

    #[tokio::test]
    async fn test_hung_backend_yields_fallback_within_bound() {
        let resolver = ResponseResolver::new(
            Arc::new(HangingBackend),
            GenerationConfig {
                timeout_ms: 50,
                ..GenerationConfig::default()
            },
        );
        let start = Instant::now();
        let res = resolver.resolve(&Intent::General, "tell me a story").await;
        assert_eq!(res.reply, FALLBACK_REPLY);
        // The bound plus negligible overhead.
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    // ---- truncate_chars ----

    #[test]
    fn test_truncate_chars_shorter_than_max() {
        assert_eq!(truncate_chars("short".to_string(), 100), "short");
    }

    #[test]
    fn test_truncate_chars_exact_length() {
        assert_eq!(truncate_chars("abcde".to_string(), 5), "abcde");
    }

    #[test]
    fn test_truncate_chars_cuts_at_char_boundary() {
        // Multi-byte chars must not be split.
        let s = "\u{00e9}\u{00e9}\u{00e9}\u{00e9}".to_string();
        assert_eq!(truncate_chars(s, 2), "\u{00e9}\u{00e9}");
    }

    #[test]
    fn test_truncate_chars_zero() {
        assert_eq!(truncate_chars("anything".to_string(), 0), "");
    }
}
