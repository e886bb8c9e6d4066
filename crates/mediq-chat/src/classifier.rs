//! Rule-based intent classifier.
//!
//! Maps raw user text to a discrete [`Intent`] tag by testing ordered
//! keyword lists as case-insensitive substrings. This is a best-effort
//! triage layer, not natural-language understanding: no tokenization,
//! stemming, or negation handling.

use mediq_core::config::ClassifierConfig;

use crate::types::Intent;

/// Classifies raw input against ordered keyword rule lists.
///
/// Precedence is a first-class contract, checked top to bottom:
/// appointment keywords, then symptom keywords, then the `General`
/// fallback. Within each list the first matching keyword wins, so the
/// list order is significant and the result is deterministic.
pub struct IntentClassifier {
    appointment_keywords: Vec<String>,
    symptom_keywords: Vec<String>,
}

impl IntentClassifier {
    /// Build a classifier from the configured keyword lists.
    ///
    /// Keywords are lowercased once here; empty entries are discarded since
    /// an empty string is a substring of everything.
    pub fn new(config: &ClassifierConfig) -> Self {
        let normalize = |keywords: &[String]| -> Vec<String> {
            keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };

        Self {
            appointment_keywords: normalize(&config.appointment_keywords),
            symptom_keywords: normalize(&config.symptom_keywords),
        }
    }

    /// Classify the intent of a raw message.
    ///
    /// Checks rules in order: appointment keywords win over co-occurring
    /// symptom keywords, and anything without a keyword (including the
    /// empty string) falls through to `General`.
    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();

        // Appointment first (so "book an appointment about my cough" books)
        for keyword in &self.appointment_keywords {
            if lower.contains(keyword.as_str()) {
                return Intent::Appointment;
            }
        }

        // Symptoms in list order; first match wins
        for keyword in &self.symptom_keywords {
            if lower.contains(keyword.as_str()) {
                return Intent::Symptom(keyword.clone());
            }
        }

        // Default fallback
        Intent::General
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
