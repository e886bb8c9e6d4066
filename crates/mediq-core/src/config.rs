use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MediqError, Result};

/// Top-level configuration for the Mediq application.
///
/// Loaded from `~/.mediq/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediqConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Default for MediqConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            chat: ChatConfig::default(),
            classifier: ClassifierConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl MediqConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MediqConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MediqError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path of the transcript history file.
    pub history_file: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_file: "chat_history.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Conversation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters.
    pub max_message_chars: usize,
    /// Number of trailing turns shown in the recent-history summary.
    pub summary_turns: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 2000,
            summary_turns: 6,
        }
    }
}

/// Intent classifier keyword lists.
///
/// Both lists are matched as case-insensitive substrings, in list order.
/// Appointment keywords are checked before symptom keywords; within the
/// symptom list the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Keywords that route to the booking flow.
    pub appointment_keywords: Vec<String>,
    /// Keywords that route to canned symptom advisories.
    pub symptom_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            appointment_keywords: vec![
                "appointment".to_string(),
                "book".to_string(),
                "schedule".to_string(),
            ],
            symptom_keywords: vec![
                "fever".to_string(),
                "cough".to_string(),
                "cold".to_string(),
                "congestion".to_string(),
                "pain".to_string(),
            ],
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// System preamble prefixed to every generation prompt.
    pub preamble: String,
    /// Upper bound on reply length in characters.
    pub max_reply_chars: usize,
    /// Deadline for a single generation call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            preamble: "You are a helpful, cautious medical assistant. \
                       Provide brief, evidence-based guidance.\n\nPatient: "
                .to_string(),
            max_reply_chars: 400,
            timeout_ms: 5000,
        }
    }
}
