//! CLI argument definitions for the Mediq application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Mediq — a medical-triage chat assistant with keyword routing and a
/// pluggable generation backend.
#[derive(Parser, Debug)]
#[command(name = "mediq", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Path of the transcript history file.
    #[arg(long = "history-file")]
    pub history_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Run without persisting the transcript after each turn.
    #[arg(long = "no-persist")]
    pub no_persist: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MEDIQ_CONFIG env var > platform default
    /// (~/.mediq/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("MEDIQ_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the transcript history file path.
    ///
    /// Priority: --history-file flag > config file value.
    pub fn resolve_history_file(&self, config_value: &str) -> PathBuf {
        if let Some(ref p) = self.history_file {
            return p.clone();
        }
        PathBuf::from(config_value)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_value: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_value.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".mediq").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".mediq").join("config.toml");
    }
    PathBuf::from("config.toml")
}
