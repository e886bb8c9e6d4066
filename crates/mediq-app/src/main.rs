//! Mediq application binary - composition root.
//!
//! Ties together the Mediq crates into a single executable:
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML
//! 3. Restore the transcript from the history file
//! 4. Build the conversation engine over the offline generation backend
//! 5. Run the interactive conversation loop, persisting after each turn

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mediq_chat::engine::OPEN_PANEL_NOTICE;
use mediq_chat::{ChatError, ConversationEngine, SessionContext, TemplateBackend};
use mediq_core::types::AppointmentRequest;
use mediq_core::MediqConfig;

use cli::CliArgs;

const HELP_TEXT: &str = "\
Commands:
  /book                      open the appointment panel
  /confirm <date> <time>     confirm a booking, e.g. /confirm 2025-03-01 14:30
  /action <label>            press a quick action (Fever, Cough, Cold, Pain,
                             Book Appointment)
  /history [n]               show the last n turns (default: summary window)
  /help                      show this help
  /quit                      exit
Anything else is sent to the assistant.";

/// Parse the `/confirm` argument tail into an appointment request.
fn parse_confirm_args(rest: &str) -> Option<AppointmentRequest> {
    let mut parts = rest.split_whitespace();
    let date = chrono::NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let time = chrono::NaiveTime::parse_from_str(parts.next()?, "%H:%M").ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(AppointmentRequest::new(date, time))
}

/// Persist the session transcript, reporting failures without aborting.
///
/// The in-memory transcript stays the source of truth for the session when
/// the write fails.
fn persist_transcript(session: &SessionContext, path: &Path, enabled: bool) {
    if !enabled {
        return;
    }
    if let Err(e) = session.transcript.persist_to_path(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to persist transcript");
        eprintln!("(warning: could not save history: {})", e);
    }
}

/// Render a slice of turns as `Role: text` lines.
fn render_turns(turns: &[mediq_core::types::Turn]) {
    if turns.is_empty() {
        println!("(no history yet)");
        return;
    }
    for turn in turns {
        println!("{}: {}", turn.role, turn.text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first so its log level can seed the tracing filter.
    let config_file = args.resolve_config_path();
    let config = MediqConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the resolved level when set.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    tracing::info!("Starting Mediq v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let history_file = args.resolve_history_file(&config.general.history_file);

    // Engine over the offline deterministic backend.
    let engine = ConversationEngine::new(&config, Arc::new(TemplateBackend::new()));
    let mut session = SessionContext::new();

    // Restore prior history. A malformed or missing file degrades to a
    // fresh transcript; the conversation loop starts regardless.
    if history_file.exists() {
        match session.transcript.restore_from_path(&history_file) {
            Ok(()) => {
                tracing::info!(
                    path = %history_file.display(),
                    turns = session.transcript.len(),
                    "Transcript restored"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %history_file.display(),
                    error = %e,
                    "Could not restore transcript; starting fresh"
                );
                eprintln!("(warning: could not load history: {})", e);
            }
        }
    }

    println!("Mediq - your digital medical aid, not a replacement for a clinician.");
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();

        if line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("/exit") {
            break;
        }

        if line.eq_ignore_ascii_case("/help") {
            println!("{}", HELP_TEXT);
            continue;
        }

        if line.eq_ignore_ascii_case("/book") {
            engine.open_appointment(&mut session);
            println!("{}", OPEN_PANEL_NOTICE);
            continue;
        }

        if let Some(rest) = line.strip_prefix("/confirm") {
            match parse_confirm_args(rest) {
                Some(request) => match engine.confirm_appointment(&mut session, request) {
                    Ok(message) => {
                        println!("{}", message);
                        persist_transcript(&session, &history_file, !args.no_persist);
                    }
                    Err(e) => println!("Could not confirm: {}", e),
                },
                None => println!("Usage: /confirm <YYYY-MM-DD> <HH:MM>"),
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("/history") {
            let turns = match rest.trim().parse::<usize>() {
                Ok(n) => engine.transcript_view(&session, n),
                Err(_) => engine.transcript_summary(&session),
            };
            render_turns(turns);
            continue;
        }

        if let Some(label) = line.strip_prefix("/action") {
            match engine.select_quick_action(&mut session, label.trim()).await {
                Ok(reply) => {
                    println!("Assistant: {}", reply.reply);
                    persist_transcript(&session, &history_file, !args.no_persist);
                }
                Err(e) => println!("{}", e),
            }
            continue;
        }

        match engine.submit_message(&mut session, &line).await {
            Ok(reply) => {
                println!("Assistant: {}", reply.reply);
                if reply.appointment_opened {
                    println!("(use /confirm <YYYY-MM-DD> <HH:MM> to book)");
                }
                persist_transcript(&session, &history_file, !args.no_persist);
            }
            Err(ChatError::EmptyInput) => {
                println!("Please enter a message.");
            }
            Err(e) => {
                println!("{}", e);
            }
        }
    }

    tracing::info!("Session ended");
    Ok(())
}
