//! Conversational engine for Mediq.
//!
//! Provides rule-based intent classification, canned-or-generated response
//! resolution, the appointment booking flow, and per-session orchestration
//! over the transcript store.

pub mod appointment;
pub mod backend;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod session;
pub mod types;

pub use appointment::{validate_transition, AppointmentFlow, AppointmentState};
pub use backend::{GenerationBackend, TemplateBackend};
pub use classifier::IntentClassifier;
pub use engine::ConversationEngine;
pub use error::ChatError;
pub use resolver::{ResponseResolver, FALLBACK_REPLY};
pub use session::SessionContext;
pub use types::{EngineReply, Intent, QuickAction, Resolution};
