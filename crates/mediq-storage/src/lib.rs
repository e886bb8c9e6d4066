//! Mediq storage crate - transcript durability.
//!
//! Provides the append-only [`TranscriptStore`] and its JSON persistence:
//! the whole ordered turn sequence is written to a byte sink as one
//! human-readable array of `[role, text]` pairs, and restored atomically.

pub mod transcript;

pub use transcript::TranscriptStore;
