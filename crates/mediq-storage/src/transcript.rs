//! Append-only transcript store.
//!
//! Holds the ordered turn log for one conversation session and serializes
//! it to an external byte sink as a human-readable JSON array of
//! `[role, text]` pairs.

use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use mediq_core::error::MediqError;
use mediq_core::types::{Role, Turn};

/// Ordered, append-only log of conversation turns.
///
/// Owned exclusively by one session. Turns are immutable once appended and
/// are never reordered; `recent` and `all` are read-only views.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
}

impl TranscriptStore {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn at the end of the transcript.
    ///
    /// Never rejects based on content. Fails only when the backing storage
    /// cannot grow, which is reported rather than silently dropped.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> Result<(), MediqError> {
        self.turns
            .try_reserve(1)
            .map_err(|e| MediqError::CapacityExhausted(e.to_string()))?;
        self.turns.push(Turn::new(role, text));
        Ok(())
    }

    /// Number of turns in the transcript.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last `n` turns in original insertion order.
    ///
    /// `n = 0` returns an empty slice; `n` larger than the transcript
    /// returns the whole transcript. Never mutates the underlying sequence.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Lazy, restartable iterator over all turns in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Turn> + '_ {
        self.turns.iter()
    }

    /// Serialize the full ordered turn sequence into `sink`.
    ///
    /// Wire format: one UTF-8 JSON array of two-element `[role, text]`
    /// arrays, pretty-printed for human readability.
    pub fn persist<W: Write>(&self, sink: W) -> Result<(), MediqError> {
        let records: Vec<(&str, &str)> = self
            .turns
            .iter()
            .map(|t| (t.role.as_str(), t.text.as_str()))
            .collect();
        serde_json::to_writer_pretty(sink, &records)
            .map_err(|e| MediqError::Storage(format!("Failed to persist transcript: {}", e)))?;
        debug!(turns = self.turns.len(), "Transcript persisted");
        Ok(())
    }

    /// Replace the transcript with the turn sequence read from `source`.
    ///
    /// Atomic: either the whole stored sequence parses and replaces the
    /// in-memory transcript, or the prior transcript is left untouched and
    /// the malformed input is reported. Never partially loads.
    pub fn restore<R: Read>(&mut self, source: R) -> Result<(), MediqError> {
        let records: Vec<(String, String)> = serde_json::from_reader(source)
            .map_err(|e| MediqError::MalformedTranscript(e.to_string()))?;

        let mut turns = Vec::new();
        turns
            .try_reserve(records.len())
            .map_err(|e| MediqError::CapacityExhausted(e.to_string()))?;
        for (label, text) in records {
            let role = Role::parse(&label).ok_or_else(|| {
                MediqError::MalformedTranscript(format!("unknown role label: {:?}", label))
            })?;
            turns.push(Turn::new(role, text));
        }

        self.turns = turns;
        info!(turns = self.turns.len(), "Transcript restored");
        Ok(())
    }

    /// Persist to a file, replacing the whole file contents.
    ///
    /// Parent directories are created as needed. The write is a whole-file
    /// replace, not an append-in-place.
    pub fn persist_to_path(&self, path: &Path) -> Result<(), MediqError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.persist(file)
    }

    /// Restore from a file written by [`persist_to_path`].
    ///
    /// [`persist_to_path`]: TranscriptStore::persist_to_path
    pub fn restore_from_path(&mut self, path: &Path) -> Result<(), MediqError> {
        let file = std::fs::File::open(path)?;
        self.restore(std::io::BufReader::new(file))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(turns: &[(Role, &str)]) -> TranscriptStore {
        let mut store = TranscriptStore::new();
        for (role, text) in turns {
            store.append(*role, *text).unwrap();
        }
        store
    }

    // ---- append / len ----

    #[test]
    fn test_new_is_empty() {
        let store = TranscriptStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_append_grows_in_order() {
        let store = store_with(&[
            (Role::User, "first"),
            (Role::Assistant, "second"),
            (Role::User, "third"),
        ]);
        assert_eq!(store.len(), 3);
        let texts: Vec<&str> = store.all().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_append_never_rejects_content() {
        let mut store = TranscriptStore::new();
        store.append(Role::User, "").unwrap();
        store.append(Role::Assistant, "   ").unwrap();
        store.append(Role::User, "\u{1f912} feeling sick").unwrap();
        assert_eq!(store.len(), 3);
    }

    // ---- recent ----

    #[test]
    fn test_recent_last_appended() {
        let mut store = store_with(&[(Role::User, "hello")]);
        store.append(Role::Assistant, "hi there").unwrap();
        let last = store.recent(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].role, Role::Assistant);
        assert_eq!(last[0].text, "hi there");
    }

    #[test]
    fn test_recent_zero_is_empty() {
        let store = store_with(&[(Role::User, "hello")]);
        assert!(store.recent(0).is_empty());
    }

    #[test]
    fn test_recent_larger_than_len_returns_all() {
        let store = store_with(&[(Role::User, "a"), (Role::Assistant, "b")]);
        let view = store.recent(10);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].text, "a");
        assert_eq!(view[1].text, "b");
    }

    #[test]
    fn test_recent_preserves_insertion_order() {
        let store = store_with(&[
            (Role::User, "one"),
            (Role::Assistant, "two"),
            (Role::User, "three"),
        ]);
        let view = store.recent(2);
        assert_eq!(view[0].text, "two");
        assert_eq!(view[1].text, "three");
    }

    #[test]
    fn test_recent_does_not_mutate() {
        let store = store_with(&[(Role::User, "a"), (Role::Assistant, "b")]);
        let before = store.clone();
        let _ = store.recent(1);
        let _ = store.recent(0);
        let _ = store.recent(100);
        assert_eq!(store, before);
    }

    #[test]
    fn test_recent_on_empty_store() {
        let store = TranscriptStore::new();
        assert!(store.recent(0).is_empty());
        assert!(store.recent(5).is_empty());
    }

    // ---- all ----

    #[test]
    fn test_all_is_restartable() {
        let store = store_with(&[(Role::User, "x"), (Role::Assistant, "y")]);
        let first: Vec<&Turn> = store.all().collect();
        let second: Vec<&Turn> = store.all().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_all_is_lazy() {
        let store = store_with(&[(Role::User, "x"), (Role::Assistant, "y")]);
        let mut iter = store.all();
        assert_eq!(iter.next().unwrap().text, "x");
        assert_eq!(iter.next().unwrap().text, "y");
        assert!(iter.next().is_none());
    }

    // ---- persist / restore ----

    #[test]
    fn test_persist_wire_format() {
        let store = store_with(&[(Role::User, "fever"), (Role::Assistant, "rest up")]);
        let mut buf = Vec::new();
        store.persist(&mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(
            json,
            serde_json::json!([["User", "fever"], ["Assistant", "rest up"]])
        );
    }

    #[test]
    fn test_persist_is_human_readable() {
        let store = store_with(&[(Role::User, "hello")]);
        let mut buf = Vec::new();
        store.persist(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // Pretty-printed: one record per line, not a single dense line.
        assert!(text.contains('\n'));
        assert!(text.contains("\"User\""));
    }

    #[test]
    fn test_round_trip() {
        let original = store_with(&[
            (Role::User, "I have a cough"),
            (Role::Assistant, "Try warm drinks and honey."),
            (Role::User, "thanks"),
        ]);
        let mut buf = Vec::new();
        original.persist(&mut buf).unwrap();

        let mut restored = TranscriptStore::new();
        restored.restore(buf.as_slice()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_round_trip_empty_transcript() {
        let original = TranscriptStore::new();
        let mut buf = Vec::new();
        original.persist(&mut buf).unwrap();
        assert_eq!(String::from_utf8_lossy(&buf), "[]");

        let mut restored = store_with(&[(Role::User, "stale")]);
        restored.restore(buf.as_slice()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_round_trip_unicode() {
        let original = store_with(&[(Role::User, "j'ai de la fi\u{00e8}vre \u{1f912}")]);
        let mut buf = Vec::new();
        original.persist(&mut buf).unwrap();
        let mut restored = TranscriptStore::new();
        restored.restore(buf.as_slice()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_restore_replaces_previous_contents() {
        let incoming = store_with(&[(Role::User, "new")]);
        let mut buf = Vec::new();
        incoming.persist(&mut buf).unwrap();

        let mut store = store_with(&[(Role::User, "old one"), (Role::Assistant, "old two")]);
        store.restore(buf.as_slice()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.recent(1)[0].text, "new");
    }

    #[test]
    fn test_restore_malformed_json_leaves_prior_untouched() {
        let mut store = store_with(&[(Role::User, "keep me")]);
        let err = store.restore(b"{ not json".as_slice()).unwrap_err();
        assert!(matches!(err, MediqError::MalformedTranscript(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.recent(1)[0].text, "keep me");
    }

    #[test]
    fn test_restore_unknown_role_leaves_prior_untouched() {
        let mut store = store_with(&[(Role::Assistant, "keep me")]);
        let bad = br#"[["User", "hi"], ["Robot", "beep"]]"#;
        let err = store.restore(bad.as_slice()).unwrap_err();
        assert!(matches!(err, MediqError::MalformedTranscript(_)));
        assert!(err.to_string().contains("Robot"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_restore_wrong_shape_leaves_prior_untouched() {
        let mut store = store_with(&[(Role::User, "keep me")]);
        // Three-element records are not the transcript format.
        let bad = br#"[["User", "hi", "extra"]]"#;
        assert!(store.restore(bad.as_slice()).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_restore_accepts_lowercase_roles() {
        let mut store = TranscriptStore::new();
        let data = br#"[["user", "hi"], ["assistant", "hello"]]"#;
        store.restore(data.as_slice()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.recent(2)[0].role, Role::User);
        assert_eq!(store.recent(2)[1].role, Role::Assistant);
    }

    // ---- path helpers ----

    #[test]
    fn test_persist_to_path_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store = store_with(&[(Role::User, "hello"), (Role::Assistant, "hi")]);
        store.persist_to_path(&path).unwrap();

        let mut restored = TranscriptStore::new();
        restored.restore_from_path(&path).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_persist_to_path_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("history.json");

        let store = store_with(&[(Role::User, "hello")]);
        store.persist_to_path(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_persist_to_path_is_whole_file_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let big = store_with(&[
            (Role::User, "one"),
            (Role::Assistant, "two"),
            (Role::User, "three"),
        ]);
        big.persist_to_path(&path).unwrap();

        let small = store_with(&[(Role::User, "only")]);
        small.persist_to_path(&path).unwrap();

        let mut restored = TranscriptStore::new();
        restored.restore_from_path(&path).unwrap();
        assert_eq!(restored, small);
    }

    #[test]
    fn test_restore_from_missing_path_is_io_error() {
        let mut store = store_with(&[(Role::User, "keep me")]);
        let err = store
            .restore_from_path(Path::new("/nonexistent/history.json"))
            .unwrap_err();
        assert!(matches!(err, MediqError::Io(_)));
        assert_eq!(store.len(), 1);
    }
}
