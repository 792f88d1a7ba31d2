//! Draft persistence: a single serialized snapshot of in-progress wizard
//! data, durable across restarts.
//!
//! One snapshot exists at a time and every write replaces it whole. The
//! store is injected into the wizard (no global singletons), so tests run
//! against [`MemoryDraftStore`] while the CLI uses [`FileDraftStore`].
//!
//! Unreadable snapshots - malformed JSON, an unknown schema version - are
//! treated as "no draft available" rather than crashing the wizard: the data
//! is advisory, and guessing the shape of an old draft is worse than
//! dropping it.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BillingDetails, PaymentDetails, ShippingDetails, Step, WizardState};

/// Current draft schema version. Bump when the snapshot shape changes.
pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// Default draft file name used by [`FileDraftStore`].
pub const DEFAULT_DRAFT_FILE: &str = "checkout-draft.json";

/// Errors from the draft store.
#[derive(thiserror::Error, Debug)]
pub enum DraftError {
    /// Reading or writing the underlying storage failed.
    #[error("draft I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the snapshot failed.
    #[error("draft serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A serialized snapshot of in-progress wizard data.
///
/// Consents are deliberately absent: they must be re-given after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    /// Schema version; snapshots with any other version are ignored on load.
    pub version: u32,
    pub current_step: Step,
    pub billing: BillingDetails,
    pub shipping: ShippingDetails,
    pub payment: PaymentDetails,
    pub applied_discount: Option<u8>,
    /// When this snapshot was written.
    pub saved_at: DateTime<Utc>,
}

impl DraftSnapshot {
    /// Capture the persistable parts of the wizard state.
    #[must_use]
    pub fn capture(state: &WizardState, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: DRAFT_SCHEMA_VERSION,
            current_step: state.current_step,
            billing: state.billing.clone(),
            shipping: state.shipping.clone(),
            payment: state.payment.clone(),
            applied_discount: state.applied_discount,
            saved_at,
        }
    }
}

/// Durable storage for the single draft entry.
///
/// `load` returning `Ok(None)` covers both "never saved" and "saved but
/// unreadable"; only real storage failures (e.g. permission errors) are
/// `Err`.
pub trait DraftStore: Send + Sync {
    /// Replace the stored draft with this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serializing or writing fails.
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError>;

    /// Load the stored draft, if a readable one exists.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures; unreadable content is
    /// `Ok(None)`.
    fn load(&self) -> Result<Option<DraftSnapshot>, DraftError>;

    /// Remove the stored draft. Removing an absent draft is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying removal fails.
    fn clear(&self) -> Result<(), DraftError>;
}

/// Decode a stored document, degrading unreadable content to `None`.
fn decode(json: &str) -> Option<DraftSnapshot> {
    let snapshot: DraftSnapshot = match serde_json::from_str(json) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            tracing::warn!(%error, "stored draft is unreadable, ignoring it");
            return None;
        }
    };

    if snapshot.version != DRAFT_SCHEMA_VERSION {
        tracing::warn!(
            version = snapshot.version,
            expected = DRAFT_SCHEMA_VERSION,
            "stored draft has an unknown schema version, ignoring it"
        );
        return None;
    }

    Some(snapshot)
}

/// In-memory draft store for tests and dry runs.
///
/// Stores the serialized document rather than the snapshot itself so the
/// load path exercises exactly the same decoding as the file store.
#[derive(Default)]
pub struct MemoryDraftStore {
    entry: Mutex<Option<String>>,
}

impl MemoryDraftStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored document, if any (test inspection).
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().expect("draft store lock poisoned").clone()
    }

    /// Replace the raw stored document (test setup for corrupt drafts).
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.entry.lock().expect("draft store lock poisoned") = Some(raw.into());
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        let json = serde_json::to_string(snapshot)?;
        *self.entry.lock().expect("draft store lock poisoned") = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, DraftError> {
        let entry = self.entry.lock().expect("draft store lock poisoned");
        Ok(entry.as_deref().and_then(decode))
    }

    fn clear(&self) -> Result<(), DraftError> {
        *self.entry.lock().expect("draft store lock poisoned") = None;
        Ok(())
    }
}

/// File-backed draft store: one JSON document at a fixed path.
///
/// Writes go to a sibling temp file first and are moved into place with a
/// rename, so the draft is always either the previous or the new document,
/// never a torn write.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the draft file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, DraftError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(decode(&json))
    }

    fn clear(&self) -> Result<(), DraftError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_snapshot() -> DraftSnapshot {
        let mut state = WizardState::default();
        state.billing.full_name = "Juan Pérez".to_owned();
        state.current_step = Step::Shipping;
        state.applied_discount = Some(10);
        DraftSnapshot::capture(&state, Utc::now())
    }

    #[test]
    fn test_memory_roundtrip() {
        let store = MemoryDraftStore::new();
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_memory_clear() {
        let store = MemoryDraftStore::new();
        store.save(&sample_snapshot()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_malformed_draft_degrades_to_none() {
        let store = MemoryDraftStore::new();
        store.set_raw("{not json at all");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_unknown_version_degrades_to_none() {
        let store = MemoryDraftStore::new();
        let mut snapshot = sample_snapshot();
        snapshot.version = 99;
        store.set_raw(serde_json::to_string(&snapshot).unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join(DEFAULT_DRAFT_FILE));
        let snapshot = sample_snapshot();

        assert!(store.load().unwrap().is_none());
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join(DEFAULT_DRAFT_FILE));

        let mut first = sample_snapshot();
        first.applied_discount = Some(30);
        store.save(&first).unwrap();

        let second = sample_snapshot();
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), second);
        // No stray temp file is left behind.
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_capture_omits_consents() {
        let mut state = WizardState::default();
        state.consents.accept_terms = true;
        let snapshot = DraftSnapshot::capture(&state, Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("consents").is_none());
        assert_eq!(json["version"], 1);
    }
}
