//! Recently exported codes.
//!
//! The list is small (five entries), most-recent-first, and unique by encoded
//! payload. Persistence goes through [`HistoryStorage`], which only knows how
//! to read and overwrite the whole serialized list.

use crate::error::StorageError;
use crate::payload::PayloadKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    /// Display label, already truncated.
    #[serde(rename = "data")]
    pub label: String,
    /// Unix milliseconds.
    #[serde(rename = "timestamp")]
    pub created_at: i64,
    #[serde(rename = "fullString")]
    pub encoded_payload: String,
}

impl HistoryEntry {
    pub fn new(kind: PayloadKind, label: &str, encoded_payload: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            label: label.to_string(),
            created_at: at.timestamp_millis(),
            encoded_payload: encoded_payload.to_string(),
        }
    }
}

/// Read-all / write-all access to the serialized history.
pub trait HistoryStorage {
    /// Returns the stored contents, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored contents.
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    contents: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Some(contents.to_string()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

/// One JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| self.io_error(e))
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        fs::write(&self.path, contents).map_err(|e| self.io_error(e))
    }
}

pub struct History<S: HistoryStorage> {
    storage: S,
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl<S: HistoryStorage> History<S> {
    /// Loads whatever the storage holds. Missing, unreadable or malformed
    /// contents give an empty history.
    pub fn load(storage: S) -> Self {
        Self::load_with_capacity(storage, HISTORY_CAPACITY)
    }

    /// A capacity of zero is raised to one so the newest export is always
    /// kept.
    pub fn load_with_capacity(storage: S, capacity: usize) -> Self {
        let mut entries = match storage.read() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("Failed to parse history: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to read history: {err}");
                Vec::new()
            }
        };
        let capacity = capacity.max(1);
        entries.truncate(capacity);
        Self {
            storage,
            entries,
            capacity,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Puts a new entry at the front, drops any older entry with the same
    /// encoded payload, keeps the newest `capacity` and persists the list.
    ///
    /// The in-memory list is updated even if persisting fails.
    pub fn record(
        &mut self,
        kind: PayloadKind,
        label: &str,
        encoded_payload: &str,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        let entry = HistoryEntry::new(kind, label, encoded_payload, at);
        self.entries.retain(|e| e.encoded_payload != encoded_payload);
        self.entries.insert(0, entry.clone());
        self.entries.truncate(self.capacity);
        debug!(len = self.entries.len(), "history updated");
        self.persist()?;
        Ok(entry)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        self.storage
            .write(&json)
            .inspect_err(|err| warn!("Failed to persist history: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    struct FailingStorage;

    impl HistoryStorage for FailingStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _contents: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: PathBuf::from("qr_history.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn stored(history: &History<MemoryStorage>) -> Vec<HistoryEntry> {
        serde_json::from_str(history.storage().contents().unwrap()).unwrap()
    }

    #[test]
    fn test_absent_and_malformed_load_empty() {
        assert!(History::load(MemoryStorage::new()).entries().is_empty());
        assert!(History::load(MemoryStorage::with_contents("{not json")).entries().is_empty());
        assert!(History::load(MemoryStorage::with_contents("{\"a\":1}")).entries().is_empty());
    }

    #[test]
    fn test_load_verbatim() {
        let raw = r#"[{"id":"1","type":"Wi-Fi","data":"Wi-Fi: Home","timestamp":5,"fullString":"WIFI:T:WPA;S:Home;P:x;H:false;;"}]"#;
        let history = History::load(MemoryStorage::with_contents(raw));
        assert_eq!(history.entries().len(), 1);
        let entry = &history.entries()[0];
        assert_eq!(entry.kind, PayloadKind::Wifi);
        assert_eq!(entry.label, "Wi-Fi: Home");
        assert_eq!(entry.created_at, 5);
    }

    #[test]
    fn test_record_persists_full_list() {
        let mut history = History::load(MemoryStorage::new());
        history.record(PayloadKind::Text, "a", "a", t(1)).unwrap();
        history.record(PayloadKind::Text, "b", "b", t(2)).unwrap();
        let saved = stored(&history);
        assert_eq!(saved, history.entries());
        assert_eq!(saved[0].encoded_payload, "b");
        assert_eq!(saved[1].encoded_payload, "a");

        let json = history.storage().contents().unwrap();
        assert!(json.contains("\"fullString\":\"b\""));
        assert!(json.contains("\"type\":\"Text\""));
    }

    #[test]
    fn test_bounded_most_recent_first() {
        let mut history = History::load(MemoryStorage::new());
        for i in 0..8 {
            let payload = format!("p{i}");
            history.record(PayloadKind::Url, &payload, &payload, t(i)).unwrap();
        }
        let order: Vec<_> = history.entries().iter().map(|e| e.encoded_payload.as_str()).collect();
        assert_eq!(order, ["p7", "p6", "p5", "p4", "p3"]);
        assert_eq!(stored(&history).len(), 5);
    }

    #[test]
    fn test_dedup_moves_to_front_with_latest_time() {
        let mut history = History::load(MemoryStorage::new());
        let start = t(1_000);
        history.record(PayloadKind::Text, "same", "same", start).unwrap();
        history.record(PayloadKind::Text, "other", "other", start + Duration::seconds(1)).unwrap();
        history
            .record(PayloadKind::Text, "same again", "same", start + Duration::seconds(2))
            .unwrap();

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].encoded_payload, "same");
        assert_eq!(entries[0].label, "same again");
        assert_eq!(entries[0].created_at, 3_000);
        assert_eq!(entries[1].encoded_payload, "other");
    }

    #[test]
    fn test_dedup_is_by_payload_not_label() {
        let mut history = History::load(MemoryStorage::new());
        history.record(PayloadKind::Text, "label", "one", t(1)).unwrap();
        history.record(PayloadKind::Text, "label", "two", t(2)).unwrap();
        assert_eq!(history.entries().len(), 2);
    }

    #[test]
    fn test_length_is_min_of_distinct_and_capacity() {
        let mut history = History::load(MemoryStorage::new());
        let payloads = ["a", "b", "a", "c", "b", "d", "a"];
        for (i, p) in payloads.iter().enumerate() {
            history.record(PayloadKind::Text, p, p, t(i as i64)).unwrap();
        }
        let order: Vec<_> = history.entries().iter().map(|e| e.encoded_payload.as_str()).collect();
        assert_eq!(order, ["a", "d", "b", "c"]);
    }

    #[test]
    fn test_write_failure_still_updates_memory() {
        let mut history = History::load(FailingStorage);
        let err = history.record(PayloadKind::Text, "a", "a", t(1)).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.entries()[0].encoded_payload, "a");
    }

    #[test]
    fn test_zero_capacity_keeps_newest() {
        let mut history = History::load_with_capacity(MemoryStorage::new(), 0);
        let entry = history.record(PayloadKind::Text, "a", "a", t(1)).unwrap();
        history.record(PayloadKind::Text, "b", "b", t(2)).unwrap();
        assert_eq!(entry.encoded_payload, "a");
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.entries()[0].encoded_payload, "b");
    }

    #[test]
    fn test_clear() {
        let mut history = History::load(MemoryStorage::new());
        history.record(PayloadKind::Text, "a", "a", t(1)).unwrap();
        history.clear().unwrap();
        assert!(history.entries().is_empty());
        assert_eq!(history.storage().contents(), Some("[]"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("qr_history.json");

        let mut history = History::load(FileStorage::new(&path));
        assert!(history.entries().is_empty());
        history.record(PayloadKind::Phone, "123", "tel:123", t(9)).unwrap();

        let reloaded = History::load(FileStorage::new(&path));
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_file_storage_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr_history.json");
        fs::write(&path, "garbage").unwrap();
        assert!(History::load(FileStorage::new(&path)).entries().is_empty());
    }
}
