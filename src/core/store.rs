//! Lead persistence
//!
//! The desk only talks to `LeadStore`. Two implementations ship: an in-memory
//! map for tests and single-process use, and a directory of pretty JSON files
//! (one per lead, last write wins).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::types::{LeadRecord, StoreError};

pub trait LeadStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<LeadRecord>, StoreError>;
    fn put(&self, record: &LeadRecord) -> Result<(), StoreError>;
    fn ids(&self) -> Result<Vec<String>, StoreError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    records: RwLock<HashMap<String, LeadRecord>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadStore for InMemoryLeadStore {
    fn get(&self, id: &str) -> Result<Option<LeadRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn put(&self, record: &LeadRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut ids: Vec<String> = records.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// JSON FILES
// =============================================================================

/// One `<id>.json` per lead under `dir`
#[derive(Debug, Clone)]
pub struct JsonFileLeadStore {
    dir: PathBuf,
}

impl JsonFileLeadStore {
    /// Directory is created lazily on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(id)))
    }
}

/// Lead ids come from webhooks. Lowercase alphanumerics, `-` and `_` pass
/// through and every other byte becomes `%XX`, so distinct ids never share a
/// file, even on case-insensitive filesystems.
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => stem.push(byte as char),
            _ => stem.push_str(&format!("%{:02X}", byte)),
        }
    }
    stem
}

impl LeadStore for JsonFileLeadStore {
    fn get(&self, id: &str) -> Result<Option<LeadRecord>, StoreError> {
        let json = match std::fs::read_to_string(self.path_for(id)) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: LeadRecord = serde_json::from_str(&json)?;
        if record.id != id {
            return Err(StoreError::IdMismatch { requested: id.to_string(), found: record.id });
        }
        Ok(Some(record))
    }

    fn put(&self, record: &LeadRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(&record.id), json)?;
        Ok(())
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // The stored record carries the unsanitized id
            let json = std::fs::read_to_string(&path)?;
            let record: LeadRecord = serde_json::from_str(&json)?;
            ids.push(record.id);
        }
        ids.sort();
        Ok(ids)
    }
}

// =============================================================================
// TESTS
// =============================================================================
