//! Key-value persistence for the listing page state, shaped like browser
//! local storage: string keys, string values, last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::listing::state::PageState;

/// Storage key holding the serialized [`PageState`].
pub const PAGE_STATE_KEY: &str = "ideaPageState";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by one JSON object on disk (`{"key": "value", ...}`).
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        // an unreadable file is replaced rather than blocking every write
        let mut entries = self.read_all().unwrap_or_else(|e| {
            tracing::warn!(path = ?self.path, error = %e, "Discarding unreadable state file");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Read the saved page state; missing or corrupt records give the default.
pub fn load_page_state(store: &impl StateStore) -> PageState {
    let raw = match store.get(PAGE_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PageState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read page state, using defaults");
            return PageState::default();
        }
    };

    match serde_json::from_str::<PageState>(&raw) {
        Ok(state) => state.normalized(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored page state is malformed, using defaults");
            PageState::default()
        }
    }
}

pub fn save_page_state(store: &mut impl StateStore, state: &PageState) -> Result<(), StoreError> {
    store.set(PAGE_STATE_KEY, serde_json::to_string(state)?)
}
