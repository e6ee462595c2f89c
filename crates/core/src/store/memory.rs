//! In-memory draft store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::StoreError;
use crate::store::{validate_id, DraftStore};

/// Thread-safe map of draft id to content.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `(id, content)` pairs.
    pub fn with_drafts<I, K, V>(drafts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            drafts: RwLock::new(
                drafts
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.drafts.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, id: &str) -> Result<String, StoreError> {
        validate_id(id)?;
        let drafts = self
            .drafts
            .read()
            .map_err(|_| poisoned())?;
        drafts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn write(&self, id: &str, content: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        let mut drafts = self
            .drafts
            .write()
            .map_err(|_| poisoned())?;
        drafts.insert(id.to_string(), content.to_string());
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::other("draft store lock poisoned"))
}
