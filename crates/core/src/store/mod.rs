//! Draft content stores.
//!
//! The reconciliation service reads `base`, `current`, and `incoming` from a
//! store and writes the merged text back. Anything that can get and put a
//! string by id can serve as a store.

pub mod file;
pub mod memory;

pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;

use crate::errors::StoreError;

/// Read/write access to draft content by id.
pub trait DraftStore {
    /// Fetch the content of a draft.
    fn read(&self, id: &str) -> Result<String, StoreError>;

    /// Replace the content of a draft, creating it if needed.
    fn write(&self, id: &str, content: &str) -> Result<(), StoreError>;
}

impl<S: DraftStore + ?Sized> DraftStore for &S {
    fn read(&self, id: &str) -> Result<String, StoreError> {
        (**self).read(id)
    }

    fn write(&self, id: &str, content: &str) -> Result<(), StoreError> {
        (**self).write(id, content)
    }
}

/// Check that `id` is usable as a draft key.
///
/// Ids are non-empty, made of ASCII alphanumerics, `-`, `_`, and `.`, and
/// must not start with `.`.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let invalid = |detail: &str| StoreError::InvalidId {
        id: id.to_string(),
        detail: detail.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if id.starts_with('.') {
        return Err(invalid("id must not start with '.'"));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("unexpected character {c:?}")));
    }
    Ok(())
}
