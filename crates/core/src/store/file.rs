//! Filesystem-backed draft store: one file per draft.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use tracing::debug;

use crate::errors::StoreError;
use crate::store::{validate_id, DraftStore};

/// Stores each draft as `<root>/<id>.<extension>`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    root: PathBuf,
    extension: String,
}

impl FileDraftStore {
    /// Create a store rooted at `root` using the `md` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, "md")
    }

    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding draft `id`.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.{}", self.extension)))
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, id: &str) -> Result<String, StoreError> {
        let path = self.path_for(id)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(id, path = %path.display(), bytes = content.len(), "read draft");
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, id: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        std::fs::create_dir_all(&self.root)?;

        // Each write gets its own uniquely named temp file, renamed over the
        // draft in one step. Dropped on any failure, so nothing is left behind.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id, path = %path.display(), bytes = content.len(), "wrote draft");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("drafts"));

        store.write("intro", "# Intro\nHello\n").unwrap();
        assert_eq!(store.read("intro").unwrap(), "# Intro\nHello\n");
        assert!(dir.path().join("drafts").join("intro.md").exists());

        store.write("intro", "replaced").unwrap();
        assert_eq!(store.read("intro").unwrap(), "replaced");
    }

    #[test]
    fn test_missing_draft() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        assert!(matches!(store.read("nope"), Err(StoreError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", "x"),
            Err(StoreError::InvalidId { .. })
        ));
        assert!(matches!(
            store.read("../escape"),
            Err(StoreError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::with_extension(dir.path(), "txt");
        store.write("notes", "plain").unwrap();
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_concurrent_writes_keep_one_whole_draft() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let texts: Vec<String> = (0..8)
            .map(|t| format!("writer {t} says hello ").repeat(50))
            .collect();

        std::thread::scope(|scope| {
            for text in &texts {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..100 {
                        store.write("doc", text).unwrap();
                    }
                });
            }
        });

        let stored = store.read("doc").unwrap();
        assert!(texts.contains(&stored));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("doc.md")]);
    }
}
