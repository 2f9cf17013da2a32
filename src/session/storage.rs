//! Key/value storage backends
//!
//! The session lives in a tiny string-to-string map, the same shape as a
//! browser's `localStorage`. Writes and removals are batched so that related
//! keys always change together.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::SessionResult;

/// Persistent string key/value storage
pub trait KeyValueStorage: Send + Sync {
    /// Read a single key
    fn get_item(&self, key: &str) -> SessionResult<Option<String>>;

    /// Write all pairs in one step
    fn set_items(&mut self, items: &[(&str, String)]) -> SessionResult<()>;

    /// Remove all keys in one step
    fn remove_items(&mut self, keys: &[&str]) -> SessionResult<()>;
}

/// In-memory storage, used by tests and short-lived sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_items(&mut self, items: &[(&str, String)]) -> SessionResult<()> {
        for (key, value) in items {
            self.items.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_items(&mut self, keys: &[&str]) -> SessionResult<()> {
        for key in keys {
            self.items.remove(*key);
        }
        Ok(())
    }
}

/// File-backed storage: one JSON object per file
///
/// Every change rewrites the whole file through a temporary sibling and a
/// rename, so a batch is either fully on disk or not at all. The file holds
/// the bearer token; on unix it is created owner-only (`0600`).
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

    fn read_all(&self) -> SessionResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(items)?;

        // a leftover temp file may carry wider permissions
        match std::fs::remove_file(&tmp_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut file = open_private(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_items(&mut self, items: &[(&str, String)]) -> SessionResult<()> {
        let mut all = self.read_all()?;
        for (key, value) in items {
            all.insert((*key).to_string(), value.clone());
        }
        self.write_all(&all)
    }

    fn remove_items(&mut self, keys: &[&str]) -> SessionResult<()> {
        let mut all = self.read_all()?;
        let before = all.len();
        for key in keys {
            all.remove(*key);
        }
        if all.len() == before && !self.path.exists() {
            return Ok(());
        }
        self.write_all(&all)
    }
}
