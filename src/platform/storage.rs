//! Key-value storage
//!
//! Settings and the high score live in a string-to-string store. Writes are
//! best effort: a store that cannot persist logs and carries on.

use std::collections::BTreeMap;

/// String key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;

    /// Store backed by one JSON object on disk
    ///
    /// The whole map is rewritten on every `set`.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open a store; a missing or unreadable file starts empty
        pub fn open(path: impl AsRef<Path>) -> Self {
            let path = path.as_ref().to_path_buf();
            let entries = std::fs::read_to_string(&path)
                .ok()
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_default();
            Self { path, entries }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self) {
            let json = match serde_json::to_string_pretty(&self.entries) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Could not encode store: {}", e);
                    return;
                }
            };
            if let Err(e) = std::fs::write(&self.path, json) {
                log::warn!("Could not write {}: {}", self.path.display(), e);
            }
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.entries.insert(key.to_string(), value.to_string());
            self.flush();
        }
    }
}
