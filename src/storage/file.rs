//! JSON file backed session store

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{apply_to_map, Change, SessionStore};
use crate::error::{Error, Result};

/// Stores entries as a flat JSON object in a single file.
///
/// Every batch is written to a sibling temp file and renamed over the
/// current file, so readers see either the old or the new contents.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                Error::Storage(format!("{} is corrupt: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| Error::Storage("lock poisoned".into()))?;
        Ok(self.read_map()?.remove(key))
    }

    fn apply(&self, changes: &[Change]) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| Error::Storage("lock poisoned".into()))?;

        // A corrupt file is replaced rather than merged into
        let mut map = self.read_map().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable session file: {}", e);
            BTreeMap::new()
        });
        apply_to_map(&mut map, changes);
        self.write_map(&map)
    }
}
