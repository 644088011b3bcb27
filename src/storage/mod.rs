//! Durable key-value storage for the operator session
//!
//! The session is kept as two entries, the bearer token and the JSON encoded
//! admin user. Writes are applied as a batch so the two entries can never
//! disagree on disk.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "adminToken";

/// Key holding the JSON encoded admin user
pub const USER_KEY: &str = "adminUser";

/// A single mutation in a storage batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Set(String, String),
    Remove(String),
}

impl Change {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        Change::Set(key.to_string(), value.into())
    }

    pub fn remove(key: &str) -> Self {
        Change::Remove(key.to_string())
    }
}

/// Local persistent storage. Access is synchronous.
pub trait SessionStore: Send + Sync {
    /// Read one entry
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply every change or none of them
    fn apply(&self, changes: &[Change]) -> Result<()>;
}

pub(crate) fn apply_to_map(map: &mut std::collections::BTreeMap<String, String>, changes: &[Change]) {
    for change in changes {
        match change {
            Change::Set(key, value) => {
                map.insert(key.clone(), value.clone());
            }
            Change::Remove(key) => {
                map.remove(key);
            }
        }
    }
}
