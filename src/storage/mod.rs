//! Session persistence.
//!
//! Values are JSON-encoded strings under fixed keys, the same shape as
//! browser local storage. Backends only move strings around;
//! [`SessionStore`] knows the keys and the encoding.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`MemoryStore`] | Tests and `--backend memory` |
//! | [`JsonFileStore`] | Default, one JSON object on disk |
//! | [`SqliteStore`] | Single-table SQLite database |

mod file;
mod memory;
mod session_store;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use session_store::{keys, SessionStore};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::base::neterror::NetError;

/// String key-value persistence with explicit load/save.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, NetError>;
    fn set(&self, key: &str, value: &str) -> Result<(), NetError>;
    fn remove(&self, key: &str) -> Result<(), NetError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, NetError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), NetError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), NetError> {
        (**self).remove(key)
    }
}

/// Map a poisoned lock into a storage error.
pub(crate) fn poisoned<T>(_: std::sync::PoisonError<T>) -> NetError {
    NetError::storage("store lock poisoned")
}
