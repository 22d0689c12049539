//! Ergonomic error context helpers.
//!
//! Provides an extension trait for adding the affected storage key to
//! errors raised by store backends and value codecs.

use crate::base::neterror::NetError;
use std::fmt::Display;

/// Extension trait for adding storage context to Results.
pub trait StorageResultExt<T> {
    /// Add the key being read or written to the error.
    ///
    /// # Example
    /// ```ignore
    /// use wsconsole::base::context::StorageResultExt;
    ///
    /// let log: Vec<MessageRecord> = serde_json::from_str(&raw)
    ///     .key_context("sendedMessages")?;
    /// // Error: "Storage error: sendedMessages: expected value at line 1 column 1"
    /// ```
    fn key_context(self, key: &str) -> Result<T, NetError>;
}

impl<T, E: Display> StorageResultExt<T> for Result<T, E> {
    fn key_context(self, key: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::storage(format!("{key}: {e}")))
    }
}
