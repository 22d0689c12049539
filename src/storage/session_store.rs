//! Typed access to the persisted session keys.

use super::KeyValueStore;
use crate::base::context::StorageResultExt;
use crate::base::neterror::NetError;
use crate::history::{LogKind, MessageLog, MessageRecord};

/// Persisted key names.
pub mod keys {
    pub const WS_URL: &str = "wsUrl";
    pub const SENT_MESSAGES: &str = "sendedMessages";
    pub const RECEIVED_MESSAGES: &str = "receivedMessages";
    pub const RECONNECT: &str = "reconnect";
}

fn log_key(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Sent => keys::SENT_MESSAGES,
        LogKind::Received => keys::RECEIVED_MESSAGES,
    }
}

/// Session state persistence on top of a [`KeyValueStore`].
///
/// Loads never fail on bad data: an unreadable value is logged and
/// treated as absent. Backend errors still propagate.
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Last endpoint URL the user connected to.
    pub fn load_url(&self) -> Result<Option<String>, NetError> {
        let Some(raw) = self.store.get(keys::WS_URL)? else {
            return Ok(None);
        };
        // Older stores kept the URL as a bare string.
        let url = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        Ok(Some(url).filter(|u| !u.is_empty()))
    }

    pub fn save_url(&self, url: &str) -> Result<(), NetError> {
        let json = serde_json::to_string(url).key_context(keys::WS_URL)?;
        self.store.set(keys::WS_URL, &json)
    }

    pub fn load_reconnect(&self) -> Result<bool, NetError> {
        Ok(self.load_json(keys::RECONNECT)?.unwrap_or(false))
    }

    pub fn save_reconnect(&self, enabled: bool) -> Result<(), NetError> {
        self.store
            .set(keys::RECONNECT, if enabled { "true" } else { "false" })
    }

    /// Load a log, trimmed to `capacity`.
    pub fn load_log(&self, kind: LogKind, capacity: usize) -> Result<MessageLog, NetError> {
        let records: Vec<MessageRecord> = self.load_json(log_key(kind))?.unwrap_or_default();
        Ok(MessageLog::from_records(records, capacity))
    }

    pub fn save_log(&self, kind: LogKind, log: &MessageLog) -> Result<(), NetError> {
        let key = log_key(kind);
        let json = serde_json::to_string(log.records()).key_context(key)?;
        self.store.set(key, &json)
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, NetError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw).key_context(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored value: {}", e);
                Ok(None)
            }
        }
    }
}
