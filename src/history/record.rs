use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single logged send or receive event.
///
/// Serialized as `{"createdAt": "<RFC 3339>", "message": "<payload>"}` so
/// stored logs stay readable by other clients of the same keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    message: String,
}

impl MessageRecord {
    /// Record `message` as happening now.
    pub fn now(message: impl Into<String>) -> Self {
        Self::at(OffsetDateTime::now_utc(), message)
    }

    pub fn at(created_at: OffsetDateTime, message: impl Into<String>) -> Self {
        Self {
            created_at,
            message: message.into(),
        }
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
