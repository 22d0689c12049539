use std::io;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("WebSocket protocol error")]
    WsProtocolError,

    // Session Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("No message record at index {index}")]
    RecordNotFound { index: usize },
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    /// Create a storage error from any displayable cause.
    pub fn storage(message: impl Into<String>) -> Self {
        NetError::Storage {
            message: message.into(),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionFailed => -104,
            NetError::WsProtocolError => -145,

            NetError::InvalidUrl => -300,
            // Session codes (custom codes starting at -910)
            NetError::RecordNotFound { .. } => -910,
            NetError::Storage { .. } => -911,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -104 => NetError::ConnectionFailed,
            -145 => NetError::WsProtocolError,
            -300 => NetError::InvalidUrl,
            _ => NetError::Unknown(code),
        }
    }
}

impl From<io::Error> for NetError {
    fn from(err: io::Error) -> Self {
        NetError::storage(err.to_string())
    }
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::storage(format!("invalid JSON: {err}"))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for NetError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ffi::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ffi::ErrorCode::DatabaseLocked =>
            {
                NetError::storage("database is locked")
            }
            _ => NetError::storage(err.to_string()),
        }
    }
}
