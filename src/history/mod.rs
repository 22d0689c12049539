//! Sent and received message history.
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`MessageRecord`](record::MessageRecord) | One timestamped payload, immutable |
//! | [`MessageLog`](log::MessageLog) | Newest-first list capped at 50 records |
//! | [`render`] | Timestamp formatting and JSON pretty-print fallback |

pub mod log;
pub mod record;
pub mod render;

pub use log::{LogKind, MessageLog, DEFAULT_LOG_CAPACITY};
pub use record::MessageRecord;
