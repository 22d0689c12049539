//! Display helpers for history entries.

use super::record::MessageRecord;
use time::macros::format_description;
use time::OffsetDateTime;

/// Format a record timestamp as `dd/MM/yyyy HH:mm:ss` (UTC).
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");
    at.format(format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Pretty-print a payload as JSON with two-space indentation.
///
/// Payloads that are not valid JSON come back unmodified.
pub fn pretty_payload(payload: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| payload.to_string()),
        Err(_) => payload.to_string(),
    }
}

/// Render one numbered history entry.
pub fn render_record(index: usize, record: &MessageRecord) -> String {
    format!(
        "[{index}] {}\n{}",
        format_timestamp(record.created_at()),
        pretty_payload(record.message())
    )
}
