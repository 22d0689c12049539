//! Endpoint URL checks.
//!
//! [`is_valid_endpoint`] is the gate the connect and send actions sit
//! behind. It is a plain substring test and accepts URLs whose scheme is
//! not a WebSocket scheme at all, as long as `ws`/`http` appears somewhere.
//! [`strict_scheme`] parses the URL and reports those cases so the front
//! end can warn about them.

use std::fmt;
use url::Url;

const SCHEME_HINTS: [&str; 4] = ["http", "https", "ws", "wss"];

/// Substring predicate: contains `://` and one of `http`, `https`, `ws`, `wss`.
pub fn is_valid_endpoint(url: &str) -> bool {
    !url.is_empty() && url.contains("://") && SCHEME_HINTS.iter().any(|hint| url.contains(hint))
}

/// Why a URL that passes [`is_valid_endpoint`] will not open a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeWarning {
    /// Not parseable as a URL.
    Unparseable,
    /// `http`/`https`: the handshake needs `ws`/`wss`.
    HttpScheme(String),
    /// Some other scheme, matched only because a hint appears elsewhere.
    ForeignScheme(String),
}

impl fmt::Display for SchemeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeWarning::Unparseable => write!(f, "URL cannot be parsed"),
            SchemeWarning::HttpScheme(s) => {
                write!(f, "scheme '{s}' is not a WebSocket scheme, use ws:// or wss://")
            }
            SchemeWarning::ForeignScheme(s) => {
                write!(f, "scheme '{s}' only passed because 'ws' or 'http' appears elsewhere in the URL")
            }
        }
    }
}

/// Strict scheme check. `None` means the URL is `ws://` or `wss://`.
pub fn strict_scheme(url: &str) -> Option<SchemeWarning> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return Some(SchemeWarning::Unparseable),
    };
    match parsed.scheme() {
        "ws" | "wss" => None,
        "http" | "https" => Some(SchemeWarning::HttpScheme(parsed.scheme().to_string())),
        other => Some(SchemeWarning::ForeignScheme(other.to_string())),
    }
}
