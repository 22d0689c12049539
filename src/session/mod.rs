//! Connection session management.
//!
//! The session tracks one endpoint at a time:
//!
//! ```text
//! Disconnected --connect--> Connecting --open--> Connected
//!      ^                        |                    |
//!      +--------- close --------+-------- close -----+
//!      |
//!      +-- (auto-reconnect) wait reconnect_delay, reread stored URL --> Connecting
//! ```
//!
//! The reconnect delay is fixed. There is no backoff, jitter or attempt
//! limit, so a flapping endpoint is retried every `reconnect_delay` until
//! auto-reconnect is turned off or the session is dropped.

mod config;
mod driver;
mod manager;

pub use config::{SessionConfig, DEFAULT_RECONNECT_DELAY};
pub use manager::{SessionManager, SessionUpdate};
