//! # wsconsole
//!
//! An interactive WebSocket test client.
//!
//! `wsconsole` connects to a WebSocket endpoint, sends ad-hoc JSON or text
//! payloads, and keeps a short history of what was sent and received. The
//! session (endpoint URL, both logs, auto-reconnect flag) survives restarts
//! through a small key-value store.
//!
//! ## Features
//!
//! - **Session Manager**: connect, send, receive, with generation-tagged sockets
//! - **Auto-reconnect**: fixed-delay, cancellable reconnect to the stored URL
//! - **Message Logs**: newest-first, capped at 50 records each
//! - **Persistence**: JSON file, SQLite, or in-memory stores
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wsconsole::session::{SessionConfig, SessionManager};
//! use wsconsole::storage::{JsonFileStore, SessionStore};
//! use wsconsole::ws::TungsteniteConnector;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wsconsole::base::neterror::NetError> {
//!     let store = SessionStore::new(JsonFileStore::open("session.json")?);
//!     let mut session =
//!         SessionManager::open(store, Arc::new(TungsteniteConnector), SessionConfig::default())?;
//!     session.connect("ws://localhost:3000")?;
//!     session.send(r#"{"op":"ping"}"#)?;
//!     while let Some(update) = session.next_event().await {
//!         println!("{update:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and connection state
//! - [`history`] - Message records, bounded logs, rendering
//! - [`session`] - Connection session manager and reconnect timer
//! - [`storage`] - Key-value stores and typed session persistence
//! - [`validation`] - Endpoint URL checks
//! - [`ws`] - WebSocket client over tokio-tungstenite

pub mod base;
pub mod history;
pub mod session;
pub mod storage;
pub mod validation;
pub mod ws;
