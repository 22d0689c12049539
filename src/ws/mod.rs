//! WebSocket client support.
//!
//! Provides WebSocket connections using tokio-tungstenite, and the
//! [`Connector`]/[`Transport`] traits the session drives them through.
//!
//! # Example
//! ```ignore
//! use wsconsole::ws::{Message, WebSocket};
//!
//! let ws = WebSocket::connect("wss://echo.websocket.org").await?;
//! ws.send(Message::Text("Hello".into())).await?;
//! let msg = ws.recv().await?;
//! ```

mod connection;
mod message;
mod transport;

pub use connection::WebSocket;
pub use message::{CloseCode, CloseFrame, Message};
pub use transport::{Connector, Transport, TungsteniteConnector};
