//! WebSocket connection with tokio-tungstenite.
//!
//! Scheme checking is left to the handshake: tungstenite refuses anything
//! other than `ws://` and `wss://`, and that refusal is reported as
//! [`NetError::ConnectionFailed`] like any other connect failure.

use super::message::{CloseCode, CloseFrame, Message};
use crate::base::neterror::NetError;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

/// Type alias for the WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connection.
///
/// Thread-safe wrapper around a WebSocket stream. Sending and receiving lock
/// separate halves, so a reader parked in [`recv`](Self::recv) never blocks
/// a writer.
pub struct WebSocket {
    sink: Arc<Mutex<SplitSink<WsStream, tungstenite::Message>>>,
    stream: Arc<Mutex<SplitStream<WsStream>>>,
    url: String,
}

impl WebSocket {
    /// Connect to a WebSocket server.
    ///
    /// # Example
    /// ```ignore
    /// let ws = WebSocket::connect("wss://echo.websocket.org").await?;
    /// ```
    pub async fn connect(url: &str) -> Result<Self, NetError> {
        let (ws_stream, _response) = connect_async(url).await.map_err(|e| {
            tracing::debug!("WebSocket connect error for {}: {:?}", url, e);
            match e {
                tungstenite::Error::Url(_) => NetError::InvalidUrl,
                tungstenite::Error::Protocol(_) => NetError::WsProtocolError,
                _ => NetError::ConnectionFailed,
            }
        })?;

        let (sink, stream) = ws_stream.split();

        Ok(Self {
            sink: Arc::new(Mutex::new(sink)),
            stream: Arc::new(Mutex::new(stream)),
            url: url.to_string(),
        })
    }

    /// Get the URL this WebSocket is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a message.
    pub async fn send(&self, msg: Message) -> Result<(), NetError> {
        let tung_msg = message_to_tungstenite(msg);
        let mut sink = self.sink.lock().await;
        sink.send(tung_msg).await.map_err(|e| {
            tracing::debug!("WebSocket send error: {:?}", e);
            NetError::ConnectionClosed
        })
    }

    /// Send a text message.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), NetError> {
        self.send(Message::Text(text.into())).await
    }

    /// Receive a message.
    ///
    /// Returns `None` if the connection is closed.
    pub async fn recv(&self) -> Result<Option<Message>, NetError> {
        let mut stream = self.stream.lock().await;
        match stream.next().await {
            Some(Ok(msg)) => Ok(Some(tungstenite_to_message(msg))),
            Some(Err(e)) => {
                tracing::debug!("WebSocket recv error: {:?}", e);
                Err(NetError::ConnectionClosed)
            }
            None => Ok(None),
        }
    }

    /// Close the connection with optional code and reason.
    pub async fn close(&self, frame: Option<CloseFrame>) -> Result<(), NetError> {
        self.send(Message::Close(frame)).await
    }
}

/// Convert our Message to tungstenite Message.
fn message_to_tungstenite(msg: Message) -> tungstenite::Message {
    match msg {
        Message::Text(s) => tungstenite::Message::Text(s),
        Message::Binary(b) => tungstenite::Message::Binary(b.to_vec()),
        Message::Ping(d) => tungstenite::Message::Ping(d),
        Message::Pong(d) => tungstenite::Message::Pong(d),
        Message::Close(frame) => {
            let tung_frame = frame.map(|f| tungstenite::protocol::CloseFrame {
                code: tungstenite::protocol::frame::coding::CloseCode::from(f.code.0),
                reason: f.reason.into(),
            });
            tungstenite::Message::Close(tung_frame)
        }
    }
}

/// Convert tungstenite Message to our Message.
fn tungstenite_to_message(msg: tungstenite::Message) -> Message {
    match msg {
        tungstenite::Message::Text(s) => Message::Text(s.to_string()),
        tungstenite::Message::Binary(b) => Message::Binary(Bytes::from(b)),
        tungstenite::Message::Ping(d) => Message::Ping(d),
        tungstenite::Message::Pong(d) => Message::Pong(d),
        tungstenite::Message::Close(frame) => {
            let our_frame = frame.map(|f| CloseFrame {
                code: CloseCode(f.code.into()),
                reason: f.reason.to_string(),
            });
            Message::Close(our_frame)
        }
        tungstenite::Message::Frame(_) => Message::Binary(Bytes::new()),
    }
}
