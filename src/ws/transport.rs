//! Connector seam between the session and the network.
//!
//! The session only needs to open a socket, write payloads, and read
//! messages until the socket ends. [`TungsteniteConnector`] does that over
//! the network; tests plug in in-process transports.

use super::connection::WebSocket;
use super::message::{CloseCode, CloseFrame, Message};
use crate::base::neterror::NetError;
use futures::future::BoxFuture;
use futures::FutureExt;

/// An open socket.
pub trait Transport: Send + Sync {
    /// Write one message.
    fn send(&self, msg: Message) -> BoxFuture<'_, Result<(), NetError>>;

    /// Read the next message. `Ok(None)` means the peer ended the stream.
    fn recv(&self) -> BoxFuture<'_, Result<Option<Message>, NetError>>;

    /// Start a normal close handshake.
    fn close(&self) -> BoxFuture<'_, Result<(), NetError>> {
        self.send(Message::Close(Some(CloseFrame::new(CloseCode::NORMAL, ""))))
    }
}

/// Opens sockets for a URL.
pub trait Connector: Send + Sync {
    fn connect<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn Transport>, NetError>>;
}

impl Transport for WebSocket {
    fn send(&self, msg: Message) -> BoxFuture<'_, Result<(), NetError>> {
        WebSocket::send(self, msg).boxed()
    }

    fn recv(&self) -> BoxFuture<'_, Result<Option<Message>, NetError>> {
        WebSocket::recv(self).boxed()
    }
}

/// Connector backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    fn connect<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn Transport>, NetError>> {
        async move {
            let ws = WebSocket::connect(url).await?;
            Ok(Box::new(ws) as Box<dyn Transport>)
        }
        .boxed()
    }
}
