//! Per-socket driver task.
//!
//! One driver owns one socket for its whole life. It reports what happens
//! to the session as [`SocketEvent`]s tagged with the socket's generation,
//! and writes whatever arrives on its outbound channel. Dropping the
//! outbound sender closes the socket.

use crate::ws::{Connector, Message};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events delivered to the session, in order, on one channel.
#[derive(Debug)]
pub(crate) enum SocketEvent {
    Opened { generation: u64 },
    Received { generation: u64, payload: String },
    Closed { generation: u64 },
    ReconnectDue { timer: u64 },
}

pub(crate) async fn run_socket(
    connector: Arc<dyn Connector>,
    url: String,
    generation: u64,
    events: mpsc::UnboundedSender<SocketEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let transport = match connector.connect(&url).await {
        Ok(transport) => transport,
        Err(e) => {
            tracing::debug!("Connection to {} failed: {}", url, e);
            let _ = events.send(SocketEvent::Closed { generation });
            return;
        }
    };

    tracing::info!("Connected to {}", url);
    let _ = events.send(SocketEvent::Opened { generation });

    loop {
        tokio::select! {
            out = outbound.recv() => match out {
                Some(payload) => {
                    if let Err(e) = transport.send(Message::Text(payload)).await {
                        tracing::debug!("Send on {} failed: {}", url, e);
                    }
                }
                None => {
                    // Session replaced or dropped this socket.
                    if let Err(e) = transport.close().await {
                        tracing::debug!("Close on {} failed: {}", url, e);
                    }
                    break;
                }
            },
            msg = transport.recv() => match msg {
                Ok(Some(msg)) if msg.is_close() => break,
                Ok(Some(msg)) => {
                    if let Some(payload) = msg.into_payload() {
                        let _ = events.send(SocketEvent::Received { generation, payload });
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("Receive on {} failed: {}", url, e);
                    break;
                }
            },
        }
    }

    tracing::info!("Disconnected from {}", url);
    let _ = events.send(SocketEvent::Closed { generation });
}
