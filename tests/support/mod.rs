//! In-process connector for session tests.
//!
//! Every `connect` is recorded and hands the test a [`MockPeer`] playing
//! the server side of the socket. Dropping the peer closes the socket.

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use wsconsole::base::neterror::NetError;
use wsconsole::session::{SessionConfig, SessionManager};
use wsconsole::storage::{MemoryStore, SessionStore};
use wsconsole::ws::{Connector, Message, Transport};

pub struct MockPeer {
    pub url: String,
    pub to_client: mpsc::UnboundedSender<Message>,
    pub from_client: mpsc::UnboundedReceiver<Message>,
}

impl MockPeer {
    pub fn say(&self, text: &str) {
        self.to_client.send(Message::Text(text.to_string())).unwrap();
    }

    pub async fn heard(&mut self) -> Option<Message> {
        self.from_client.recv().await
    }
}

struct MockTransport {
    incoming: tokio::sync::Mutex<mpsc::UnboundedReceiver<Message>>,
    outgoing: mpsc::UnboundedSender<Message>,
}

impl Transport for MockTransport {
    fn send(&self, msg: Message) -> BoxFuture<'_, Result<(), NetError>> {
        let sent = self.outgoing.send(msg).map_err(|_| NetError::ConnectionClosed);
        async move { sent }.boxed()
    }

    fn recv(&self) -> BoxFuture<'_, Result<Option<Message>, NetError>> {
        async move { Ok(self.incoming.lock().await.recv().await) }.boxed()
    }
}

pub struct MockConnector {
    attempts: Mutex<Vec<String>>,
    refuse: Mutex<bool>,
    peers_tx: mpsc::UnboundedSender<MockPeer>,
    peers_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<MockPeer>>,
}

impl MockConnector {
    pub fn new() -> Arc<Self> {
        let (peers_tx, peers_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            attempts: Mutex::new(Vec::new()),
            refuse: Mutex::new(false),
            peers_tx,
            peers_rx: tokio::sync::Mutex::new(peers_rx),
        })
    }

    /// Make subsequent connects fail.
    pub fn refuse(&self, refuse: bool) {
        *self.refuse.lock().unwrap() = refuse;
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Server side of the next accepted socket.
    pub async fn next_peer(&self) -> MockPeer {
        self.peers_rx
            .lock()
            .await
            .recv()
            .await
            .expect("connector dropped")
    }
}

impl Connector for MockConnector {
    fn connect<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn Transport>, NetError>> {
        self.attempts.lock().unwrap().push(url.to_string());
        let refused = *self.refuse.lock().unwrap();

        let result = if refused {
            Err(NetError::ConnectionFailed)
        } else {
            let (to_client, incoming) = mpsc::unbounded_channel();
            let (outgoing, from_client) = mpsc::unbounded_channel();
            let _ = self.peers_tx.send(MockPeer {
                url: url.to_string(),
                to_client,
                from_client,
            });
            Ok(Box::new(MockTransport {
                incoming: tokio::sync::Mutex::new(incoming),
                outgoing,
            }) as Box<dyn Transport>)
        };
        async move { result }.boxed()
    }
}

pub fn open_session(
    raw: &MemoryStore,
    connector: &Arc<MockConnector>,
) -> SessionManager<MemoryStore> {
    SessionManager::open(
        SessionStore::new(raw.clone()),
        connector.clone(),
        SessionConfig::default(),
    )
    .unwrap()
}
