//! Connection session manager.
//!
//! [`SessionManager`] owns the socket, the connection state, the
//! auto-reconnect flag and both message logs. All mutation goes through
//! `&mut self`; socket I/O and the reconnect timer run in spawned tasks
//! that only talk back through the event channel drained by
//! [`next_event`](SessionManager::next_event).
//!
//! Every socket gets a fresh generation number. Events carrying an older
//! generation belong to a replaced socket and are dropped. Payloads the
//! socket had already delivered when it was replaced are still recorded.

use super::config::SessionConfig;
use super::driver::{run_socket, SocketEvent};
use crate::base::connstate::ConnectionState;
use crate::base::neterror::NetError;
use crate::history::{LogKind, MessageLog, MessageRecord};
use crate::storage::{KeyValueStore, SessionStore};
use crate::validation::{is_valid_endpoint, strict_scheme};
use crate::ws::Connector;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Upper bound on waiting for a socket to finish its close handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// What changed after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The socket finished its handshake.
    Opened { url: String },
    /// The socket closed or never opened. `reconnect_in` is set when a
    /// reconnect has been scheduled.
    Closed { reconnect_in: Option<Duration> },
    /// A payload arrived and was recorded.
    Received(MessageRecord),
    /// The reconnect timer fired and a new socket is being opened.
    Reconnecting { url: String },
}

struct SocketHandle {
    generation: u64,
    url: String,
    outbound: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

struct ReconnectTimer {
    id: u64,
    task: JoinHandle<()>,
}

/// A WebSocket test session.
///
/// Must be created and driven inside a tokio runtime: connecting spawns
/// the socket driver.
///
/// # Example
/// ```ignore
/// let store = SessionStore::new(JsonFileStore::open("session.json")?);
/// let mut session = SessionManager::open(store, Arc::new(TungsteniteConnector), SessionConfig::default())?;
/// session.connect("ws://localhost:3000")?;
/// while let Some(update) = session.next_event().await {
///     println!("{update:?}");
/// }
/// ```
pub struct SessionManager<S: KeyValueStore> {
    store: SessionStore<S>,
    connector: Arc<dyn Connector>,
    config: SessionConfig,
    endpoint: String,
    state: ConnectionState,
    auto_reconnect: bool,
    sent: MessageLog,
    received: MessageLog,
    socket: Option<SocketHandle>,
    reconnect: Option<ReconnectTimer>,
    next_generation: u64,
    next_timer: u64,
    events_tx: mpsc::UnboundedSender<SocketEvent>,
    events_rx: mpsc::UnboundedReceiver<SocketEvent>,
    // Filled when a socket is replaced with events still queued.
    pending: VecDeque<SessionUpdate>,
    backlog: VecDeque<SocketEvent>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Load persisted state. Does not connect; see [`resume`](Self::resume).
    pub fn open(
        store: SessionStore<S>,
        connector: Arc<dyn Connector>,
        config: SessionConfig,
    ) -> Result<Self, NetError> {
        let endpoint = store.load_url()?.unwrap_or_default();
        let auto_reconnect = store.load_reconnect()?;
        let sent = store.load_log(LogKind::Sent, config.log_capacity)?;
        let received = store.load_log(LogKind::Received, config.log_capacity)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tracing::debug!(
            "Session loaded: endpoint={:?} auto_reconnect={} sent={} received={}",
            endpoint,
            auto_reconnect,
            sent.len(),
            received.len()
        );

        Ok(Self {
            store,
            connector,
            config,
            endpoint,
            state: ConnectionState::Disconnected,
            auto_reconnect,
            sent,
            received,
            socket: None,
            reconnect: None,
            next_generation: 0,
            next_timer: 0,
            events_tx,
            events_rx,
            pending: VecDeque::new(),
            backlog: VecDeque::new(),
        })
    }

    /// Reconnect to the persisted URL, if any. Returns whether a socket
    /// was opened.
    pub fn resume(&mut self) -> Result<bool, NetError> {
        match self.store.load_url()? {
            Some(url) => {
                self.open_socket(&url);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_open()
    }

    /// Current endpoint URL (the last one connected to).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn auto_reconnect(&self) -> bool {
        self.auto_reconnect
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn log(&self, kind: LogKind) -> &MessageLog {
        match kind {
            LogKind::Sent => &self.sent,
            LogKind::Received => &self.received,
        }
    }

    /// Whether a reconnect timer is armed.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect.is_some()
    }

    /// Open a socket to `url`, replacing the current one.
    ///
    /// Fails with [`NetError::InvalidUrl`] when `url` does not pass
    /// [`is_valid_endpoint`]. A URL that passes the check but cannot be
    /// dialed is reported later as [`SessionUpdate::Closed`].
    pub fn connect(&mut self, url: &str) -> Result<(), NetError> {
        if !is_valid_endpoint(url) {
            return Err(NetError::InvalidUrl);
        }
        if let Some(warning) = strict_scheme(url) {
            tracing::warn!("Endpoint {} accepted but likely unusable: {}", url, warning);
        }

        self.endpoint = url.to_string();
        let persisted = self.store.save_url(url);
        self.cancel_reconnect();
        self.open_socket(url);
        persisted
    }

    /// Record `payload` in the sent log and write it to the socket.
    ///
    /// The record is kept even when no socket is open; the write is then
    /// skipped without error.
    pub fn send(&mut self, payload: impl Into<String>) -> Result<(), NetError> {
        if !is_valid_endpoint(&self.endpoint) {
            return Err(NetError::InvalidUrl);
        }

        let payload = payload.into();
        self.sent.push(MessageRecord::now(payload.clone()));
        let persisted = self.store.save_log(LogKind::Sent, &self.sent);
        self.transmit(payload);
        persisted
    }

    /// Send the payload of sent-log entry `index` again.
    pub fn resend(&mut self, index: usize) -> Result<(), NetError> {
        let payload = self.copy(index)?.to_string();
        self.send(payload)
    }

    /// Payload of sent-log entry `index`, for editing before a send.
    pub fn copy(&self, index: usize) -> Result<&str, NetError> {
        self.sent
            .get(index)
            .map(MessageRecord::message)
            .ok_or(NetError::RecordNotFound { index })
    }

    /// Remove exactly one record and persist the log.
    pub fn delete(&mut self, kind: LogKind, index: usize) -> Result<MessageRecord, NetError> {
        let removed = self.log_mut(kind).remove(index)?;
        self.persist_log(kind)?;
        Ok(removed)
    }

    pub fn clear(&mut self, kind: LogKind) -> Result<(), NetError> {
        self.log_mut(kind).clear();
        self.persist_log(kind)
    }

    /// Persist the flag. Turning it off cancels a pending reconnect;
    /// turning it on with no socket connects to the persisted URL.
    pub fn set_auto_reconnect(&mut self, enabled: bool) -> Result<(), NetError> {
        self.auto_reconnect = enabled;
        self.store.save_reconnect(enabled)?;

        if !enabled {
            self.cancel_reconnect();
        } else if self.socket.is_none() {
            if let Some(url) = self.store.load_url()? {
                self.cancel_reconnect();
                self.open_socket(&url);
            }
        }
        Ok(())
    }

    /// Wait for the next socket or timer event and apply it.
    ///
    /// Events from replaced sockets and cancelled timers are absorbed
    /// without returning.
    pub async fn next_event(&mut self) -> Option<SessionUpdate> {
        loop {
            if let Some(update) = self.pending.pop_front() {
                return Some(update);
            }
            let event = match self.backlog.pop_front() {
                Some(event) => event,
                None => self.events_rx.recv().await?,
            };
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
    }

    /// Cancel the timer and close the socket.
    pub async fn shutdown(mut self) {
        self.cancel_reconnect();
        if let Some(SocketHandle { outbound, task, url, .. }) = self.socket.take() {
            drop(outbound);
            let abort = task.abort_handle();
            if tokio::time::timeout(CLOSE_GRACE, task).await.is_err() {
                tracing::debug!("Socket to {} did not close in time", url);
                abort.abort();
            }
        }
        self.state = ConnectionState::Disconnected;
    }

    fn apply(&mut self, event: SocketEvent) -> Option<SessionUpdate> {
        match event {
            SocketEvent::Opened { generation } => {
                let url = self.current(generation)?.url.clone();
                self.state = ConnectionState::Connected;
                Some(SessionUpdate::Opened { url })
            }
            SocketEvent::Received {
                generation,
                payload,
            } => {
                self.current(generation)?;
                let record = MessageRecord::now(payload);
                self.received.push(record.clone());
                if let Err(e) = self.persist_log(LogKind::Received) {
                    tracing::warn!("Failed to persist received log: {}", e);
                }
                Some(SessionUpdate::Received(record))
            }
            SocketEvent::Closed { generation } => {
                self.current(generation)?;
                self.socket = None;
                self.state = ConnectionState::Disconnected;
                let reconnect_in = if self.auto_reconnect {
                    Some(self.schedule_reconnect())
                } else {
                    None
                };
                Some(SessionUpdate::Closed { reconnect_in })
            }
            SocketEvent::ReconnectDue { timer } => {
                if self.reconnect.as_ref().map(|t| t.id) != Some(timer) {
                    return None;
                }
                self.reconnect = None;

                let url = match self.store.load_url() {
                    Ok(Some(url)) => url,
                    Ok(None) => return None,
                    Err(e) => {
                        tracing::warn!("Reconnect skipped, stored URL unreadable: {}", e);
                        return None;
                    }
                };
                tracing::info!("Reconnecting to {}", url);
                self.open_socket(&url);
                Some(SessionUpdate::Reconnecting { url })
            }
        }
    }

    fn current(&self, generation: u64) -> Option<&SocketHandle> {
        self.socket
            .as_ref()
            .filter(|socket| socket.generation == generation)
    }

    fn open_socket(&mut self, url: &str) {
        if self.socket.is_some() {
            self.drain_received();
        }
        // Dropping the old outbound sender makes its driver close it.
        if let Some(old) = self.socket.take() {
            tracing::debug!("Replacing socket to {}", old.url);
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(
            self.connector.clone(),
            url.to_string(),
            generation,
            self.events_tx.clone(),
            outbound_rx,
        ));

        self.socket = Some(SocketHandle {
            generation,
            url: url.to_string(),
            outbound,
            task,
        });
        self.state = ConnectionState::Connecting;
    }

    /// Record payloads already queued for the current socket. Other events
    /// are kept in order for `next_event`.
    fn drain_received(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                SocketEvent::Received { .. } => {
                    if let Some(update) = self.apply(event) {
                        self.pending.push_back(update);
                    }
                }
                other => self.backlog.push_back(other),
            }
        }
    }

    fn transmit(&self, payload: String) {
        match &self.socket {
            Some(socket) if self.state.is_open() => {
                if socket.outbound.send(payload).is_err() {
                    tracing::debug!("Socket to {} already gone, payload recorded only", socket.url);
                }
            }
            _ => tracing::debug!("Not connected, payload recorded only"),
        }
    }

    fn schedule_reconnect(&mut self) -> Duration {
        self.cancel_reconnect();
        self.next_timer += 1;
        let id = self.next_timer;
        let delay = self.config.reconnect_delay;
        let events = self.events_tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SocketEvent::ReconnectDue { timer: id });
        });
        self.reconnect = Some(ReconnectTimer { id, task });
        delay
    }

    fn cancel_reconnect(&mut self) {
        if let Some(timer) = self.reconnect.take() {
            timer.task.abort();
        }
    }

    fn log_mut(&mut self, kind: LogKind) -> &mut MessageLog {
        match kind {
            LogKind::Sent => &mut self.sent,
            LogKind::Received => &mut self.received,
        }
    }

    fn persist_log(&self, kind: LogKind) -> Result<(), NetError> {
        self.store.save_log(kind, self.log(kind))
    }
}

impl<S: KeyValueStore> Drop for SessionManager<S> {
    fn drop(&mut self) {
        self.cancel_reconnect();
        if let Some(socket) = self.socket.take() {
            socket.task.abort();
        }
    }
}
