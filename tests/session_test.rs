//! Session manager behavior against an in-process connector.

mod support;

use std::time::Duration;
use support::{open_session, MockConnector};
use tokio::time::Instant;
use wsconsole::base::connstate::ConnectionState;
use wsconsole::base::neterror::NetError;
use wsconsole::history::render::pretty_payload;
use wsconsole::history::LogKind;
use wsconsole::session::SessionUpdate;
use wsconsole::storage::{keys, KeyValueStore, MemoryStore};
use wsconsole::ws::Message;

fn stored_payloads(raw: &MemoryStore, key: &str) -> Vec<String> {
    let json = raw.get(key).unwrap().unwrap_or_else(|| "[]".into());
    let values: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    values
        .iter()
        .map(|v| v["message"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_connect_open_close_states() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);
    assert_eq!(session.state(), ConnectionState::Disconnected);

    session.connect("ws://mock/a").unwrap();
    assert_eq!(session.state(), ConnectionState::Connecting);
    assert_eq!(stored_url(&raw), Some("ws://mock/a".to_string()));

    let peer = connector.next_peer().await;
    assert_eq!(peer.url, "ws://mock/a");
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Opened {
            url: "ws://mock/a".into()
        })
    );
    assert!(session.is_connected());

    drop(peer);
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Closed { reconnect_in: None })
    );
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

fn stored_url(raw: &MemoryStore) -> Option<String> {
    raw.get(keys::WS_URL)
        .unwrap()
        .map(|json| serde_json::from_str(&json).unwrap())
}

#[tokio::test]
async fn test_sent_log_keeps_fifty_newest() {
    let raw = MemoryStore::new();
    raw.set(keys::WS_URL, "\"ws://mock/a\"").unwrap();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    for i in 0..51 {
        session.send(format!("{{\"seq\":{i}}}")).unwrap();
    }

    let log = session.log(LogKind::Sent);
    assert_eq!(log.len(), 50);
    assert_eq!(log.get(0).unwrap().message(), "{\"seq\":50}");
    assert_eq!(log.get(49).unwrap().message(), "{\"seq\":1}");

    let stored = stored_payloads(&raw, keys::SENT_MESSAGES);
    assert_eq!(stored.len(), 50);
    assert_eq!(stored[0], "{\"seq\":50}");
    assert!(!stored.contains(&"{\"seq\":0}".to_string()));

    // Nothing was connected, so nothing was dialed.
    assert!(connector.attempts().is_empty());
}

#[tokio::test]
async fn test_send_transmits_when_open() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let mut peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    session.send("{\"op\":\"subscribe\"}").unwrap();
    assert_eq!(
        peer.heard().await,
        Some(Message::Text("{\"op\":\"subscribe\"}".into()))
    );
}

#[tokio::test]
async fn test_resend_and_copy_use_sent_log() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let mut peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    session.send("first").unwrap();
    session.send("second").unwrap();
    peer.heard().await;
    peer.heard().await;

    assert_eq!(session.copy(1).unwrap(), "first");
    session.resend(1).unwrap();
    assert_eq!(peer.heard().await, Some(Message::Text("first".into())));
    assert_eq!(
        stored_payloads(&raw, keys::SENT_MESSAGES),
        vec!["first", "second", "first"]
    );

    assert_eq!(
        session.resend(7),
        Err(NetError::RecordNotFound { index: 7 })
    );
    assert_eq!(session.log(LogKind::Sent).len(), 3);
}

#[tokio::test]
async fn test_delete_removes_one_record_and_persists() {
    let raw = MemoryStore::new();
    raw.set(keys::WS_URL, "\"ws://mock/a\"").unwrap();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    for payload in ["a", "b", "c"] {
        session.send(payload).unwrap();
    }

    let removed = session.delete(LogKind::Sent, 1).unwrap();
    assert_eq!(removed.message(), "b");
    assert_eq!(stored_payloads(&raw, keys::SENT_MESSAGES), vec!["c", "a"]);

    session.clear(LogKind::Sent).unwrap();
    assert!(stored_payloads(&raw, keys::SENT_MESSAGES).is_empty());
}

#[tokio::test]
async fn test_received_non_json_is_kept_raw() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    peer.say("hello {not json");
    let update = session.next_event().await.unwrap();
    let SessionUpdate::Received(record) = update else {
        panic!("expected Received, got {update:?}");
    };

    assert_eq!(record.message(), "hello {not json");
    assert_eq!(pretty_payload(record.message()), "hello {not json");
    assert_eq!(
        stored_payloads(&raw, keys::RECEIVED_MESSAGES),
        vec!["hello {not json"]
    );

    session.delete(LogKind::Received, 0).unwrap();
    assert!(stored_payloads(&raw, keys::RECEIVED_MESSAGES).is_empty());
}

#[tokio::test]
async fn test_replacing_socket_closes_previous() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let mut first = connector.next_peer().await;
    session.next_event().await.unwrap();

    session.connect("ws://mock/b").unwrap();
    assert!(matches!(first.heard().await, Some(Message::Close(_))));

    let _second = connector.next_peer().await;
    // The first socket's close is absorbed; the next update is the new open.
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Opened {
            url: "ws://mock/b".into()
        })
    );
    assert_eq!(session.endpoint(), "ws://mock/b");
    assert_eq!(stored_url(&raw), Some("ws://mock/b".to_string()));
}

#[tokio::test]
async fn test_payload_queued_before_replace_is_recorded() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let first = connector.next_peer().await;
    session.next_event().await.unwrap();

    first.say("arrived-on-a");
    // Let the driver forward the frame before the socket is replaced.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    session.connect("ws://mock/b").unwrap();
    let _second = connector.next_peer().await;

    let update = session.next_event().await.unwrap();
    let SessionUpdate::Received(record) = update else {
        panic!("expected Received, got {update:?}");
    };
    assert_eq!(record.message(), "arrived-on-a");
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Opened {
            url: "ws://mock/b".into()
        })
    );

    assert_eq!(session.log(LogKind::Received).len(), 1);
    assert_eq!(
        stored_payloads(&raw, keys::RECEIVED_MESSAGES),
        vec!["arrived-on-a"]
    );
    drop(first);
}

#[tokio::test(start_paused = true)]
async fn test_auto_reconnect_once_after_delay_with_stored_url() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.set_auto_reconnect(true).unwrap();
    assert!(connector.attempts().is_empty());

    session.connect("ws://mock/a").unwrap();
    let peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    // The timer rereads the store, so a URL saved elsewhere wins.
    raw.set(keys::WS_URL, "\"ws://mock/b\"").unwrap();

    drop(peer);
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Closed {
            reconnect_in: Some(Duration::from_secs(3))
        })
    );
    let closed_at = Instant::now();

    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Reconnecting {
            url: "ws://mock/b".into()
        })
    );
    let waited = closed_at.elapsed();
    assert!(waited >= Duration::from_secs(3), "waited {waited:?}");
    assert!(waited < Duration::from_millis(3100), "waited {waited:?}");

    let _peer = connector.next_peer().await;
    assert_eq!(
        session.next_event().await,
        Some(SessionUpdate::Opened {
            url: "ws://mock/b".into()
        })
    );

    let idle = tokio::time::timeout(Duration::from_secs(30), session.next_event()).await;
    assert!(idle.is_err());
    assert_eq!(connector.attempts(), vec!["ws://mock/a", "ws://mock/b"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_reconnect_keeps_retrying_at_fixed_delay() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    connector.refuse(true);
    let mut session = open_session(&raw, &connector);
    session.set_auto_reconnect(true).unwrap();

    session.connect("ws://mock/down").unwrap();
    for _ in 0..3 {
        assert_eq!(
            session.next_event().await,
            Some(SessionUpdate::Closed {
                reconnect_in: Some(Duration::from_secs(3))
            })
        );
        let start = Instant::now();
        assert!(matches!(
            session.next_event().await,
            Some(SessionUpdate::Reconnecting { .. })
        ));
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
    // The third retry has to fail before its attempt is certainly recorded.
    assert!(matches!(
        session.next_event().await,
        Some(SessionUpdate::Closed { .. })
    ));
    assert_eq!(connector.attempts().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_manual_connect_cancels_pending_reconnect() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);
    session.set_auto_reconnect(true).unwrap();

    session.connect("ws://mock/a").unwrap();
    let peer = connector.next_peer().await;
    session.next_event().await.unwrap();
    drop(peer);
    session.next_event().await.unwrap();
    assert!(session.reconnect_pending());

    session.connect("ws://mock/c").unwrap();
    assert!(!session.reconnect_pending());
    let _peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    let idle = tokio::time::timeout(Duration::from_secs(10), session.next_event()).await;
    assert!(idle.is_err());
    assert_eq!(connector.attempts(), vec!["ws://mock/a", "ws://mock/c"]);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_timer() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);
    session.set_auto_reconnect(true).unwrap();

    session.connect("ws://mock/a").unwrap();
    let peer = connector.next_peer().await;
    session.next_event().await.unwrap();
    drop(peer);
    session.next_event().await.unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(connector.attempts(), vec!["ws://mock/a"]);
}

#[tokio::test]
async fn test_resume_connects_to_stored_url() {
    let raw = MemoryStore::new();
    raw.set(keys::WS_URL, "\"ws://mock/stored\"").unwrap();
    raw.set(keys::RECONNECT, "true").unwrap();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    assert!(session.auto_reconnect());
    assert!(session.resume().unwrap());
    let peer = connector.next_peer().await;
    assert_eq!(peer.url, "ws://mock/stored");
}

#[tokio::test]
async fn test_shutdown_closes_socket() {
    let raw = MemoryStore::new();
    let connector = MockConnector::new();
    let mut session = open_session(&raw, &connector);

    session.connect("ws://mock/a").unwrap();
    let mut peer = connector.next_peer().await;
    session.next_event().await.unwrap();

    session.shutdown().await;
    assert!(matches!(peer.heard().await, Some(Message::Close(_))));
}
