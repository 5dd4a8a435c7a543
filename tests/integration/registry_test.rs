//! Hub and session consistency across connect, reconnect and disconnect.

use serde_json::json;

use playhub_core::types::UserId;
use playhub_realtime::PeerIdentity;
use playhub_realtime::PushOutcome;
use playhub_realtime::SessionStore;
use playhub_realtime::connection::{Frame, TransportError};

use crate::hub_harness::{Harness, parse};

#[tokio::test]
async fn test_push_then_read_error_clears_registry() {
    let harness = Harness::new();
    let hub = harness.engine.hub().clone();
    let mut a = harness.connect("u1").await;
    let u1 = UserId::from("u1");

    assert_eq!(hub.owner_of(&u1), Some(a.conn.id()));

    let outcome = hub.push_uid(&u1, "greet", &json!({"msg": "hi"})).await;
    assert_eq!(outcome, PushOutcome::Queued);
    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame), json!({"command": "greet", "data": {"msg": "hi"}}));

    a.peer.fail(TransportError::Io("connection reset".into())).await;
    a.pumps.join().await;

    assert!(hub.get(a.conn.id()).is_none());
    assert_eq!(hub.owner_of(&u1), None);
    assert_eq!(hub.connection_count(), 0);
    assert!(a.conn.is_closed());
}

#[tokio::test]
async fn test_accept_claims_session() {
    let harness = Harness::new();
    let a = harness.connect("u1").await;

    let owner = harness
        .sessions
        .owning_connection(&UserId::from("u1"))
        .await
        .unwrap();
    assert_eq!(owner, Some(a.conn.id()));
}

#[tokio::test]
async fn test_stale_close_does_not_touch_new_session() {
    let harness = Harness::new();
    let hub = harness.engine.hub().clone();
    let u1 = UserId::from("u1");

    let mut a = harness.connect("u1").await;
    let mut b = harness.connect("u1").await;
    assert_eq!(hub.owner_of(&u1), Some(b.conn.id()));

    a.peer.close(1000, "app restart").await;
    a.pumps.join().await;

    assert_eq!(
        harness.sessions.owning_connection(&u1).await.unwrap(),
        Some(b.conn.id())
    );
    assert_eq!(hub.owner_of(&u1), Some(b.conn.id()));
    assert!(harness.offline_users().is_empty());
    assert!(!b.conn.is_closed());

    let outcome = hub.push_uid(&u1, "greet", &json!({"msg": "still here"})).await;
    assert_eq!(outcome, PushOutcome::Queued);
    assert!(b.peer.recv_text().await.is_some());

    b.peer.close(1000, "bye").await;
    b.pumps.join().await;

    assert_eq!(harness.offline_users(), vec!["u1".to_string()]);
    assert_eq!(harness.sessions.owning_connection(&u1).await.unwrap(), None);
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn test_read_error_skips_offline_hook() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    a.peer.hang_up();
    a.pumps.join().await;

    assert!(harness.offline_users().is_empty());
    assert_eq!(
        harness
            .sessions
            .owning_connection(&UserId::from("u1"))
            .await
            .unwrap(),
        Some(a.conn.id())
    );
}

#[tokio::test]
async fn test_anonymous_peer_is_tracked_by_id_only() {
    let harness = Harness::new();
    let hub = harness.engine.hub().clone();
    let mut anon = harness.connect_as(PeerIdentity::anonymous()).await;

    assert_eq!(hub.connection_count(), 1);
    assert_eq!(hub.user_count(), 0);
    assert!(harness.sessions.is_empty());

    anon.peer.close(1000, "").await;
    anon.pumps.join().await;
    assert!(harness.offline_users().is_empty());
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn test_push_users_reaches_online_users_only() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;
    let mut b = harness.connect("u2").await;

    let targets = [UserId::from("u1"), UserId::from("u3"), UserId::from("u2")];
    let queued = harness.engine.push_users(&targets, "tick", &7).await;
    assert_eq!(queued, 2);

    for peer in [&mut a.peer, &mut b.peer] {
        let frame = peer.recv_text().await.unwrap();
        assert_eq!(parse(&frame), json!({"command": "tick", "data": 7}));
    }
}

#[tokio::test]
async fn test_shutdown_closes_every_socket() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;
    let mut anon = harness.connect_as(PeerIdentity::anonymous()).await;

    assert_eq!(harness.engine.shutdown(), 2);

    for peer in [&mut a.peer, &mut anon.peer] {
        assert!(matches!(peer.recv().await, Some(Frame::Close(_))));
        assert!(peer.recv().await.is_none());
    }
    assert_eq!(harness.engine.hub().connection_count(), 0);
}
