//! Session store outages must not leak connections or block teardown.

use playhub_core::error::ErrorKind;
use playhub_core::types::UserId;
use playhub_realtime::PeerIdentity;
use playhub_realtime::SessionStore;
use playhub_realtime::connection::memory;

use crate::hub_harness::Harness;

#[tokio::test]
async fn test_failed_claim_rejects_before_registering() {
    let harness = Harness::new();
    harness.sessions.fail_claims();

    let (stream, sink, _peer) = memory::pair();
    let result = harness
        .engine
        .accept(PeerIdentity::user("u1", None), stream, sink)
        .await;

    let Err(err) = result else {
        panic!("accept succeeded without a session claim");
    };
    assert_eq!(err.kind, ErrorKind::Session);
    assert_eq!(harness.engine.hub().connection_count(), 0);
    assert_eq!(harness.engine.hub().owner_of(&UserId::from("u1")), None);
}

#[tokio::test]
async fn test_failed_lookup_on_close_still_tears_down() {
    let harness = Harness::new();
    let hub = harness.engine.hub().clone();
    let mut a = harness.connect("u1").await;

    harness.sessions.fail_lookups();
    a.peer.close(1000, "bye").await;
    a.pumps.join().await;

    assert_eq!(hub.connection_count(), 0);
    assert_eq!(hub.owner_of(&UserId::from("u1")), None);
    assert!(a.conn.is_closed());
    assert!(harness.offline_users().is_empty());
}

#[tokio::test]
async fn test_failed_release_on_close_still_tears_down() {
    let harness = Harness::new();
    let hub = harness.engine.hub().clone();
    let u1 = UserId::from("u1");
    let mut a = harness.connect("u1").await;

    harness.sessions.fail_releases();
    a.peer.close(1000, "bye").await;
    a.pumps.join().await;

    assert_eq!(hub.connection_count(), 0);
    assert!(a.conn.is_closed());
    assert_eq!(harness.offline_users(), vec!["u1".to_string()]);
    assert_eq!(
        harness.sessions.owning_connection(&u1).await.unwrap(),
        Some(a.conn.id())
    );
}

#[tokio::test]
async fn test_reconnect_after_failed_claim_succeeds() {
    let harness = Harness::new();
    harness.sessions.fail_claims();
    let (stream, sink, _peer) = memory::pair();
    assert!(
        harness
            .engine
            .accept(PeerIdentity::user("u1", None), stream, sink)
            .await
            .is_err()
    );

    harness.sessions.recover();
    let a = harness.connect("u1").await;
    assert_eq!(harness.engine.hub().connection_count(), 1);
    assert_eq!(
        harness
            .sessions
            .owning_connection(&UserId::from("u1"))
            .await
            .unwrap(),
        Some(a.conn.id())
    );
}
