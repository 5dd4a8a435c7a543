//! Ping/pong liveness under a paused clock.

use std::time::Duration;

use tokio::time::{self, Instant};

use playhub_realtime::connection::Frame;

use crate::hub_harness::Harness;

/// Paused-clock timers land on the next millisecond tick.
fn within(elapsed: Duration, secs: u64) -> bool {
    elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs) + Duration::from_millis(50)
}

#[tokio::test(start_paused = true)]
async fn test_silent_peer_dropped_at_pong_wait() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;
    let start = Instant::now();

    let mut pings = 0;
    loop {
        match a.peer.recv().await {
            Some(Frame::Ping(_)) => {
                pings += 1;
                assert!(within(start.elapsed(), 54));
            }
            Some(Frame::Close(_)) | None => break,
            Some(other) => panic!("unexpected frame {other:?}"),
        }
    }

    assert_eq!(pings, 1);
    assert!(within(start.elapsed(), 60));
    a.pumps.join().await;
    assert!(a.conn.is_closed());
    assert_eq!(harness.engine.hub().connection_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ponging_peer_stays_connected() {
    let harness = Harness::new();
    let a = harness.connect("u1").await;
    let mut peer = a.peer;

    let responder = tokio::spawn(async move {
        let mut pings = 0u32;
        while let Some(frame) = peer.recv().await {
            if let Frame::Ping(_) = frame {
                pings += 1;
                peer.pong().await;
            }
        }
        pings
    });

    time::sleep(Duration::from_secs(600)).await;
    assert!(!a.conn.is_closed());
    assert_eq!(harness.engine.hub().connection_count(), 1);

    harness.engine.shutdown();
    let pings = responder.await.unwrap();
    assert_eq!(pings, 11);
    a.pumps.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_late_pong_does_not_rescue() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    time::sleep(Duration::from_secs(61)).await;
    assert!(a.conn.is_closed());
    assert!(matches!(a.peer.recv().await, Some(Frame::Ping(_))));
    assert!(matches!(a.peer.recv().await, Some(Frame::Close(_))));
    a.pumps.join().await;
}
