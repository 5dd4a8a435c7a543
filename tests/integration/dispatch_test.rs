//! Inbound frames through decode and dispatch.

use serde_json::json;

use playhub_core::config::realtime::RealtimeConfig;
use playhub_realtime::PeerIdentity;
use playhub_realtime::codec::{EnvelopeCodec, SessionKey};
use playhub_realtime::connection::Frame;

use crate::hub_harness::{Harness, parse};

#[tokio::test]
async fn test_echo_with_embedded_newlines() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    a.peer
        .send_text("  {\"command\":\"echo\",\n\"data\":{\"n\":1}}\n")
        .await;
    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame), json!({"command": "echo", "data": {"n": 1}}));
}

#[tokio::test]
async fn test_bad_frames_are_dropped_not_fatal() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    a.peer.send_text("not json at all").await;
    a.peer.send_text(r#"{"command":"no_such_command"}"#).await;
    a.peer.send_text("   ").await;
    a.peer.send(Frame::Binary(vec![0xff, 0xfe])).await;
    a.peer.send_text(r#"{"command":"offline"}"#).await;
    a.peer.send_text(r#"{"command":"echo","data":"alive"}"#).await;

    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame), json!({"command": "echo", "data": "alive"}));
    assert!(!a.conn.is_closed());
    assert!(harness.offline_users().is_empty());
}

#[tokio::test]
async fn test_handler_error_becomes_error_envelope() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    a.peer.send_text(r#"{"command":"reject","data":{}}"#).await;
    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(
        parse(&frame),
        json!({"command": "reject", "error": {"code": 400, "message": "seat is taken"}})
    );
    assert!(!a.conn.is_closed());
}

#[tokio::test]
async fn test_handler_can_push_to_other_user() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;
    let mut b = harness.connect("u2").await;

    a.peer
        .send_text(r#"{"command":"greet_user","data":{"to":"u2","msg":"hi"}}"#)
        .await;
    let frame = b.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame), json!({"command": "greet", "data": {"msg": "hi"}}));
    assert!(!a.conn.is_closed());
}

#[tokio::test]
async fn test_panicking_handler_tears_down_only_its_connection() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;
    let mut b = harness.connect("u2").await;

    a.peer.send_text(r#"{"command":"boom"}"#).await;
    assert!(matches!(a.peer.recv().await, Some(Frame::Close(_))));
    a.pumps.join().await;

    assert!(a.conn.is_closed());
    assert_eq!(harness.engine.hub().connection_count(), 1);

    b.peer.send_text(r#"{"command":"echo","data":1}"#).await;
    assert!(b.peer.recv_text().await.is_some());
}

#[tokio::test]
async fn test_oversized_frame_terminates_connection() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    let padding = "x".repeat(2048);
    a.peer
        .send_text(format!(r#"{{"command":"echo","data":"{padding}"}}"#))
        .await;

    assert!(matches!(a.peer.recv().await, Some(Frame::Close(_))));
    a.pumps.join().await;
    assert!(a.conn.is_closed());
    assert_eq!(harness.engine.hub().connection_count(), 0);
}

#[tokio::test]
async fn test_frame_at_limit_is_accepted() {
    let harness = Harness::new();
    let mut a = harness.connect("u1").await;

    let overhead = r#"{"command":"echo","data":""}"#.len();
    let padding = "x".repeat(2048 - overhead);
    a.peer
        .send_text(format!(r#"{{"command":"echo","data":"{padding}"}}"#))
        .await;

    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame)["data"].as_str().unwrap().len(), padding.len());
}

fn encrypted_harness() -> Harness {
    Harness::with_config(RealtimeConfig {
        encryption_enabled: true,
        ..RealtimeConfig::default()
    })
}

#[tokio::test]
async fn test_encrypted_session_round_trip() {
    let harness = encrypted_harness();
    let mut a = harness
        .connect_as(PeerIdentity::user("u1", Some("k1")))
        .await;

    let codec = EnvelopeCodec::new(true);
    let key = SessionKey::derive("k1").unwrap();
    let frame = codec
        .encode_success("echo", &json!({"hand": ["As", "Kd"]}), Some(&key))
        .unwrap();
    a.peer.send_text(frame).await;

    let reply = a.peer.recv_text().await.unwrap();
    assert!(reply.starts_with('0'));
    let envelope = codec.decode(&reply, Some(&key)).unwrap();
    assert_eq!(envelope.command, "echo");
    assert_eq!(envelope.data, json!({"hand": ["As", "Kd"]}));
}

#[tokio::test]
async fn test_plaintext_to_encrypted_session_is_dropped() {
    let harness = encrypted_harness();
    let mut a = harness
        .connect_as(PeerIdentity::user("u1", Some("k1")))
        .await;
    let key = SessionKey::derive("k1").unwrap();

    a.peer.send_text(r#"{"command":"echo","data":"plain"}"#).await;
    a.peer.send_text("9garbage").await;
    let frame = EnvelopeCodec::new(true)
        .encode_success("echo", &"sealed", Some(&key))
        .unwrap();
    a.peer.send_text(frame).await;

    let reply = a.peer.recv_text().await.unwrap();
    let envelope = EnvelopeCodec::new(true).decode(&reply, Some(&key)).unwrap();
    assert_eq!(envelope.data, json!("sealed"));
}

#[tokio::test]
async fn test_keyless_peer_stays_plaintext_when_encryption_enabled() {
    let harness = encrypted_harness();
    let mut a = harness.connect("u1").await;

    a.peer.send_text(r#"{"command":"echo","data":1}"#).await;
    let frame = a.peer.recv_text().await.unwrap();
    assert_eq!(parse(&frame), json!({"command": "echo", "data": 1}));
}
