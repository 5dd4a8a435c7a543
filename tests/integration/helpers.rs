//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use playhub_api::{AppState, build_app};
use playhub_auth::HandshakeEncoder;
use playhub_cache::RecordCache;
use playhub_core::config::AppConfig;
use playhub_core::error::AppError;
use playhub_core::types::UserId;
use playhub_realtime::{CacheSessionStore, CommandRegistry, Connection, RealtimeEngine};

/// Socket client type used by the tests.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Engine behind the router
    pub engine: RealtimeEngine,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application backed by the in-memory cache
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-secret".to_string();
        config.server.allowed_origins = vec!["*".to_string()];

        let records = RecordCache::open(&config.cache)
            .await
            .expect("Failed to open session records");
        let sessions = Arc::new(CacheSessionStore::new(
            records.clone(),
            config.realtime.session_ttl(),
        ));

        let engine = RealtimeEngine::new(config.realtime.clone(), sessions, commands());
        let state = AppState::new(Arc::new(config.clone()), records, engine.clone());

        Self {
            router: build_app(state),
            engine,
            config,
        }
    }

    /// Issue a handshake token signed with the test secret
    pub fn token(&self, user: &str) -> String {
        HandshakeEncoder::new(&self.config.auth)
            .issue(&UserId::from(user), None)
            .expect("Failed to issue token")
    }

    /// Serve the app on an ephemeral port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });
        addr
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Commands available to socket tests.
fn commands() -> CommandRegistry {
    CommandRegistry::builder()
        .register_fn("echo", |conn: Arc<Connection>, data: Value| async move {
            conn.success("echo", &data).await;
            Ok(())
        })
        .register_fn("notify", |conn: Arc<Connection>, data: Value| async move {
            let to = data["to"].as_str().unwrap_or_default();
            let to = UserId::parse(to).ok_or_else(|| AppError::validation("missing target"))?;
            conn.push_uid(&to, "notice", &json!({ "text": data["text"] }))
                .await;
            Ok(())
        })
        .build()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Send one command envelope.
pub async fn send(client: &mut WsClient, command: &str, data: Value) {
    let frame = json!({ "command": command, "data": data }).to_string();
    client
        .send(Message::Text(frame.into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame as JSON, failing after five seconds.
pub async fn recv(client: &mut WsClient) -> Value {
    let next = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(message) = client.next().await {
            if let Message::Text(text) = message.expect("Socket error") {
                return serde_json::from_str::<Value>(text.as_str()).expect("Frame is not JSON");
            }
        }
        panic!("Socket closed before a text frame arrived");
    });
    next.await.expect("Timed out waiting for a frame")
}

/// Wait until `user` has a live connection in `engine`.
pub async fn wait_online(engine: &RealtimeEngine, user: &str) {
    let user = UserId::from(user);
    for _ in 0..100 {
        if engine.hub().is_online(&user) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{user} never came online");
}
