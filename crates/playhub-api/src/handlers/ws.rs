//! WebSocket upgrade handler and the axum socket adapter.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt, future};
use serde::Deserialize;
use tracing::{error, info};

use playhub_core::error::AppError;
use playhub_realtime::PeerIdentity;
use playhub_realtime::connection::{CloseReason, Frame, TransportError};

use crate::state::AppState;

/// Query parameters of the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Handshake token.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}
///
/// Authenticates before upgrading, so a bad token is a plain HTTP 401.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    let identity = state.authenticator.authenticate(query.token.as_deref())?;
    let max_message_size = state.config.realtime.max_message_size;

    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| serve_socket(state, identity, socket)))
}

/// Hands an upgraded socket to the engine and waits for both pumps.
async fn serve_socket(state: AppState, identity: PeerIdentity, socket: WebSocket) {
    let (sink, stream) = socket.split();

    let stream = stream.map(|result| {
        result
            .map(from_message)
            .map_err(|e| TransportError::Io(e.to_string()))
    });
    let sink = sink
        .sink_map_err(|e| TransportError::Io(e.to_string()))
        .with(|frame: Frame| future::ready(Ok::<_, TransportError>(into_message(frame))));
    let sink = Box::pin(sink);

    match state.engine.accept(identity, stream, sink).await {
        Ok((conn, pumps)) => {
            info!(
                conn_id = %conn.id(),
                user_id = ?conn.user_id(),
                encrypted = conn.session_key().is_some(),
                "WebSocket connection established"
            );
            pumps.join().await;
            info!(conn_id = %conn.id(), user_id = ?conn.user_id(), "WebSocket connection closed");
        }
        Err(e) => error!(error = %e, "Failed to accept WebSocket connection"),
    }
}

fn from_message(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text.as_str().to_owned()),
        Message::Binary(bytes) => Frame::Binary(bytes.to_vec()),
        Message::Ping(bytes) => Frame::Ping(bytes.to_vec()),
        Message::Pong(bytes) => Frame::Pong(bytes.to_vec()),
        Message::Close(close) => Frame::Close(close.map(|c| CloseReason {
            code: c.code,
            reason: c.reason.as_str().to_owned(),
        })),
    }
}

fn into_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.into()),
        Frame::Binary(bytes) => Message::Binary(bytes.into()),
        Frame::Ping(bytes) => Message::Ping(bytes.into()),
        Frame::Pong(bytes) => Message::Pong(bytes.into()),
        Frame::Close(reason) => Message::Close(reason.map(|r| CloseFrame {
            code: r.code,
            reason: r.reason.into(),
        })),
    }
}
