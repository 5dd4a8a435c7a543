//! Real-time WebSocket engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Time allowed to write one frame to the peer, in seconds.
    #[serde(default = "default_write_wait")]
    pub write_wait_seconds: u64,
    /// Time allowed between pongs from the peer, in seconds.
    #[serde(default = "default_pong_wait")]
    pub pong_wait_seconds: u64,
    /// Maximum inbound frame size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Capacity of each connection's outbound queue.
    #[serde(default = "default_send_buffer")]
    pub send_buffer_size: usize,
    /// How long a push may wait for queue space before the slow
    /// connection is dropped, in milliseconds.
    #[serde(default = "default_push_timeout")]
    pub push_timeout_ms: u64,
    /// Encrypt envelopes for connections that carry a session key.
    #[serde(default)]
    pub encryption_enabled: bool,
    /// TTL of the user → connection session record, in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

impl RealtimeConfig {
    /// Write deadline applied to each outbound frame.
    pub fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_seconds)
    }

    /// Rolling read deadline, advanced by every pong.
    pub fn pong_wait(&self) -> Duration {
        Duration::from_secs(self.pong_wait_seconds)
    }

    /// Ping period: nine tenths of the pong wait, so a ping always lands
    /// before the peer's read deadline.
    pub fn ping_period(&self) -> Duration {
        self.pong_wait() * 9 / 10
    }

    /// Upper bound on waiting for outbound queue space.
    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }

    /// Session record TTL.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    /// Rejects timings the pumps cannot run with. A pong wait under two
    /// seconds leaves no room for a ping period; a zero write wait times out
    /// every write.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pong_wait_seconds < 2 {
            return Err(AppError::configuration(format!(
                "realtime.pong_wait_seconds must be at least 2, got {}",
                self.pong_wait_seconds
            )));
        }
        if self.write_wait_seconds == 0 {
            return Err(AppError::configuration(
                "realtime.write_wait_seconds must be greater than 0",
            ));
        }
        if self.max_message_size == 0 {
            return Err(AppError::configuration(
                "realtime.max_message_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            write_wait_seconds: default_write_wait(),
            pong_wait_seconds: default_pong_wait(),
            max_message_size: default_max_message_size(),
            send_buffer_size: default_send_buffer(),
            push_timeout_ms: default_push_timeout(),
            encryption_enabled: false,
            session_ttl_seconds: default_session_ttl(),
        }
    }
}

fn default_write_wait() -> u64 {
    10
}

fn default_pong_wait() -> u64 {
    60
}

fn default_max_message_size() -> usize {
    2048
}

fn default_send_buffer() -> usize {
    256
}

fn default_push_timeout() -> u64 {
    1000
}

fn default_session_ttl() -> u64 {
    86_400
}
