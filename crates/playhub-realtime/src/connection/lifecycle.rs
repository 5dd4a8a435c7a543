//! Spawning the two pumps and guaranteeing teardown when either exits.

use std::any::Any;
use std::backtrace::Backtrace;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, Sink, Stream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use playhub_core::config::realtime::RealtimeConfig;

use crate::command::CommandRegistry;
use crate::session::SessionStore;

use super::frame::{Frame, TransportError};
use super::handle::Connection;
use super::reader::Reader;
use super::writer::Writer;

/// Timing and size limits applied by the pumps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PumpSettings {
    pub(crate) write_wait: Duration,
    pub(crate) pong_wait: Duration,
    pub(crate) ping_period: Duration,
    pub(crate) max_message_size: usize,
}

impl From<&RealtimeConfig> for PumpSettings {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            write_wait: config.write_wait(),
            pong_wait: config.pong_wait(),
            ping_period: config.ping_period(),
            max_message_size: config.max_message_size,
        }
    }
}

/// Join handles of a connection's pumps.
#[derive(Debug)]
pub struct PumpHandles {
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl PumpHandles {
    /// Waits until both pumps have exited and the socket is closed.
    pub async fn join(self) {
        let _ = tokio::join!(self.reader, self.writer);
    }
}

/// Tears the connection down when dropped, on every exit path.
struct ReleaseGuard(Arc<Connection>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Spawns the reader and writer pumps for `conn`.
pub(crate) fn spawn_pumps<R, W>(
    conn: Arc<Connection>,
    queue: mpsc::Receiver<String>,
    stream: R,
    sink: W,
    commands: CommandRegistry,
    sessions: Arc<dyn SessionStore>,
    settings: PumpSettings,
) -> PumpHandles
where
    R: Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static,
    W: Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
{
    let reader = Reader {
        conn: conn.clone(),
        commands,
        sessions,
        pong_wait: settings.pong_wait,
        max_message_size: settings.max_message_size,
    };
    let writer = Writer {
        conn: conn.clone(),
        queue,
        write_wait: settings.write_wait,
        ping_period: settings.ping_period,
    };

    let writer = tokio::spawn(guarded(conn.clone(), "writer", writer.run(sink)));
    let reader = tokio::spawn(guarded(conn, "reader", reader.run(stream)));

    PumpHandles { reader, writer }
}

/// Runs one pump, turning a panic into an ordinary exit. Teardown runs
/// however the pump ends.
async fn guarded<F>(conn: Arc<Connection>, pump: &'static str, body: F)
where
    F: Future<Output = Result<(), TransportError>>,
{
    let conn_id = conn.id();
    let _guard = ReleaseGuard(conn);

    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(Ok(())) => debug!(conn_id = %conn_id, pump, "Pump finished"),
        Ok(Err(e)) => info!(conn_id = %conn_id, pump, error = %e, "Pump stopped"),
        Err(panic) => error!(
            conn_id = %conn_id,
            pump,
            panic = %panic_message(panic.as_ref()),
            backtrace = %Backtrace::force_capture(),
            "Pump panicked"
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
