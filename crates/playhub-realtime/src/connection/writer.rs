//! Writer pump: the only task that writes to or closes the socket.

use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use super::frame::{CloseReason, Frame, TransportError};
use super::handle::Connection;

/// What the writer pump needs besides the socket.
pub(crate) struct Writer {
    pub(crate) conn: Arc<Connection>,
    pub(crate) queue: mpsc::Receiver<String>,
    pub(crate) write_wait: Duration,
    pub(crate) ping_period: Duration,
}

impl Writer {
    /// Drains the outbound queue in order and pings every `ping_period`.
    ///
    /// On teardown or a closed queue it sends a close frame and closes the
    /// sink; on a failed write it just closes the sink.
    pub(crate) async fn run<K>(mut self, mut sink: K) -> Result<(), TransportError>
    where
        K: Sink<Frame, Error = TransportError> + Unpin + Send,
    {
        let shutdown = self.conn.shutdown_token().clone();
        let mut ticker = time::interval_at(Instant::now() + self.ping_period, self.ping_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            let frame = tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                next = self.queue.recv() => match next {
                    Some(text) => Frame::Text(text),
                    None => break Ok(()),
                },
                _ = ticker.tick() => {
                    trace!(conn_id = %self.conn.id(), "Ping");
                    Frame::Ping(Vec::new())
                }
            };

            if let Err(e) = write(&mut sink, frame, self.write_wait).await {
                break Err(e);
            }
        };

        if result.is_ok() {
            let close = Frame::Close(Some(CloseReason::normal()));
            let _ = write(&mut sink, close, self.write_wait).await;
        }
        let _ = time::timeout(self.write_wait, sink.close()).await;

        result
    }
}

/// Writes one frame under the write deadline.
async fn write<K>(sink: &mut K, frame: Frame, write_wait: Duration) -> Result<(), TransportError>
where
    K: Sink<Frame, Error = TransportError> + Unpin,
{
    match time::timeout(write_wait, sink.send(frame)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::WriteTimeout),
    }
}
