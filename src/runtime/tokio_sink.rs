//! Tokio adapter delivering notifications to async consumers.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::core::{NotificationSink, OperatorEvent, SinkStatus};

/// Forwards notifications into a tokio unbounded channel.
///
/// Sending never blocks the worker thread, so async consumers can `.await`
/// events without a bridging thread.
pub struct TokioSink<M, D> {
    tx: UnboundedSender<Arc<OperatorEvent<M, D>>>,
}

impl<M, D> TokioSink<M, D> {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(tx: UnboundedSender<Arc<OperatorEvent<M, D>>>) -> Self {
        Self { tx }
    }
}

impl<M: Send + Sync, D: Send + Sync> NotificationSink<M, D> for TokioSink<M, D> {
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus {
        if self.tx.send(Arc::clone(event)).is_ok() {
            SinkStatus::Open
        } else {
            SinkStatus::Closed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskError;

    #[tokio::test]
    async fn test_forwards_to_async_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink: TokioSink<u8, u8> = TokioSink::new(tx);
        let event = Arc::new(OperatorEvent::error("t-1", TaskError::from(anyhow::anyhow!("boom"))));

        assert_eq!(sink.notify(&event), SinkStatus::Open);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.ticket(), "t-1");

        drop(rx);
        assert_eq!(sink.notify(&event), SinkStatus::Closed);
    }
}
