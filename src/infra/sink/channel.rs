//! Channel-backed sink forwarding notifications to another thread.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::core::{NotificationSink, OperatorEvent, SinkStatus};

/// Forwards every notification into an unbounded crossbeam channel.
///
/// Closes itself once the receiving side is dropped.
pub struct ChannelSink<M, D> {
    tx: Sender<Arc<OperatorEvent<M, D>>>,
}

impl<M, D> ChannelSink<M, D> {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(tx: Sender<Arc<OperatorEvent<M, D>>>) -> Self {
        Self { tx }
    }
}

impl<M: Send + Sync, D: Send + Sync> NotificationSink<M, D> for ChannelSink<M, D> {
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus {
        match self.tx.send(Arc::clone(event)) {
            Ok(()) => SinkStatus::Open,
            Err(_) => SinkStatus::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskError;

    #[test]
    fn test_forwards_until_receiver_dropped() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink: ChannelSink<u8, u8> = ChannelSink::new(tx);
        let event = Arc::new(OperatorEvent::error("t-1", TaskError::from(anyhow::anyhow!("boom"))));

        assert_eq!(sink.notify(&event), SinkStatus::Open);
        assert_eq!(rx.try_recv().unwrap().ticket(), "t-1");

        drop(rx);
        assert_eq!(sink.notify(&event), SinkStatus::Closed);
    }
}
