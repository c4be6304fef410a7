//! In-memory sink for development and testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::{NotificationSink, OperatorEvent, SinkStatus};

struct Buffer<M, D> {
    events: VecDeque<Arc<OperatorEvent<M, D>>>,
    /// Total notifications ever received, including evicted ones.
    received: usize,
}

/// Bounded in-memory notification log.
///
/// Clones share the same buffer, so one handle can be registered with an
/// operator while another inspects what arrived. Oldest events are evicted
/// once `max_events` is reached.
pub struct InMemorySink<M, D> {
    inner: Arc<(Mutex<Buffer<M, D>>, Condvar)>,
    max_events: usize,
}

impl<M, D> Clone for InMemorySink<M, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_events: self.max_events,
        }
    }
}

impl<M, D> InMemorySink<M, D> {
    /// Create a sink retaining at most `max_events` notifications.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: Arc::new((
                Mutex::new(Buffer {
                    events: VecDeque::with_capacity(max_events.min(1024)),
                    received: 0,
                }),
                Condvar::new(),
            )),
            max_events,
        }
    }

    /// Snapshot of retained notifications, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<Arc<OperatorEvent<M, D>>> {
        self.inner.0.lock().events.iter().cloned().collect()
    }

    /// Total notifications received so far.
    #[must_use]
    pub fn received(&self) -> usize {
        self.inner.0.lock().received
    }

    /// Block until at least `count` notifications have been received or
    /// `timeout` expires. Returns whether the count was reached.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (lock, condvar) = self.inner.as_ref();
        let mut buffer = lock.lock();
        while buffer.received < count {
            if condvar.wait_until(&mut buffer, deadline).timed_out() {
                return buffer.received >= count;
            }
        }
        true
    }
}

impl<M: Send + Sync, D: Send + Sync> NotificationSink<M, D> for InMemorySink<M, D> {
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus {
        let (lock, condvar) = self.inner.as_ref();
        let mut buffer = lock.lock();
        if self.max_events > 0 && buffer.events.len() >= self.max_events {
            buffer.events.pop_front();
        }
        if self.max_events > 0 {
            buffer.events.push_back(Arc::clone(event));
        }
        buffer.received += 1;
        drop(buffer);
        condvar.notify_all();
        SinkStatus::Open
    }
}
