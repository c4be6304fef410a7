//! Two-tier FIFO queue pair feeding the worker.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::util::serde::Priority;

/// High and normal FIFO queues, safe for many producers and one consumer.
///
/// Each tier has its own mutex, held only for a single push or pop, so a
/// producer on one tier never contends with the consumer draining the other.
pub struct WorkQueuePair<T> {
    high: Mutex<VecDeque<T>>,
    normal: Mutex<VecDeque<T>>,
}

impl<T> WorkQueuePair<T> {
    /// Create an empty pair.
    #[must_use]
    pub fn new() -> Self {
        Self {
            high: Mutex::new(VecDeque::new()),
            normal: Mutex::new(VecDeque::new()),
        }
    }

    /// Append `item` to the tail of the tier selected by `priority`.
    pub fn push(&self, item: T, priority: Priority) {
        match priority {
            Priority::High => self.high.lock().push_back(item),
            Priority::Normal => self.normal.lock().push_back(item),
        }
    }

    /// Remove the head of the high tier, if any.
    pub fn try_pop_high(&self) -> Option<T> {
        self.high.lock().pop_front()
    }

    /// Remove the head of the normal tier, if any.
    pub fn try_pop_normal(&self) -> Option<T> {
        self.normal.lock().pop_front()
    }

    /// Items waiting in the high tier.
    pub fn len_high(&self) -> usize {
        self.high.lock().len()
    }

    /// Items waiting in the normal tier.
    pub fn len_normal(&self) -> usize {
        self.normal.lock().len()
    }
}

impl<T> Default for WorkQueuePair<T> {
    fn default() -> Self {
        Self::new()
    }
}
