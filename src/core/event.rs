//! Notifications emitted by the worker and the observer list that fans them out.

use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::{OperationResult, TaskError};
use crate::util::clock::now_ms;

/// A work item's callback returned successfully.
#[derive(Debug)]
pub struct OperationTriggered<M = Value, D = Value> {
    /// The produced result.
    pub result: OperationResult<M, D>,
    /// Creation time (ms since epoch), captured when the event was built.
    pub created_at_ms: u128,
}

/// A work item's callback failed or panicked.
#[derive(Debug)]
pub struct ErrorOccurred {
    /// Ticket of the failed work item.
    pub ticket: String,
    /// The captured failure.
    pub error: TaskError,
    /// Creation time (ms since epoch), captured when the event was built.
    pub created_at_ms: u128,
}

/// One notification per processed work item.
#[derive(Debug)]
pub enum OperatorEvent<M = Value, D = Value> {
    /// Success notification.
    OperationTriggered(OperationTriggered<M, D>),
    /// Failure notification.
    ErrorOccurred(ErrorOccurred),
}

impl<M, D> OperatorEvent<M, D> {
    /// Build a success notification stamped with the current time.
    #[must_use]
    pub fn triggered(result: OperationResult<M, D>) -> Self {
        Self::OperationTriggered(OperationTriggered {
            result,
            created_at_ms: now_ms(),
        })
    }

    /// Build a failure notification stamped with the current time.
    #[must_use]
    pub fn error(ticket: impl Into<String>, error: TaskError) -> Self {
        Self::ErrorOccurred(ErrorOccurred {
            ticket: ticket.into(),
            error,
            created_at_ms: now_ms(),
        })
    }

    /// Ticket of the work item this event reports on.
    #[must_use]
    pub fn ticket(&self) -> &str {
        match self {
            Self::OperationTriggered(e) => e.result.ticket(),
            Self::ErrorOccurred(e) => &e.ticket,
        }
    }

    /// Creation timestamp in ms since epoch.
    #[must_use]
    pub const fn created_at_ms(&self) -> u128 {
        match self {
            Self::OperationTriggered(e) => e.created_at_ms,
            Self::ErrorOccurred(e) => e.created_at_ms,
        }
    }

    /// The success payload, if this is a success notification.
    #[must_use]
    pub const fn as_triggered(&self) -> Option<&OperationTriggered<M, D>> {
        match self {
            Self::OperationTriggered(e) => Some(e),
            Self::ErrorOccurred(_) => None,
        }
    }

    /// The failure payload, if this is a failure notification.
    #[must_use]
    pub const fn as_error(&self) -> Option<&ErrorOccurred> {
        match self {
            Self::ErrorOccurred(e) => Some(e),
            Self::OperationTriggered(_) => None,
        }
    }
}

/// Whether a sink wants further notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// Keep delivering.
    Open,
    /// The consumer went away; drop this sink.
    Closed,
}

/// Consumer of operator notifications.
///
/// Sinks run on the worker thread in production order and must not block.
pub trait NotificationSink<M, D>: Send {
    /// Receive one notification.
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus;
}

/// Closure listener for success notifications only.
pub struct TriggeredListener<F>(pub F);

impl<M, D, F> NotificationSink<M, D> for TriggeredListener<F>
where
    F: FnMut(&OperationTriggered<M, D>) + Send,
{
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus {
        if let Some(triggered) = event.as_triggered() {
            (self.0)(triggered);
        }
        SinkStatus::Open
    }
}

/// Closure listener for failure notifications only.
pub struct ErrorListener<F>(pub F);

impl<M, D, F> NotificationSink<M, D> for ErrorListener<F>
where
    F: FnMut(&ErrorOccurred) + Send,
{
    fn notify(&mut self, event: &Arc<OperatorEvent<M, D>>) -> SinkStatus {
        if let Some(error) = event.as_error() {
            (self.0)(error);
        }
        SinkStatus::Open
    }
}

/// Sinks plus the number currently out for delivery.
struct Registry<M, D> {
    sinks: Vec<Box<dyn NotificationSink<M, D>>>,
    delivering: usize,
}

/// Ordered observer list fed by the worker.
///
/// Delivery runs with the list unlocked, so a sink may register further
/// sinks (or query the count) from inside `notify`. Sinks added during a
/// delivery start receiving with the next event.
pub(crate) struct Notifier<M, D> {
    registry: Mutex<Registry<M, D>>,
}

impl<M, D> Notifier<M, D> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                sinks: Vec::new(),
                delivering: 0,
            }),
        }
    }

    pub(crate) fn add(&self, sink: Box<dyn NotificationSink<M, D>>) {
        self.registry.lock().sinks.push(sink);
    }

    /// Registered sinks, including those out for delivery.
    pub(crate) fn len(&self) -> usize {
        let registry = self.registry.lock();
        registry.sinks.len() + registry.delivering
    }

    /// Deliver `event` to every sink in subscription order.
    ///
    /// Only the worker thread publishes, so at most one delivery is in flight.
    pub(crate) fn publish(&self, operator: &str, event: OperatorEvent<M, D>) {
        let event = Arc::new(event);
        let mut batch = {
            let mut registry = self.registry.lock();
            registry.delivering = registry.sinks.len();
            mem::take(&mut registry.sinks)
        };

        batch.retain_mut(|sink| {
            match panic::catch_unwind(AssertUnwindSafe(|| sink.notify(&event))) {
                Ok(SinkStatus::Open) => true,
                Ok(SinkStatus::Closed) => {
                    tracing::debug!(operator = %operator, "notification sink closed, removing");
                    false
                }
                Err(payload) => {
                    let err = TaskError::from_panic(&*payload);
                    tracing::error!(
                        operator = %operator,
                        ticket = %event.ticket(),
                        error = %err,
                        "notification sink panicked"
                    );
                    true
                }
            }
        });

        // Survivors keep their place ahead of sinks registered meanwhile.
        let mut registry = self.registry.lock();
        let added = mem::replace(&mut registry.sinks, batch);
        registry.sinks.extend(added);
        registry.delivering = 0;
    }
}
