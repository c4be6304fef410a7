//! Single-worker, two-tier operator.
//!
//! One dedicated OS thread drains a [`WorkQueuePair`], always preferring the
//! high tier, and reports every processed item to the registered
//! notification sinks.
//!
//! # Worker loop
//!
//! Each iteration:
//!
//! 1. Pop the head of the high tier, or else the head of the normal tier,
//!    and invoke it. Errors and panics become `ErrorOccurred`; a returned
//!    value becomes `OperationTriggered`.
//! 2. If both tiers were empty, block on the wake signal.
//! 3. In every case, wait on the wake signal for at most `sleep_ms`. An
//!    enqueue cuts this wait short.
//!
//! The worker lives as long as the process. There is no stop operation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, Thread};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::OperatorConfig;
use crate::infra::sink::ChannelSink;
use crate::util::serde::Priority;

use super::event::Notifier;
use super::{
    ErrorListener, ErrorOccurred, NotificationSink, OperationResult, OperationTriggered,
    OperatorError, OperatorEvent, TaskError, TriggeredListener, WakeSignal, WorkItem,
    WorkQueuePair,
};

/// Snapshot of operator activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperatorStats {
    /// Operator (worker thread) name.
    pub name: String,
    /// Items waiting in the high tier.
    pub queued_high: usize,
    /// Items waiting in the normal tier.
    pub queued_normal: usize,
    /// Items accepted by `enqueue`.
    pub enqueued: u64,
    /// Items whose callback returned successfully.
    pub completed: u64,
    /// Items whose callback failed or panicked.
    pub failed: u64,
}

#[derive(Debug, Default)]
struct OperatorCounters {
    enqueued: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// State shared between the handle and the worker thread.
struct Shared<M, D> {
    queues: WorkQueuePair<WorkItem<M, D>>,
    wake: WakeSignal,
    notifier: Notifier<M, D>,
    counters: OperatorCounters,
}

impl<M, D> Shared<M, D> {
    /// Process the head of the highest non-empty tier.
    ///
    /// Returns `false` if both tiers were empty.
    fn run_once(&self, operator: &str) -> bool {
        if let Some(item) = self.queues.try_pop_high() {
            self.process(operator, item, Priority::High);
        } else if let Some(item) = self.queues.try_pop_normal() {
            self.process(operator, item, Priority::Normal);
        } else {
            return false;
        }
        true
    }

    /// Invoke one dequeued item and publish exactly one event for it.
    fn process(&self, operator: &str, item: WorkItem<M, D>, priority: Priority) {
        let item = Arc::new(item);
        debug!(operator = %operator, ticket = %item.ticket(), %priority, "invoking work item");

        let event = match panic::catch_unwind(AssertUnwindSafe(|| item.invoke())) {
            Ok(Ok(data)) => {
                self.counters.completed.fetch_add(1, Ordering::Release);
                debug!(operator = %operator, ticket = %item.ticket(), "work item completed");
                OperatorEvent::triggered(OperationResult::success(Arc::clone(&item), data))
            }
            Ok(Err(err)) => self.failed(operator, &item, TaskError::Callback(err)),
            Err(payload) => self.failed(operator, &item, TaskError::from_panic(&*payload)),
        };

        self.notifier.publish(operator, event);
    }

    fn failed(&self, operator: &str, item: &WorkItem<M, D>, error: TaskError) -> OperatorEvent<M, D> {
        self.counters.failed.fetch_add(1, Ordering::Release);
        warn!(operator = %operator, ticket = %item.ticket(), error = %error, "work item failed");
        OperatorEvent::error(item.ticket(), error)
    }
}

/// Two-priority task executor backed by one dedicated worker thread.
///
/// ```rust,ignore
/// use prometheus_operator::{Operator, OperatorConfig, Priority, WorkItem};
/// use serde_json::json;
///
/// let operator: Operator = Operator::new(&OperatorConfig::new("ingest").with_sleep_ms(10))?;
/// let events = operator.subscribe();
///
/// operator.enqueue_with_priority(
///     WorkItem::new("ticket-1", vec![json!(1), json!(2)], |m| Ok(json!(m.len()))),
///     Priority::High,
/// );
/// let event = events.recv()?;
/// ```
pub struct Operator<M = Value, D = Value>
where
    M: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    config: OperatorConfig,
    shared: Arc<Shared<M, D>>,
    /// Never joined; the worker outlives this handle.
    worker: JoinHandle<()>,
}

impl<M, D> Operator<M, D>
where
    M: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// Copy `config` and start the worker thread.
    ///
    /// Later changes to the caller's `config` have no effect on this operator.
    ///
    /// # Errors
    ///
    /// - `OperatorError::InvalidConfig` if the configuration is invalid
    /// - `OperatorError::Spawn` if the worker thread cannot be created
    pub fn new(config: &OperatorConfig) -> Result<Self, OperatorError> {
        config.validate()?;
        let config = config.clone();

        let shared = Arc::new(Shared {
            queues: WorkQueuePair::new(),
            wake: WakeSignal::new(),
            notifier: Notifier::new(),
            counters: OperatorCounters::default(),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            let name = config.name.clone();
            let sleep = config.sleep();
            thread::Builder::new()
                .name(config.name.clone())
                .spawn(move || run_worker(&name, sleep, &shared))?
        };

        info!(
            operator = %config.name,
            sleep_ms = config.sleep_ms,
            default_priority = %config.priority,
            "operator initialized"
        );

        Ok(Self {
            config,
            shared,
            worker,
        })
    }

    /// Enqueue at the configured default priority.
    pub fn enqueue(&self, item: WorkItem<M, D>) {
        self.enqueue_with_priority(item, self.config.priority);
    }

    /// Append `item` to the tier selected by `priority` and wake the worker.
    ///
    /// Never blocks beyond a short queue lock and gives no indication of when
    /// the item will run.
    pub fn enqueue_with_priority(&self, item: WorkItem<M, D>, priority: Priority) {
        debug!(operator = %self.config.name, ticket = %item.ticket(), %priority, "enqueue");
        self.shared.counters.enqueued.fetch_add(1, Ordering::Relaxed);
        self.shared.queues.push(item, priority);
        self.shared.wake.set();
    }

    /// Register a notification sink. Sinks are notified in registration order.
    pub fn add_sink(&self, sink: Box<dyn NotificationSink<M, D>>) {
        self.shared.notifier.add(sink);
    }

    /// Call `listener` for every successful item.
    pub fn on_operation_triggered<F>(&self, listener: F)
    where
        F: FnMut(&OperationTriggered<M, D>) + Send + 'static,
    {
        self.add_sink(Box::new(TriggeredListener(listener)));
    }

    /// Call `listener` for every failed item.
    pub fn on_error_occurred<F>(&self, listener: F)
    where
        F: FnMut(&ErrorOccurred) + Send + 'static,
    {
        self.add_sink(Box::new(ErrorListener(listener)));
    }

    /// Subscribe through an unbounded channel.
    ///
    /// The subscription is dropped the first time a notification finds the
    /// receiver gone.
    #[must_use]
    pub fn subscribe(&self) -> crossbeam_channel::Receiver<Arc<OperatorEvent<M, D>>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.add_sink(Box::new(ChannelSink::new(tx)));
        rx
    }

    /// Subscribe through a tokio unbounded channel for async consumers.
    #[cfg(feature = "tokio-runtime")]
    #[must_use]
    pub fn subscribe_async(&self) -> tokio::sync::mpsc::UnboundedReceiver<Arc<OperatorEvent<M, D>>> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        self.add_sink(Box::new(crate::runtime::TokioSink::new(tx)));
        rx
    }

    /// This operator's private copy of its configuration.
    #[must_use]
    pub const fn config(&self) -> &OperatorConfig {
        &self.config
    }

    /// Handle of the worker thread.
    #[must_use]
    pub fn worker_thread(&self) -> &Thread {
        self.worker.thread()
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.shared.notifier.len()
    }

    /// Current queue depths and lifetime counters.
    ///
    /// `completed + failed` never exceeds `enqueued` in a snapshot.
    #[must_use]
    pub fn stats(&self) -> OperatorStats {
        let counters = &self.shared.counters;
        // Outcomes first: every counted outcome's enqueue is then visible.
        let completed = counters.completed.load(Ordering::Acquire);
        let failed = counters.failed.load(Ordering::Acquire);
        OperatorStats {
            name: self.config.name.clone(),
            queued_high: self.shared.queues.len_high(),
            queued_normal: self.shared.queues.len_normal(),
            enqueued: counters.enqueued.load(Ordering::Relaxed),
            completed,
            failed,
        }
    }
}

/// Worker thread body. Never returns.
fn run_worker<M, D>(name: &str, sleep: Duration, shared: &Shared<M, D>) {
    debug!(operator = %name, "worker thread started");
    loop {
        // Covers drops of the item and its payload, which run outside the
        // callback guard.
        match panic::catch_unwind(AssertUnwindSafe(|| shared.run_once(name))) {
            Ok(true) => {}
            Ok(false) => shared.wake.wait(),
            Err(payload) => {
                let err = TaskError::from_panic(&*payload);
                error!(operator = %name, error = %err, "panic while finishing work item");
            }
        }

        // Throttle: cut short by any enqueue.
        shared.wake.wait_timeout(sleep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::sink::InMemorySink;

    fn config(name: &str) -> OperatorConfig {
        OperatorConfig::new(name).with_sleep_ms(1)
    }

    #[test]
    fn test_operator_basic() {
        let operator: Operator<u32, u32> = Operator::new(&config("op-basic")).unwrap();
        let events = operator.subscribe();

        operator.enqueue(WorkItem::new("t-1", vec![2, 3], |m: &[u32]| Ok(m.iter().sum())));

        let event = events.recv_timeout(Duration::from_secs(5)).unwrap();
        let triggered = event.as_triggered().unwrap();
        assert_eq!(triggered.result.data, Some(5));
        assert!(!triggered.result.has_error());
        assert_eq!(triggered.result.ticket(), "t-1");
    }

    #[test]
    fn test_worker_thread_named_after_config() {
        let operator: Operator<u32, u32> = Operator::new(&config("op-named")).unwrap();
        assert_eq!(operator.worker_thread().name(), Some("op-named"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Operator::<u32, u32>::new(&OperatorConfig::new(""));
        assert!(matches!(result, Err(OperatorError::InvalidConfig(_))));
    }

    #[test]
    fn test_stats_track_outcomes() {
        let operator: Operator<u32, u32> = Operator::new(&config("op-stats")).unwrap();
        let sink = InMemorySink::<u32, u32>::new(16);
        operator.add_sink(Box::new(sink.clone()));

        operator.enqueue(WorkItem::new("ok", vec![], |_: &[u32]| Ok(1)));
        operator.enqueue(WorkItem::new("err", vec![], |_: &[u32]| Err(anyhow::anyhow!("nope"))));
        operator.enqueue(WorkItem::new("panic", vec![], |_: &[u32]| -> anyhow::Result<u32> {
            panic!("kaboom")
        }));

        assert!(sink.wait_for(3, Duration::from_secs(5)));
        let stats = operator.stats();
        assert_eq!(stats.name, "op-stats");
        assert_eq!(stats.enqueued, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.queued_high + stats.queued_normal, 0);
    }

    #[test]
    fn test_panic_becomes_error_event() {
        let operator: Operator<u32, u32> = Operator::new(&config("op-panic")).unwrap();
        let events = operator.subscribe();

        operator.enqueue(WorkItem::new("p", vec![], |_: &[u32]| -> anyhow::Result<u32> {
            panic!("kaboom")
        }));
        operator.enqueue(WorkItem::new("after", vec![], |_: &[u32]| Ok(7)));

        let first = events.recv_timeout(Duration::from_secs(5)).unwrap();
        let error = first.as_error().unwrap();
        assert_eq!(error.ticket, "p");
        assert_eq!(error.error.to_string(), "task panicked: kaboom");

        let second = events.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(second.as_triggered().unwrap().result.data, Some(7));
    }
}
