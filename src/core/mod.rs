//! Core scheduling abstractions: work items, queues, wake signaling and the operator.

pub mod error;
pub mod event;
pub mod operator;
pub mod queue;
pub mod wake;
pub mod work_item;

pub use error::{OperatorError, TaskError};
pub use event::{
    ErrorListener, ErrorOccurred, NotificationSink, OperationTriggered, OperatorEvent, SinkStatus,
    TriggeredListener,
};
pub use operator::{Operator, OperatorStats};
pub use queue::WorkQueuePair;
pub use wake::WakeSignal;
pub use work_item::{Callback, OperationResult, WorkItem};
