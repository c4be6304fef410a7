//! # Prometheus Operator
//!
//! A single-worker, two-priority task executor.
//!
//! Callers submit work items ("tickets") into one of two queues, `High` or
//! `Normal`. One dedicated background thread drains them, always preferring
//! the high tier, and reports each outcome to registered notification sinks.
//!
//! ## Guarantees
//!
//! - **Priority**: at the start of every worker iteration the high tier is
//!   checked first. A steady stream of high-priority work can starve normal
//!   work; that is accepted behavior.
//! - **FIFO per tier**: items of one tier run in arrival order.
//! - **Exactly one notification**: every dequeued item yields either
//!   `OperationTriggered` or `ErrorOccurred`, never both.
//! - **Failure isolation**: a callback that errors or panics is reported and
//!   the worker moves on. Nothing is retried.
//! - **Non-blocking producers**: `enqueue` appends, signals the worker and
//!   returns.
//!
//! ## Example
//!
//! ```rust,ignore
//! use prometheus_operator::{Operator, OperatorConfig, Priority, WorkItem};
//! use serde_json::json;
//!
//! let operator: Operator = Operator::new(&OperatorConfig::new("ingest").with_sleep_ms(10))?;
//!
//! operator.on_operation_triggered(|e| println!("{} -> {:?}", e.result.ticket(), e.result.data));
//! operator.on_error_occurred(|e| eprintln!("{} failed: {}", e.ticket, e.error));
//!
//! operator.enqueue(WorkItem::new("t-1", vec![json!("a")], |m| Ok(json!(m.len()))));
//! operator.enqueue_with_priority(
//!     WorkItem::new("t-2", vec![], |_| anyhow::bail!("boom")),
//!     Priority::High,
//! );
//! ```
//!
//! For complete examples, see `tests/operator_test.rs`.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: work items, queues, wake signal and the operator.
pub mod core;
/// Configuration model for operators.
pub mod config;
/// Infrastructure adapters delivering notifications.
pub mod infra;
/// Async runtime adapters.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::OperatorConfig;
pub use crate::core::{
    ErrorOccurred, NotificationSink, OperationResult, OperationTriggered, Operator, OperatorError,
    OperatorEvent, OperatorStats, TaskError, WorkItem,
};
pub use crate::infra::{ChannelSink, InMemorySink};
pub use crate::util::serde::Priority;
