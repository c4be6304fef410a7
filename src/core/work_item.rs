//! Work items and the results they produce.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::TaskError;

/// Callback invoked by the worker with a work item's material.
pub type Callback<M, D> = Arc<dyn Fn(&[M]) -> anyhow::Result<D> + Send + Sync>;

/// A unit of work submitted to an [`Operator`](super::Operator).
///
/// Immutable once built. The queue owns it until the worker dequeues it;
/// afterwards it lives on only as the back-reference inside an
/// [`OperationResult`].
pub struct WorkItem<M = Value, D = Value> {
    ticket: String,
    material: Vec<M>,
    callback: Callback<M, D>,
}

impl<M, D> WorkItem<M, D> {
    /// Create a work item with an explicit ticket.
    pub fn new<F>(ticket: impl Into<String>, material: Vec<M>, callback: F) -> Self
    where
        F: Fn(&[M]) -> anyhow::Result<D> + Send + Sync + 'static,
    {
        Self {
            ticket: ticket.into(),
            material,
            callback: Arc::new(callback),
        }
    }

    /// Create a work item with a random (UUID v4) ticket.
    pub fn with_random_ticket<F>(material: Vec<M>, callback: F) -> Self
    where
        F: Fn(&[M]) -> anyhow::Result<D> + Send + Sync + 'static,
    {
        Self::new(uuid::Uuid::new_v4().to_string(), material, callback)
    }

    /// Create a work item that shares an existing callback.
    pub fn from_callback(ticket: impl Into<String>, material: Vec<M>, callback: Callback<M, D>) -> Self {
        Self {
            ticket: ticket.into(),
            material,
            callback,
        }
    }

    /// Traceability identifier; not used for ordering.
    #[must_use]
    pub fn ticket(&self) -> &str {
        &self.ticket
    }

    /// Arguments handed to the callback.
    #[must_use]
    pub fn material(&self) -> &[M] {
        &self.material
    }

    /// Run the callback against this item's material.
    pub(crate) fn invoke(&self) -> anyhow::Result<D> {
        (self.callback)(&self.material)
    }
}

impl<M: fmt::Debug, D> fmt::Debug for WorkItem<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("ticket", &self.ticket)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

/// Outcome of one invoked work item.
pub struct OperationResult<M = Value, D = Value> {
    /// The item that produced this result.
    pub work_item: Arc<WorkItem<M, D>>,
    /// Present iff the callback failed. Results emitted by the worker leave
    /// this empty; failures travel as `ErrorOccurred` instead.
    pub error: Option<TaskError>,
    /// Callback return payload.
    pub data: Option<D>,
}

impl<M, D> OperationResult<M, D> {
    /// Result for a callback that returned `data`.
    #[must_use]
    pub fn success(work_item: Arc<WorkItem<M, D>>, data: D) -> Self {
        Self {
            work_item,
            error: None,
            data: Some(data),
        }
    }

    /// Result describing a failed callback.
    #[must_use]
    pub fn failure(work_item: Arc<WorkItem<M, D>>, error: TaskError) -> Self {
        Self {
            work_item,
            error: Some(error),
            data: None,
        }
    }

    /// True iff `error` is present.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Ticket of the originating work item.
    #[must_use]
    pub fn ticket(&self) -> &str {
        self.work_item.ticket()
    }
}

impl<M: fmt::Debug, D: fmt::Debug> fmt::Debug for OperationResult<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationResult")
            .field("work_item", &self.work_item)
            .field("error", &self.error)
            .field("data", &self.data)
            .finish()
    }
}
