//! Error types for operator operations.

use thiserror::Error;

/// Errors returned to callers of the operator API.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A priority value outside the known tiers.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
    /// Configuration input could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
    /// The OS refused to start the worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Failure raised while a work item's callback ran.
///
/// Carried by `ErrorOccurred` notifications; never returned to the producer.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The callback returned an error.
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
    /// The callback panicked; the panic was contained on the worker thread.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl TaskError {
    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::Panicked { message }
    }
}
