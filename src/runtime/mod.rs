//! Async runtime adapters.

pub mod tokio_sink;

pub use tokio_sink::TokioSink;
