//! Infrastructure adapters delivering operator notifications.

pub mod sink;

pub use sink::{ChannelSink, InMemorySink};
