//! Configuration model for operators.

pub mod operator;

pub use operator::OperatorConfig;
