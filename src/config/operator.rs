//! Operator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::OperatorError;
use crate::util::serde::Priority;

/// Settings copied into an operator when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Worker thread name; identification only.
    pub name: String,
    /// Upper bound of the throttle wait after every worker iteration, in ms.
    pub sleep_ms: u64,
    /// Tier used by `Operator::enqueue` when no priority is given.
    pub priority: Priority,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            name: "operator".into(),
            sleep_ms: 100,
            priority: Priority::Normal,
        }
    }
}

impl OperatorConfig {
    /// Default configuration with the given worker name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the throttle wait in milliseconds.
    #[must_use]
    pub fn with_sleep_ms(mut self, sleep_ms: u64) -> Self {
        self.sleep_ms = sleep_ms;
        self
    }

    /// Set the default priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Throttle wait as a `Duration`.
    #[must_use]
    pub const fn sleep(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::InvalidConfig` if the name is empty or
    /// contains a NUL byte (thread names cannot).
    pub fn validate(&self) -> Result<(), OperatorError> {
        if self.name.trim().is_empty() {
            return Err(OperatorError::InvalidConfig("name must not be empty".into()));
        }
        if self.name.contains('\0') {
            return Err(OperatorError::InvalidConfig("name must not contain NUL bytes".into()));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::Parse` for malformed JSON or unknown priority
    /// labels, and `OperatorError::InvalidConfig` if validation fails.
    pub fn from_json_str(input: &str) -> Result<Self, OperatorError> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| OperatorError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
