//! Serializable scheduling primitives shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::OperatorError;

/// Queue tier a work item is submitted to.
///
/// `High` always drains before `Normal`. There are exactly two tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Regular work, processed when the high tier is empty.
    #[default]
    Normal,
    /// Preempts normal work at the start of every worker iteration.
    High,
}

impl Priority {
    /// Stable lowercase label, also used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(OperatorError::InvalidPriority(other.to_string())),
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = OperatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::High),
            other => Err(OperatorError::InvalidPriority(other.to_string())),
        }
    }
}
