use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency the backend attached to a handoff.
///
/// Values the client does not know are kept verbatim so the board can still
/// show them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Can wait for the next business day.
    Low,

    /// Should be picked up during the shift.
    Medium,

    /// Should be picked up soon.
    High,

    /// Needs a human right away.
    Urgent,

    /// A priority this client does not recognize.
    Other(String),
}

impl Priority {
    /// Returns the wire string for this priority.
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::Other(other) => other,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Priority::from(s.to_string()))
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}
