use serde::{Deserialize, Serialize};

use crate::types::Priority;
use crate::utils::time::handoff_label;

/// A conversation flagged for transfer to a human agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    /// Conversation the handoff was raised in.
    pub conversation_id: String,
    /// Why the conversation needs a human.
    pub reason: String,
    /// How urgent the handoff is.
    pub priority: Priority,
    /// Summary of the conversation so far.
    pub summary: String,
    /// Reply the backend suggests the human sends next.
    pub suggested_response: String,
    /// Customer name, when the backend learned it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Team the handoff was routed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routed_team: Option<String>,
    /// When the handoff was raised, as the backend reported it.
    pub timestamp: String,
}

impl Handoff {
    /// Returns the customer name if it is present and not blank.
    pub fn customer(&self) -> Option<&str> {
        self.customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns the `DD/MM/YYYY, HH:MM` label for the handoff timestamp.
    pub fn time_label(&self) -> String {
        handoff_label(&self.timestamp)
    }
}
