use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a chat message.
///
/// The backend names its agent persona `luisa`; the client also accepts the
/// generic `agent` when reading replies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// The person typing into the chat.
    #[serde(rename = "customer")]
    Customer,

    /// The support agent answering on behalf of the business.
    #[serde(rename = "luisa", alias = "agent")]
    Agent,
}

impl Sender {
    /// Returns the wire name of this sender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Customer => "customer",
            Sender::Agent => "luisa",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
