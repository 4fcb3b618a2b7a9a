use serde::{Deserialize, Serialize};

use crate::types::{ConversationId, Sender};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation the message belongs to.
    pub conversation_id: ConversationId,
    /// The message text, already trimmed.
    pub text: String,
    /// Always the customer for messages sent by this client.
    pub sender: Sender,
}

impl ChatRequest {
    /// Creates a request carrying a customer message.
    pub fn customer(conversation_id: ConversationId, text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            text: text.into(),
            sender: Sender::Customer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format() {
        let request = ChatRequest::customer(ConversationId::new("conv_1_abc"), "Hola");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "conversation_id": "conv_1_abc",
                "text": "Hola",
                "sender": "customer",
            })
        );
    }
}
