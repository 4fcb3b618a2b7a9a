use time::OffsetDateTime;
use url::Url;

use crate::types::{Asset, Sender};
use crate::utils::time::clock_label;

/// A text bubble shown in the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// The message body.
    pub text: String,
    /// Who wrote it.
    pub sender: Sender,
    /// When it was appended to the conversation.
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    /// Creates a new chat message.
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: OffsetDateTime) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }

    /// Returns the `HH:MM` label shown next to the bubble.
    pub fn time_label(&self) -> String {
        clock_label(self.timestamp)
    }
}

/// A media bubble shown after an agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMessage {
    /// The asset as the backend described it.
    pub asset: Asset,
    /// The resolved location of the asset.
    pub url: Url,
    /// Who sent it.
    pub sender: Sender,
    /// When it was appended to the conversation.
    pub timestamp: OffsetDateTime,
}

impl AssetMessage {
    /// Returns the `HH:MM` label shown next to the bubble.
    pub fn time_label(&self) -> String {
        clock_label(self.timestamp)
    }
}
