use serde::{Deserialize, Serialize};

use crate::types::Asset;

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The agent's textual reply.
    pub response: String,

    /// Name the backend used for the replying agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Set when the backend decided a human should take over.
    #[serde(default)]
    pub needs_escalation: bool,

    /// Media to show after the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
}

impl ChatReply {
    /// Creates a text-only reply.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            sender: None,
            needs_escalation: false,
            asset: None,
        }
    }

    /// Attaches an asset to the reply.
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Returns the length used to pace the simulated typing delay.
    ///
    /// Counted in UTF-16 code units, so a character outside the Basic
    /// Multilingual Plane (most emoji) counts twice.
    pub fn typing_length(&self) -> usize {
        self.response.encode_utf16().count()
    }

    /// Returns the attached asset if it has a location worth rendering.
    pub fn renderable_asset(&self) -> Option<&Asset> {
        self.asset.as_ref().filter(|asset| asset.is_renderable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetKind;

    #[test]
    fn minimal_reply() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "Hola"}"#).unwrap();
        assert_eq!(reply, ChatReply::text("Hola"));
        assert!(reply.renderable_asset().is_none());
    }

    #[test]
    fn full_reply() {
        let reply: ChatReply = serde_json::from_str(
            r#"{
                "response": "Mira esta máquina",
                "sender": "luisa",
                "needs_escalation": true,
                "asset": {"image_id": "m1", "asset_url": "/api/assets/m1", "type": "image"}
            }"#,
        )
        .unwrap();
        assert_eq!(reply.sender.as_deref(), Some("luisa"));
        assert!(reply.needs_escalation);
        let asset = reply.renderable_asset().unwrap();
        assert_eq!(asset.kind, AssetKind::Image);
        assert_eq!(reply.typing_length(), 17);
    }

    #[test]
    fn typing_length_counts_utf16_units() {
        assert_eq!(ChatReply::text("máquina").typing_length(), 7);
        assert_eq!(ChatReply::text("😀".repeat(10)).typing_length(), 20);
        assert_eq!(ChatReply::text("ok 👍").typing_length(), 5);
    }

    #[test]
    fn missing_response_is_malformed() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"sender": "luisa"}"#).is_err());
    }

    #[test]
    fn empty_asset_location_is_not_rendered() {
        let reply = ChatReply::text("ok").with_asset(Asset::new(AssetKind::Image, ""));
        assert!(reply.renderable_asset().is_none());
    }
}
