// Public modules
pub mod asset;
pub mod chat_message;
pub mod chat_reply;
pub mod chat_request;
pub mod conversation_id;
pub mod handoff;
pub mod priority;
pub mod sender;

// Re-exports
pub use asset::{Asset, AssetKind};
pub use chat_message::{AssetMessage, ChatMessage};
pub use chat_reply::ChatReply;
pub use chat_request::ChatRequest;
pub use conversation_id::ConversationId;
pub use handoff::Handoff;
pub use priority::Priority;
pub use sender::Sender;
