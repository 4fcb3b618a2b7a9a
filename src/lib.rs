// Public modules
pub mod chat;
pub mod client;
pub mod clock;
pub mod delay;
pub mod error;
pub mod html;
pub mod render;
pub mod types;
pub mod utils;

mod observability;

// Re-exports
pub use client::{API_URL_ENV, Backend, DEFAULT_API_URL, SupportApi};
pub use clock::{Callback, Clock, ManualClock, TokioClock};
pub use delay::{FixedJitter, Jitter, OsJitter, TypingDelay};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{
    HandoffElement, HandoffListing, MessageElement, PlainTextRenderer, RecordingRenderer,
    Renderer, View,
};
pub use types::*;
