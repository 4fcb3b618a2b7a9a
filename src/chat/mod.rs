//! Chat client module for customer-support conversations.
//!
//! This module provides the session controller and the REPL plumbing on top
//! of it. It supports:
//!
//! - Optimistic rendering of customer messages
//! - A simulated typing delay before each agent reply
//! - Media attachments resolved against the backend URL
//! - A handoff board fetched fresh every time it is opened
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The session controller and backend interaction
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{HandoffListing, PlainTextRenderer, RecordingRenderer, Renderer, View};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, RunMode};
pub use session::{ChatSession, FALLBACK_MESSAGE, HandoffOutcome, SendOutcome};
