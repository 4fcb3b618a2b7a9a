//! Configuration types for the chat client.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration the binary runs with.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_API_URL;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default display name of the agent.
const DEFAULT_AGENT_NAME: &str = "Luisa";

/// Command-line arguments for the support-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the support backend.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000)", "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Name shown for the agent.
    #[arrrg(optional, "Name shown for the agent (default: Luisa)", "NAME")]
    pub agent_name: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Print the handoff board and exit.
    #[arrrg(flag, "Print the pending handoffs and exit")]
    pub handoffs: bool,

    /// Write the handoff board as HTML and exit.
    #[arrrg(optional, "Write the handoff board as HTML to PATH and exit", "PATH")]
    pub html_out: Option<String>,
}

/// What the binary should do once configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive chat.
    Interactive,
    /// Print the handoff board and exit.
    PrintHandoffs,
    /// Write the handoff board as HTML and exit.
    ExportHandoffs(PathBuf),
}

/// Configuration for the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the support backend.
    pub api_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Name shown for the agent.
    pub agent_name: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// What to do.
    pub mode: RunMode,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Backend: http://localhost:8000
    /// - Timeout: 30 seconds
    /// - Agent name: Luisa
    /// - Color: enabled
    /// - Mode: interactive
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            use_color: true,
            mode: RunMode::Interactive,
        }
    }

    /// Resolves arguments, with `env_api_url` used when `--api-url` is absent.
    pub fn resolve(args: ChatArgs, env_api_url: Option<String>) -> Self {
        let given = |url: &String| !url.trim().is_empty();
        let api_url = args
            .api_url
            .filter(given)
            .or_else(|| env_api_url.filter(given))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mode = match (args.html_out, args.handoffs) {
            (Some(path), _) => RunMode::ExportHandoffs(PathBuf::from(path)),
            (None, true) => RunMode::PrintHandoffs,
            (None, false) => RunMode::Interactive,
        };

        ChatConfig {
            api_url,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            agent_name: args
                .agent_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            use_color: !args.no_color,
            mode,
        }
    }

    /// Sets the backend base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the agent's display name.
    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the run mode.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        Self::resolve(args, None)
    }
}
