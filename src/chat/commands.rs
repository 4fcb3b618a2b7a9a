//! Slash command parsing for the chat client.
//!
//! Lines starting with `/` control the client instead of being sent to the
//! backend as customer messages.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Toggle between the chat and the handoff board.
    Toggle,

    /// Return to the chat view.
    Chat,

    /// Re-fetch the handoff board without leaving it.
    Refresh,

    /// Show the conversation id.
    ConversationId,

    /// Display help information.
    Help,

    /// Exit the chat client.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a customer message.
///
/// # Examples
///
/// ```
/// # use support_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/handoffs"), Some(ChatCommand::Toggle));
/// assert!(parse_command("Hola, quiero una máquina").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match (command.as_str(), argument) {
        ("handoffs" | "toggle" | "h", None) => ChatCommand::Toggle,
        ("chat" | "back", None) => ChatCommand::Chat,
        ("refresh" | "r", None) => ChatCommand::Refresh,
        ("id", None) => ChatCommand::ConversationId,
        ("help" | "?", None) => ChatCommand::Help,
        ("quit" | "exit" | "q", None) => ChatCommand::Quit,
        (
            "handoffs" | "toggle" | "h" | "chat" | "back" | "refresh" | "r" | "id" | "help" | "?"
            | "quit" | "exit" | "q",
            Some(_),
        ) => ChatCommand::Invalid(format!("/{command} takes no arguments")),
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /handoffs              Toggle between the chat and the handoff board
  /chat                  Return to the chat
  /refresh               Reload the handoff board
  /id                    Show the conversation id
  /help                  Show this help message
  /quit                  Exit the chat
Anything else is sent as a customer message."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_view_commands() {
        assert_eq!(parse_command("/handoffs"), Some(ChatCommand::Toggle));
        assert_eq!(parse_command("/HANDOFFS"), Some(ChatCommand::Toggle));
        assert_eq!(parse_command("/toggle"), Some(ChatCommand::Toggle));
        assert_eq!(parse_command("/chat"), Some(ChatCommand::Chat));
        assert_eq!(parse_command("/back"), Some(ChatCommand::Chat));
        assert_eq!(parse_command("/refresh"), Some(ChatCommand::Refresh));
    }

    #[test]
    fn parse_info_commands() {
        assert_eq!(parse_command("/id"), Some(ChatCommand::ConversationId));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn arguments_are_rejected() {
        assert!(matches!(
            parse_command("/chat now"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("no arguments")
        ));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            parse_command("/model x"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hola"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("precio 1/2"), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/handoffs"));
        assert!(help.contains("/chat"));
        assert!(help.contains("/quit"));
    }
}
