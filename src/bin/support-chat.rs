//! Interactive customer-support chat client.
//!
//! This binary provides a REPL that talks to the support backend: customer
//! messages go out, agent replies come back after a simulated typing delay,
//! and the pending handoff board is one command away.
//!
//! # Usage
//!
//! ```bash
//! # Chat against a local backend
//! support-chat
//!
//! # Point at another backend
//! support-chat --api-url https://support.example.com
//!
//! # Print the handoff board and exit
//! support-chat --handoffs
//!
//! # Export the handoff board as HTML
//! support-chat --html-out handoffs.html
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/handoffs` - Toggle the handoff board
//! - `/chat` - Return to the chat
//! - `/refresh` - Reload the handoff board
//! - `/id` - Show the conversation id
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use std::env;
use std::path::Path;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use support_chat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, HandoffListing, PlainTextRenderer, Renderer,
    RunMode, SendOutcome, View, help_text, parse_command,
};
use support_chat::html::write_handoff_board;
use support_chat::{API_URL_ENV, Backend, SupportApi, TokioClock};

/// Main entry point for the support-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "support_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("support-chat [OPTIONS]");
    let config = ChatConfig::resolve(args, env::var(API_URL_ENV).ok());
    let client = SupportApi::with_options(Some(config.api_url.clone()), Some(config.timeout))?;

    match &config.mode {
        RunMode::Interactive => {}
        RunMode::PrintHandoffs => return print_handoffs(&client, &config).await,
        RunMode::ExportHandoffs(path) => {
            export_handoffs(&client, path).await?;
            return Ok(());
        }
    }

    let renderer = PlainTextRenderer::new(config.use_color, config.agent_name.clone());
    let session = ChatSession::new(client, renderer, TokioClock);
    let mut rl = DefaultEditor::new()?;

    println!(
        "Support chat with {} ({})",
        config.agent_name, config.api_url
    );
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let prompt = match session.view() {
            View::Chat => "Tú: ",
            View::Handoffs => "handoffs> ",
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("¡Hasta luego!");
                            break;
                        }
                        ChatCommand::Toggle => {
                            session.toggle_view().await;
                        }
                        ChatCommand::Chat => {
                            session.back_to_chat();
                        }
                        ChatCommand::Refresh => {
                            if session.view() == View::Handoffs {
                                session.load_handoffs().await;
                            } else {
                                println!("Open the handoff board first with /handoffs");
                            }
                        }
                        ChatCommand::ConversationId => {
                            println!("    Conversation: {}", session.conversation_id());
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            eprintln!("Error: {message}");
                        }
                    }
                    continue;
                }

                if session.view() == View::Handoffs {
                    println!("The handoff board is read-only; use /chat to go back.");
                    continue;
                }

                if let SendOutcome::Scheduled { .. } = session.send_message(line).await {
                    session.wait_until_idle().await;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\n¡Hasta luego!");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

async fn print_handoffs(
    client: &SupportApi,
    config: &ChatConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut renderer = PlainTextRenderer::new(config.use_color, config.agent_name.clone());
    renderer.show_view(View::Handoffs);
    match client.list_handoffs().await {
        Ok(handoffs) => {
            renderer.render_handoffs(HandoffListing::from_records(&handoffs));
            Ok(())
        }
        Err(err) => {
            renderer.render_handoffs(HandoffListing::Failed);
            Err(err.into())
        }
    }
}

async fn export_handoffs(client: &SupportApi, path: &Path) -> support_chat::Result<()> {
    let handoffs = client.list_handoffs().await?;
    write_handoff_board(path, "Handoffs pendientes", &handoffs)?;
    println!(
        "Wrote {} handoff(s) to {}",
        handoffs.len(),
        path.display()
    );
    Ok(())
}
