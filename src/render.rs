//! Output rendering for the support chat.
//!
//! The chat session never touches a terminal directly. It drives a
//! [`Renderer`], which owns the message list, the typing indicator, the input
//! control and the handoff panel. [`PlainTextRenderer`] draws to a terminal
//! with optional ANSI styling; [`RecordingRenderer`] keeps everything in
//! memory for headless use.

use std::io::{self, Write};

use crate::types::{AssetKind, AssetMessage, ChatMessage, Handoff, Priority, Sender};

/// ANSI escape code for dim text (used for timestamps and the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for sender labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the agent label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for high priority).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for low priority and the customer label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for urgent priority and errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for magenta text (used for asset links).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI sequence that returns to column zero and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Placeholder shown while handoffs are being fetched.
pub const HANDOFFS_LOADING: &str = "Cargando handoffs...";

/// Placeholder shown when there are no handoffs.
pub const HANDOFFS_EMPTY: &str = "No hay handoffs aún";

/// Placeholder shown when handoffs could not be fetched.
pub const HANDOFFS_FAILED: &str = "Error al cargar handoffs";

/// The two panels of the chat client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// The live conversation.
    #[default]
    Chat,
    /// The read-only list of pending handoffs.
    Handoffs,
}

impl View {
    /// Returns the other view.
    pub fn toggled(self) -> Self {
        match self {
            View::Chat => View::Handoffs,
            View::Handoffs => View::Chat,
        }
    }
}

/// What the handoff panel should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffListing<'a> {
    /// The fetch is in progress.
    Loading,
    /// The backend has no handoffs.
    Empty,
    /// The fetch failed.
    Failed,
    /// One card per handoff, in order.
    Cards(&'a [Handoff]),
}

impl<'a> HandoffListing<'a> {
    /// Picks `Empty` or `Cards` for a fetched list.
    pub fn from_records(handoffs: &'a [Handoff]) -> Self {
        if handoffs.is_empty() {
            HandoffListing::Empty
        } else {
            HandoffListing::Cards(handoffs)
        }
    }
}

/// Trait for rendering the chat client.
///
/// This abstraction allows for different rendering strategies:
/// - Terminal output with or without ANSI styling
/// - In-memory recording for tests and exports
pub trait Renderer: Send {
    /// Append a text bubble to the message list.
    fn append_message(&mut self, message: &ChatMessage);

    /// Append a media bubble to the message list.
    fn append_asset(&mut self, message: &AssetMessage);

    /// Show the typing indicator at the end of the message list.
    fn show_typing_indicator(&mut self);

    /// Remove the typing indicator, if it is shown.
    fn hide_typing_indicator(&mut self);

    /// Enable or disable the send control.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Switch the visible panel.
    fn show_view(&mut self, view: View);

    /// Replace the contents of the handoff panel.
    fn render_handoffs(&mut self, listing: HandoffListing<'_>);
}

/// Makes backend-supplied text safe to print on a terminal.
///
/// Control characters other than newline and tab are shown as escapes, so
/// embedded ANSI sequences are printed literally instead of interpreted.
pub fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_unicode());
        } else {
            out.push(c);
        }
    }
    out
}

/// Terminal renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    out: Box<dyn Write + Send>,
    use_color: bool,
    agent_name: String,
    typing_shown: bool,
    input_enabled: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer writing to stdout.
    pub fn new(use_color: bool, agent_name: impl Into<String>) -> Self {
        Self::with_writer(Box::new(io::stdout()), use_color, agent_name)
    }

    /// Creates a renderer writing to `out`.
    pub fn with_writer(
        out: Box<dyn Write + Send>,
        use_color: bool,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            out,
            use_color,
            agent_name: agent_name.into(),
            typing_shown: false,
            input_enabled: true,
        }
    }

    /// Returns whether the send control is enabled.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    fn label(&self, sender: Sender) -> String {
        let (name, color) = match sender {
            Sender::Customer => ("Tú", ANSI_GREEN),
            Sender::Agent => (self.agent_name.as_str(), ANSI_CYAN),
        };
        if self.use_color {
            format!("{ANSI_BOLD}{color}{name}{ANSI_RESET}")
        } else {
            name.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            format!("{ANSI_DIM}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn priority_badge(&self, priority: &Priority) -> String {
        let badge = format!("[{}]", literal(priority.as_str()).to_uppercase());
        if !self.use_color {
            return badge;
        }
        let color = match priority {
            Priority::Urgent => ANSI_RED,
            Priority::High => ANSI_YELLOW,
            Priority::Medium => ANSI_CYAN,
            Priority::Low => ANSI_GREEN,
            Priority::Other(_) => ANSI_MAGENTA,
        };
        format!("{ANSI_BOLD}{color}{badge}{ANSI_RESET}")
    }

    fn write_card(&mut self, handoff: &Handoff) {
        let badge = self.priority_badge(&handoff.priority);
        let mut card = format!("┌ {badge} {}\n", literal(&handoff.reason));
        if let Some(customer) = handoff.customer() {
            card.push_str(&format!("│ Cliente: {}\n", literal(customer)));
        }
        if let Some(team) = handoff.routed_team.as_deref() {
            card.push_str(&format!("│ Equipo: {}\n", literal(team)));
        }
        card.push_str(&format!("│ {}\n", literal(&handoff.summary)));
        card.push_str(&format!(
            "│ 💡 Próxima respuesta sugerida: {}\n",
            literal(&handoff.suggested_response)
        ));
        let meta = format!(
            "Conversación: {} · {}",
            literal(&handoff.conversation_id),
            handoff.time_label()
        );
        card.push_str(&format!("└ {}\n", self.dim(&meta)));
        self.write(&card);
    }

    /// Clears a shown typing indicator before other output lands on its line.
    fn clear_typing_line(&mut self) {
        if self.typing_shown && self.use_color {
            self.write(ANSI_CLEAR_LINE);
        }
    }

    fn write(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl Renderer for PlainTextRenderer {
    fn append_message(&mut self, message: &ChatMessage) {
        self.clear_typing_line();
        let line = format!(
            "{} {} {}\n",
            self.dim(&format!("[{}]", message.time_label())),
            self.label(message.sender),
            literal(&message.text)
        );
        self.write(&line);
    }

    fn append_asset(&mut self, message: &AssetMessage) {
        self.clear_typing_line();
        let kind = match message.asset.kind {
            AssetKind::Image => "🖼  imagen",
            AssetKind::Video => "🎬 video",
        };
        let link = if self.use_color {
            format!("{ANSI_MAGENTA}{}{ANSI_RESET}", message.url)
        } else {
            message.url.to_string()
        };
        let line = format!(
            "{} {} {kind}: {link}\n",
            self.dim(&format!("[{}]", message.time_label())),
            self.label(message.sender),
        );
        self.write(&line);
    }

    fn show_typing_indicator(&mut self) {
        if self.typing_shown {
            return;
        }
        let indicator = format!("{} está escribiendo ● ● ●", self.agent_name);
        if self.use_color {
            let dimmed = self.dim(&indicator);
            self.write(&dimmed);
        } else {
            self.write(&format!("{indicator}\n"));
        }
        self.typing_shown = true;
    }

    fn hide_typing_indicator(&mut self) {
        self.clear_typing_line();
        self.typing_shown = false;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn show_view(&mut self, view: View) {
        self.clear_typing_line();
        self.typing_shown = false;
        let banner = match view {
            View::Chat => "── Chat ──",
            View::Handoffs => "── Handoffs pendientes ──",
        };
        let banner = if self.use_color {
            format!("{ANSI_BOLD}{banner}{ANSI_RESET}\n")
        } else {
            format!("{banner}\n")
        };
        self.write(&banner);
    }

    fn render_handoffs(&mut self, listing: HandoffListing<'_>) {
        match listing {
            HandoffListing::Loading => {
                let text = self.dim(HANDOFFS_LOADING);
                self.write(&format!("{text}\n"));
            }
            HandoffListing::Empty => {
                self.write(&format!("{HANDOFFS_EMPTY}\n"));
            }
            HandoffListing::Failed => {
                let text = if self.use_color {
                    format!("{ANSI_RED}{HANDOFFS_FAILED}{ANSI_RESET}")
                } else {
                    HANDOFFS_FAILED.to_string()
                };
                self.write(&format!("{text}\n"));
            }
            HandoffListing::Cards(handoffs) => {
                for handoff in handoffs {
                    self.write_card(handoff);
                }
            }
        }
    }
}

/// An element of the recorded message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageElement {
    /// A text bubble.
    Message(ChatMessage),
    /// A media bubble.
    Asset(AssetMessage),
    /// The typing indicator.
    TypingIndicator,
}

/// An element of the recorded handoff panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffElement {
    /// The loading placeholder.
    Loading,
    /// The "no handoffs" placeholder.
    Empty,
    /// The error placeholder.
    Failed,
    /// One handoff card.
    Card(Handoff),
}

/// Renderer that keeps its output in memory.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    messages: Vec<MessageElement>,
    handoffs: Vec<HandoffElement>,
    input_enabled: bool,
    view: View,
}

impl RecordingRenderer {
    /// Creates an empty recording with input enabled and the chat view shown.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            handoffs: Vec::new(),
            input_enabled: true,
            view: View::Chat,
        }
    }

    /// The message list, in append order.
    pub fn messages(&self) -> &[MessageElement] {
        &self.messages
    }

    /// Only the text bubbles, in append order.
    pub fn chat_messages(&self) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter_map(|element| match element {
                MessageElement::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Only the media bubbles, in append order.
    pub fn asset_messages(&self) -> Vec<&AssetMessage> {
        self.messages
            .iter()
            .filter_map(|element| match element {
                MessageElement::Asset(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Returns true while the typing indicator is in the message list.
    pub fn typing_visible(&self) -> bool {
        self.messages
            .iter()
            .any(|element| matches!(element, MessageElement::TypingIndicator))
    }

    /// The handoff panel contents.
    pub fn handoff_panel(&self) -> &[HandoffElement] {
        &self.handoffs
    }

    /// Whether the send control is enabled.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// The visible panel.
    pub fn view(&self) -> View {
        self.view
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for RecordingRenderer {
    fn append_message(&mut self, message: &ChatMessage) {
        self.messages.push(MessageElement::Message(message.clone()));
    }

    fn append_asset(&mut self, message: &AssetMessage) {
        self.messages.push(MessageElement::Asset(message.clone()));
    }

    fn show_typing_indicator(&mut self) {
        self.messages.push(MessageElement::TypingIndicator);
    }

    fn hide_typing_indicator(&mut self) {
        if let Some(index) = self
            .messages
            .iter()
            .position(|element| matches!(element, MessageElement::TypingIndicator))
        {
            self.messages.remove(index);
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn show_view(&mut self, view: View) {
        self.view = view;
    }

    fn render_handoffs(&mut self, listing: HandoffListing<'_>) {
        self.handoffs = match listing {
            HandoffListing::Loading => vec![HandoffElement::Loading],
            HandoffListing::Empty => vec![HandoffElement::Empty],
            HandoffListing::Failed => vec![HandoffElement::Failed],
            HandoffListing::Cards(handoffs) => handoffs
                .iter()
                .cloned()
                .map(HandoffElement::Card)
                .collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use time::macros::datetime;
    use url::Url;

    use crate::types::Asset;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn plain(buffer: &SharedBuffer) -> PlainTextRenderer {
        PlainTextRenderer::with_writer(Box::new(buffer.clone()), false, "Luisa")
    }

    fn handoff(reason: &str) -> Handoff {
        Handoff {
            conversation_id: "conv_1_abc".to_string(),
            reason: reason.to_string(),
            priority: Priority::Urgent,
            summary: "Resumen".to_string(),
            suggested_response: "Te llamamos".to_string(),
            customer_name: Some("Marta".to_string()),
            routed_team: None,
            timestamp: "2024-06-10T17:20:00".to_string(),
        }
    }

    #[test]
    fn literal_escapes_control_characters() {
        assert_eq!(literal("hola\nmundo\t!"), "hola\nmundo\t!");
        assert_eq!(literal("\x1b[31mrojo"), "\\u{1b}[31mrojo");
        assert_eq!(literal("<b>ok</b>"), "<b>ok</b>");
    }

    #[test]
    fn view_toggles() {
        assert_eq!(View::Chat.toggled(), View::Handoffs);
        assert_eq!(View::Handoffs.toggled(), View::Chat);
        assert_eq!(View::default(), View::Chat);
    }

    #[test]
    fn listing_from_records() {
        assert_eq!(HandoffListing::from_records(&[]), HandoffListing::Empty);
        let records = vec![handoff("a")];
        assert!(matches!(
            HandoffListing::from_records(&records),
            HandoffListing::Cards(cards) if cards.len() == 1
        ));
    }

    #[test]
    fn plain_messages() {
        let buffer = SharedBuffer::default();
        let mut renderer = plain(&buffer);
        renderer.append_message(&ChatMessage::new(
            "Hola",
            Sender::Customer,
            datetime!(2024-06-10 09:05 UTC),
        ));
        renderer.append_message(&ChatMessage::new(
            "¡Hola! ¿En qué te ayudo?",
            Sender::Agent,
            datetime!(2024-06-10 09:06 UTC),
        ));
        assert_eq!(
            buffer.contents(),
            "[09:05] Tú Hola\n[09:06] Luisa ¡Hola! ¿En qué te ayudo?\n"
        );
    }

    #[test]
    fn plain_asset() {
        let buffer = SharedBuffer::default();
        let mut renderer = plain(&buffer);
        renderer.append_asset(&AssetMessage {
            asset: Asset::new(AssetKind::Video, "/api/assets/v1"),
            url: Url::parse("http://localhost:8000/api/assets/v1").unwrap(),
            sender: Sender::Agent,
            timestamp: datetime!(2024-06-10 09:06 UTC),
        });
        assert_eq!(
            buffer.contents(),
            "[09:06] Luisa 🎬 video: http://localhost:8000/api/assets/v1\n"
        );
    }

    #[test]
    fn plain_typing_indicator_is_shown_once() {
        let buffer = SharedBuffer::default();
        let mut renderer = plain(&buffer);
        renderer.show_typing_indicator();
        renderer.show_typing_indicator();
        assert_eq!(buffer.contents(), "Luisa está escribiendo ● ● ●\n");
        renderer.hide_typing_indicator();
        renderer.show_typing_indicator();
        assert_eq!(buffer.contents().matches("escribiendo").count(), 2);
    }

    #[test]
    fn plain_handoff_cards() {
        let buffer = SharedBuffer::default();
        let mut renderer = plain(&buffer);
        let records = vec![handoff("Visita técnica")];
        renderer.render_handoffs(HandoffListing::Cards(&records));
        let output = buffer.contents();
        assert!(output.starts_with("┌ [URGENT] Visita técnica\n"));
        assert!(output.contains("│ Cliente: Marta\n"));
        assert!(output.contains("Próxima respuesta sugerida: Te llamamos"));
        assert!(output.contains("Conversación: conv_1_abc · 10/06/2024, 17:20"));
    }

    #[test]
    fn plain_placeholders() {
        let buffer = SharedBuffer::default();
        let mut renderer = plain(&buffer);
        renderer.render_handoffs(HandoffListing::Loading);
        renderer.render_handoffs(HandoffListing::Empty);
        renderer.render_handoffs(HandoffListing::Failed);
        assert_eq!(
            buffer.contents(),
            format!("{HANDOFFS_LOADING}\n{HANDOFFS_EMPTY}\n{HANDOFFS_FAILED}\n")
        );
    }

    #[test]
    fn recording_typing_indicator() {
        let mut renderer = RecordingRenderer::new();
        renderer.show_typing_indicator();
        assert!(renderer.typing_visible());
        renderer.hide_typing_indicator();
        assert!(!renderer.typing_visible());
        renderer.hide_typing_indicator();
        assert!(renderer.messages().is_empty());
    }

    #[test]
    fn recording_handoff_panel_is_replaced() {
        let mut renderer = RecordingRenderer::new();
        renderer.render_handoffs(HandoffListing::Loading);
        assert_eq!(renderer.handoff_panel(), &[HandoffElement::Loading]);
        let records = vec![handoff("a"), handoff("b")];
        renderer.render_handoffs(HandoffListing::Cards(&records));
        assert_eq!(renderer.handoff_panel().len(), 2);
        renderer.render_handoffs(HandoffListing::Empty);
        assert_eq!(renderer.handoff_panel(), &[HandoffElement::Empty]);
    }
}
