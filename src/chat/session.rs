//! Core chat session management.
//!
//! This module provides the `ChatSession` struct, the controller behind the
//! chat client. It owns the session state (conversation id, in-flight flag,
//! visible view), talks to the backend, paces replies with a simulated typing
//! delay and tells a [`Renderer`] what to draw.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::client::Backend;
use crate::clock::Clock;
use crate::delay::{Jitter, OsJitter, TypingDelay};
use crate::observability::{
    CHAT_ASSETS_DROPPED, CHAT_REQUEST_DURATION, CHAT_REQUEST_ERRORS, CHAT_REQUESTS,
    CHAT_SENDS_IGNORED, CHAT_TYPING_DELAY, HANDOFF_CARDS, HANDOFF_LOAD_ERRORS, HANDOFF_LOADS,
};
use crate::render::{HandoffListing, Renderer, View};
use crate::types::{AssetMessage, ChatMessage, ChatReply, ChatRequest, ConversationId, Sender};

/// Message shown in place of a reply when the exchange fails.
pub const FALLBACK_MESSAGE: &str = "Disculpa, hubo un problema. ¿Puedes intentar de nuevo?";

/// What became of a call to [`ChatSession::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was blank after trimming; nothing happened.
    Empty,
    /// Another exchange is still in flight; the input was ignored.
    Busy,
    /// The reply arrived and will be shown after `delay`.
    Scheduled {
        /// The simulated typing delay.
        delay: Duration,
    },
    /// The exchange failed and the fallback message was shown.
    Failed,
}

/// What became of a call to [`ChatSession::load_handoffs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffOutcome {
    /// The backend has no handoffs.
    Empty,
    /// This many cards were rendered.
    Listed(usize),
    /// The fetch failed and the error placeholder was shown.
    Failed,
}

struct SessionState<R> {
    renderer: R,
    is_typing: bool,
    view: View,
    typing: watch::Sender<bool>,
}

impl<R: Renderer> SessionState<R> {
    fn set_typing(&mut self, typing: bool) {
        self.is_typing = typing;
        self.typing.send_replace(typing);
    }

    /// Ends an exchange so the next message can be sent.
    fn release_input(&mut self) {
        self.set_typing(false);
        self.renderer.set_input_enabled(true);
    }
}

fn lock<R>(state: &Mutex<SessionState<R>>) -> MutexGuard<'_, SessionState<R>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A chat session that manages conversation state and backend interactions.
///
/// At most one customer message awaits a reply at any time. `send_message`
/// takes `&self`, so it can be called while an exchange is in flight; such
/// calls are ignored until the reply has been shown.
pub struct ChatSession<B, R, C> {
    backend: B,
    clock: Arc<C>,
    jitter: Box<dyn Jitter>,
    pacing: TypingDelay,
    conversation_id: ConversationId,
    state: Arc<Mutex<SessionState<R>>>,
}

impl<B, R, C> ChatSession<B, R, C>
where
    B: Backend,
    R: Renderer + 'static,
    C: Clock + 'static,
{
    /// Creates a new session with a freshly generated conversation id.
    pub fn new(backend: B, renderer: R, clock: C) -> Self {
        let conversation_id = ConversationId::generate(clock.now());
        Self::with_conversation_id(backend, renderer, clock, conversation_id)
    }

    /// Creates a new session for an existing conversation id.
    pub fn with_conversation_id(
        backend: B,
        renderer: R,
        clock: C,
        conversation_id: ConversationId,
    ) -> Self {
        let (typing, _) = watch::channel(false);
        Self {
            backend,
            clock: Arc::new(clock),
            jitter: Box::new(OsJitter),
            pacing: TypingDelay::default(),
            conversation_id,
            state: Arc::new(Mutex::new(SessionState {
                renderer,
                is_typing: false,
                view: View::Chat,
                typing,
            })),
        }
    }

    /// Replaces the source of typing-delay jitter.
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// Returns the conversation id sent with every message.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Returns true while an exchange is in flight.
    pub fn is_typing(&self) -> bool {
        lock(&self.state).is_typing
    }

    /// Returns the visible view.
    pub fn view(&self) -> View {
        lock(&self.state).view
    }

    /// Returns the clock driving this session.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs `f` against the renderer.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&lock(&self.state).renderer)
    }

    /// Waits until no exchange is in flight.
    pub async fn wait_until_idle(&self) {
        let mut typing = lock(&self.state).typing.subscribe();
        let _ = typing.wait_for(|typing| !*typing).await;
    }

    /// Sends a customer message and schedules the agent's reply.
    ///
    /// This method:
    /// 1. Appends the customer message, disables input and shows the typing indicator
    /// 2. Sends the message to the backend
    /// 3. Schedules the reply to render after the simulated typing delay
    ///
    /// Failures never escape: they are logged, the fallback message is shown
    /// right away and input is re-enabled.
    pub async fn send_message(&self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        {
            let mut state = lock(&self.state);
            if state.is_typing {
                CHAT_SENDS_IGNORED.click();
                debug!("exchange in flight; ignoring input");
                return SendOutcome::Busy;
            }
            let message = ChatMessage::new(text, Sender::Customer, self.clock.now());
            state.renderer.append_message(&message);
            state.renderer.set_input_enabled(false);
            state.renderer.show_typing_indicator();
            state.set_typing(true);
        }

        let request = ChatRequest::customer(self.conversation_id.clone(), text);
        CHAT_REQUESTS.click();
        let started = Instant::now();
        let result = self.backend.send_chat(&request).await;
        CHAT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());

        match result {
            Ok(reply) => self.schedule_reply(reply),
            Err(err) => {
                CHAT_REQUEST_ERRORS.click();
                error!(conversation_id = %self.conversation_id, error = %err, "chat exchange failed");
                let mut state = lock(&self.state);
                state.renderer.hide_typing_indicator();
                state.renderer.append_message(&ChatMessage::new(
                    FALLBACK_MESSAGE,
                    Sender::Agent,
                    self.clock.now(),
                ));
                state.release_input();
                SendOutcome::Failed
            }
        }
    }

    fn schedule_reply(&self, reply: ChatReply) -> SendOutcome {
        let delay = self.pacing.sample(reply.typing_length(), self.jitter.as_ref());
        CHAT_TYPING_DELAY.add(delay.as_secs_f64());
        if reply.needs_escalation {
            info!(conversation_id = %self.conversation_id, "backend flagged conversation for a human");
        }

        let asset = reply.renderable_asset().and_then(|asset| {
            match asset.resolve(self.backend.base_url()) {
                Ok(url) => Some((asset.clone(), url)),
                Err(err) => {
                    CHAT_ASSETS_DROPPED.click();
                    warn!(asset_url = %asset.asset_url, error = %err, "dropping unresolvable asset");
                    None
                }
            }
        });

        debug!(?delay, "reply scheduled");
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let text = reply.response;
        self.clock.schedule(
            delay,
            Box::new(move || {
                let now = clock.now();
                let mut state = lock(&state);
                state.renderer.hide_typing_indicator();
                state
                    .renderer
                    .append_message(&ChatMessage::new(text, Sender::Agent, now));
                if let Some((asset, url)) = asset {
                    state.renderer.append_asset(&AssetMessage {
                        asset,
                        url,
                        sender: Sender::Agent,
                        timestamp: now,
                    });
                }
                state.release_input();
            }),
        );
        SendOutcome::Scheduled { delay }
    }

    /// Switches between the chat and handoff views.
    ///
    /// Entering the handoff view always re-fetches the handoffs. Returns the
    /// view that is now visible.
    pub async fn toggle_view(&self) -> View {
        let next = {
            let mut state = lock(&self.state);
            let next = state.view.toggled();
            state.view = next;
            state.renderer.show_view(next);
            next
        };
        info!(view = ?next, "view switched");
        if next == View::Handoffs {
            self.load_handoffs().await;
        }
        next
    }

    /// Returns to the chat view without fetching anything.
    pub fn back_to_chat(&self) {
        let mut state = lock(&self.state);
        state.view = View::Chat;
        state.renderer.show_view(View::Chat);
    }

    /// Fetches the handoffs and renders them into the handoff panel.
    pub async fn load_handoffs(&self) -> HandoffOutcome {
        lock(&self.state)
            .renderer
            .render_handoffs(HandoffListing::Loading);

        HANDOFF_LOADS.click();
        let result = self.backend.list_handoffs().await;

        let mut state = lock(&self.state);
        match result {
            Ok(handoffs) => {
                state
                    .renderer
                    .render_handoffs(HandoffListing::from_records(&handoffs));
                HANDOFF_CARDS.count(handoffs.len() as u64);
                if handoffs.is_empty() {
                    HandoffOutcome::Empty
                } else {
                    HandoffOutcome::Listed(handoffs.len())
                }
            }
            Err(err) => {
                HANDOFF_LOAD_ERRORS.click();
                error!(error = %err, "loading handoffs failed");
                state.renderer.render_handoffs(HandoffListing::Failed);
                HandoffOutcome::Failed
            }
        }
    }
}
