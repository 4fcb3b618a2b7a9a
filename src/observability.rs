use biometrics::{Collector, Counter, Moments};

pub(crate) static CHAT_REQUESTS: Counter = Counter::new("support_chat.chat.requests");
pub(crate) static CHAT_REQUEST_ERRORS: Counter = Counter::new("support_chat.chat.request_errors");
pub(crate) static CHAT_REQUEST_DURATION: Moments =
    Moments::new("support_chat.chat.request_duration_seconds");
pub(crate) static CHAT_SENDS_IGNORED: Counter = Counter::new("support_chat.chat.sends_ignored");
pub(crate) static CHAT_TYPING_DELAY: Moments =
    Moments::new("support_chat.chat.typing_delay_seconds");
pub(crate) static CHAT_ASSETS_DROPPED: Counter = Counter::new("support_chat.chat.assets_dropped");

pub(crate) static HANDOFF_LOADS: Counter = Counter::new("support_chat.handoffs.loads");
pub(crate) static HANDOFF_LOAD_ERRORS: Counter = Counter::new("support_chat.handoffs.load_errors");
pub(crate) static HANDOFF_CARDS: Counter = Counter::new("support_chat.handoffs.cards");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_REQUEST_ERRORS);
    collector.register_moments(&CHAT_REQUEST_DURATION);
    collector.register_counter(&CHAT_SENDS_IGNORED);
    collector.register_moments(&CHAT_TYPING_DELAY);
    collector.register_counter(&CHAT_ASSETS_DROPPED);

    collector.register_counter(&HANDOFF_LOADS);
    collector.register_counter(&HANDOFF_LOAD_ERRORS);
    collector.register_counter(&HANDOFF_CARDS);
}
