//! Time and deferred execution for the chat session.
//!
//! The session never sleeps itself. It asks a [`Clock`] for the current time
//! and hands it callbacks to run after a delay, so tests can drive time by
//! hand with [`ManualClock`].

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;

use crate::utils::time::now_local;

/// A callback run once its delay has elapsed.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Time source and scheduler used by the chat session.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> OffsetDateTime;

    /// Runs `callback` once `delay` has elapsed.
    ///
    /// Scheduled callbacks cannot be cancelled.
    fn schedule(&self, delay: Duration, callback: Callback);
}

/// Wall-clock time with callbacks scheduled on the tokio runtime.
///
/// `schedule` must be called from within a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> OffsetDateTime {
        now_local()
    }

    fn schedule(&self, delay: Duration, callback: Callback) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    callback: Callback,
}

struct ManualState {
    start: OffsetDateTime,
    elapsed: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
    scheduled: Vec<Duration>,
}

/// A clock that only moves when told to.
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    /// Creates a manual clock reading `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            state: Mutex::new(ManualState {
                start,
                elapsed: Duration::ZERO,
                next_seq: 0,
                pending: Vec::new(),
                scheduled: Vec::new(),
            }),
        }
    }

    /// Number of callbacks waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Every delay ever passed to `schedule`, in call order.
    pub fn scheduled_delays(&self) -> Vec<Duration> {
        self.lock().scheduled.clone()
    }

    /// Moves time forward by `by`, running every callback that falls due.
    ///
    /// Callbacks run in due order without the clock's lock held, so they may
    /// schedule further work. Returns how many callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().elapsed.saturating_add(by);
        let mut ran = 0;
        loop {
            let next = {
                let mut state = self.lock();
                let index = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(index, _)| index);
                match index {
                    Some(index) => {
                        let pending = state.pending.remove(index);
                        state.elapsed = state.elapsed.max(pending.due);
                        Some(pending.callback)
                    }
                    None => {
                        state.elapsed = target;
                        None
                    }
                }
            };
            match next {
                Some(callback) => {
                    callback();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Runs every pending callback, advancing time as far as needed.
    pub fn run_all(&self) -> usize {
        let furthest = {
            let state = self.lock();
            state
                .pending
                .iter()
                .map(|p| p.due.saturating_sub(state.elapsed))
                .max()
        };
        match furthest {
            Some(by) => self.advance(by),
            None => 0,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let state = self.lock();
        state.start + state.elapsed
    }

    fn schedule(&self, delay: Duration, callback: Callback) {
        let mut state = self.lock();
        let due = state.elapsed.saturating_add(delay);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.scheduled.push(delay);
        state.pending.push(Pending { due, seq, callback });
    }
}
