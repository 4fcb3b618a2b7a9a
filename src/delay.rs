//! Pacing for the simulated typing delay.
//!
//! A reply is held back for `base + per_char * length + jitter`, clamped to
//! `[min, max]`, before it is shown. With the defaults that is
//! `clamp(1500ms, 4000ms, 1200ms + 50ms * length + [0, 800)ms)`.

use std::time::Duration;

/// Parameters of the simulated typing delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    /// Fixed time spent before any character is "typed".
    pub base: Duration,
    /// Time added for each character of the reply.
    pub per_char: Duration,
    /// Exclusive upper bound of the random variation.
    pub jitter: Duration,
    /// Shortest delay ever applied.
    pub min: Duration,
    /// Longest delay ever applied.
    pub max: Duration,
}

impl TypingDelay {
    /// Creates the default pacing.
    pub const fn new() -> Self {
        Self {
            base: Duration::from_millis(1200),
            per_char: Duration::from_millis(50),
            jitter: Duration::from_millis(800),
            min: Duration::from_millis(1500),
            max: Duration::from_millis(4000),
        }
    }

    /// Computes the delay for a reply of `reply_len` characters.
    ///
    /// `jitter` is the random variation already sampled by the caller.
    pub fn delay_for(&self, reply_len: usize, jitter: Duration) -> Duration {
        let chars = u32::try_from(reply_len).unwrap_or(u32::MAX);
        let raw = self
            .base
            .saturating_add(self.per_char.saturating_mul(chars))
            .saturating_add(jitter);
        raw.clamp(self.min, self.max.max(self.min))
    }

    /// Samples a jitter from `source` and computes the delay for `reply_len`.
    pub fn sample(&self, reply_len: usize, source: &dyn Jitter) -> Duration {
        self.delay_for(reply_len, source.sample(self.jitter))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of the random variation added to each typing delay.
pub trait Jitter: Send + Sync {
    /// Returns a duration in `[0, max)`, or zero when `max` is zero.
    fn sample(&self, max: Duration) -> Duration;
}

/// Jitter drawn from the operating system's random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsJitter;

impl Jitter for OsJitter {
    fn sample(&self, max: Duration) -> Duration {
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let mut bytes = [0u8; 8];
        if getrandom::getrandom(&mut bytes).is_err() {
            return Duration::ZERO;
        }
        Duration::from_millis(u64::from_le_bytes(bytes) % max_ms)
    }
}

/// Jitter that always returns the same value, capped below `max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn sample(&self, max: Duration) -> Duration {
        if max.is_zero() {
            Duration::ZERO
        } else {
            self.0.min(max.saturating_sub(Duration::from_millis(1)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn bounds_hold_for_every_length_and_jitter() {
        let pacing = TypingDelay::new();
        for len in [0usize, 1, 5, 6, 20, 55, 56, 100, 10_000, usize::MAX] {
            for jitter in [0u64, 1, 299, 300, 301, 799] {
                let delay = pacing.delay_for(len, ms(jitter));
                assert!(delay >= ms(1500), "len={len} jitter={jitter} -> {delay:?}");
                assert!(delay <= ms(4000), "len={len} jitter={jitter} -> {delay:?}");
            }
        }
    }

    #[test]
    fn short_replies_hit_the_floor() {
        let pacing = TypingDelay::new();
        assert_eq!(pacing.delay_for(0, ms(0)), ms(1500));
        assert_eq!(pacing.delay_for(0, ms(300)), ms(1500));
        assert_eq!(pacing.delay_for(0, ms(301)), ms(1501));
        assert_eq!(pacing.delay_for(0, ms(799)), ms(1999));
    }

    #[test]
    fn grows_with_length() {
        let pacing = TypingDelay::new();
        assert_eq!(pacing.delay_for(20, ms(0)), ms(2200));
        assert_eq!(pacing.delay_for(20, ms(100)), ms(2300));
        assert_eq!(pacing.delay_for(56, ms(0)), ms(4000));
        assert_eq!(pacing.delay_for(1_000, ms(799)), ms(4000));
    }

    #[test]
    fn emoji_replies_pace_like_two_characters_each() {
        let reply = crate::types::ChatReply::text("😀".repeat(10));
        assert_eq!(
            TypingDelay::new().delay_for(reply.typing_length(), ms(0)),
            ms(2200)
        );
    }

    #[test]
    fn os_jitter_stays_below_max() {
        for _ in 0..64 {
            assert!(OsJitter.sample(ms(800)) < ms(800));
        }
        assert_eq!(OsJitter.sample(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn fixed_jitter_is_capped() {
        assert_eq!(FixedJitter(ms(250)).sample(ms(800)), ms(250));
        assert_eq!(FixedJitter(ms(5_000)).sample(ms(800)), ms(799));
        assert_eq!(FixedJitter(ms(250)).sample(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn sample_uses_source() {
        let pacing = TypingDelay::new();
        assert_eq!(pacing.sample(20, &FixedJitter(ms(400))), ms(2600));
    }
}
