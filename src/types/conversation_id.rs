use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Number of random base-36 characters appended to a generated id.
const SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier tying every message of one chat session together.
///
/// Generated ids look like `conv_1718040000000_k3j9x0q2a`: the creation time
/// in unix milliseconds followed by a random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier for a session starting at `now`.
    pub fn generate(now: OffsetDateTime) -> Self {
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        let mut bytes = [0u8; SUFFIX_LEN];
        if getrandom::getrandom(&mut bytes).is_err() {
            // Without an entropy source, spread the sub-millisecond clock bits.
            let mut seed = now.nanosecond() as u64 ^ 0x9e37_79b9_7f4a_7c15;
            for byte in bytes.iter_mut() {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                *byte = seed as u8;
            }
        }
        let suffix: String = bytes
            .iter()
            .map(|b| BASE36[(*b as usize) % BASE36.len()] as char)
            .collect();
        Self(format!("conv_{millis}_{suffix}"))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn generated_shape() {
        let id = ConversationId::generate(datetime!(2024-06-10 17:20:00 UTC));
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "conv");
        assert_eq!(parts[1], "1718040000000");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ConversationId::new("conv_1_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""conv_1_abc""#);
    }
}
