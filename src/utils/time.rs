use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Returns the current wall-clock time, in the local offset when it is known.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Formats a chat bubble time as `HH:MM`.
pub fn clock_label(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

/// Formats a backend timestamp as `DD/MM/YYYY, HH:MM`.
///
/// Accepts RFC 3339 as well as naive ISO 8601 date-times. Values that parse
/// as neither are returned unchanged.
pub fn handoff_label(timestamp: &str) -> String {
    let description = format_description!("[day]/[month]/[year], [hour]:[minute]");
    let formatted = match parse_timestamp(timestamp) {
        Some(Timestamp::Offset(datetime)) => datetime.format(description).ok(),
        Some(Timestamp::Naive(datetime)) => datetime.format(description).ok(),
        None => None,
    };
    formatted.unwrap_or_else(|| timestamp.to_string())
}

/// A backend timestamp, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// The timestamp carried an explicit offset.
    Offset(OffsetDateTime),
    /// The timestamp carried no offset.
    Naive(PrimitiveDateTime),
}

/// Parses a timestamp in any of the shapes the backend emits.
pub fn parse_timestamp(timestamp: &str) -> Option<Timestamp> {
    let timestamp = timestamp.trim();
    if let Ok(datetime) = OffsetDateTime::parse(timestamp, &Rfc3339) {
        return Some(Timestamp::Offset(datetime));
    }
    PrimitiveDateTime::parse(
        timestamp,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            timestamp,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            timestamp,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            timestamp,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            timestamp,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .ok()
    .map(Timestamp::Naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn clock_labels() {
        assert_eq!(clock_label(datetime!(2024-06-10 09:05:59 UTC)), "09:05");
        assert_eq!(clock_label(datetime!(2024-06-10 23:59:00 -5)), "23:59");
    }

    #[test]
    fn handoff_labels() {
        assert_eq!(handoff_label("2024-06-10T17:20:00"), "10/06/2024, 17:20");
        assert_eq!(
            handoff_label("2024-06-10T17:20:00.123456"),
            "10/06/2024, 17:20"
        );
        assert_eq!(handoff_label("2024-06-10 08:01:02"), "10/06/2024, 08:01");
        assert_eq!(
            handoff_label("2024-06-10T17:20:00-05:00"),
            "10/06/2024, 17:20"
        );
    }

    #[test]
    fn unparsable_timestamps_pass_through() {
        assert_eq!(handoff_label("yesterday"), "yesterday");
        assert_eq!(handoff_label(""), "");
    }

    #[test]
    fn parse_shapes() {
        assert!(matches!(
            parse_timestamp("2024-06-10T17:20:00Z"),
            Some(Timestamp::Offset(_))
        ));
        assert!(matches!(
            parse_timestamp("2024-06-10T17:20"),
            Some(Timestamp::Naive(_))
        ));
        assert!(parse_timestamp("10/06/2024").is_none());
    }
}
