//! The store's fixed-offset timestamp convention.
//!
//! The store records instants in UTC. Pages are read in one fixed local zone
//! (+09:00), independent of the host's timezone: every parsed timestamp is
//! converted into a [`StoreOffset`] and re-emitted with that offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};

use crate::error::{PropertyError, Result};

/// Hours east of UTC used when no other offset is configured.
pub const STORE_OFFSET_HOURS: i32 = 9;

/// The fixed offset timestamps are normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreOffset(FixedOffset);

impl StoreOffset {
    /// Builds an offset from whole hours east of UTC.
    ///
    /// Returns `None` when the offset is a day or more.
    pub fn from_hours(hours: i32) -> Option<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self)
    }

    /// The zero offset (UTC).
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Returns the underlying chrono offset.
    pub fn fixed(&self) -> FixedOffset {
        self.0
    }

    /// Whole hours east of UTC.
    pub fn hours(&self) -> i32 {
        self.0.local_minus_utc() / 3600
    }

    /// Converts any instant into this offset.
    pub fn normalize<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0)
    }

    /// The current instant in this offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.normalize(&Utc::now())
    }
}

impl Default for StoreOffset {
    fn default() -> Self {
        Self::from_hours(STORE_OFFSET_HOURS).unwrap_or_else(Self::utc)
    }
}

/// Parses an ISO-8601 timestamp from the store and converts it into `offset`.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00.000Z`, `...+00:00`) and naive
/// datetimes (`2024-01-01T00:00:00`), which are read as UTC.
pub fn parse_timestamp(text: &str, offset: StoreOffset) -> Result<DateTime<FixedOffset>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(offset.normalize(&instant));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| offset.normalize(&naive.and_utc()))
        .map_err(|source| PropertyError::InvalidTimestamp {
            value: text.to_owned(),
            source,
        })
}

/// Parses a calendar date (`YYYY-MM-DD`).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|source| PropertyError::InvalidTimestamp {
        value: text.to_owned(),
        source,
    })
}

/// Formats a timestamp as RFC 3339 with its numeric offset.
///
/// Sub-second digits appear only when present.
pub fn format_timestamp(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn default_offset_is_plus_nine() {
        assert_eq!(StoreOffset::default().hours(), 9);
    }

    #[test]
    fn from_hours_rejects_a_full_day() {
        assert!(StoreOffset::from_hours(24).is_none());
        assert!(StoreOffset::from_hours(-5).is_some());
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let parsed = parse_timestamp("2024-01-01T00:00:00", StoreOffset::default()).unwrap();
        assert_eq!(parsed, at("2024-01-01T09:00:00+09:00"));
        assert_eq!(parsed.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(format_timestamp(&parsed), "2024-01-01T09:00:00+09:00");
    }

    #[test]
    fn zulu_timestamps_keep_their_instant() {
        let parsed = parse_timestamp("2024-03-10T15:30:00.000Z", StoreOffset::default()).unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-03-11T00:30:00+09:00");
    }

    #[test]
    fn offset_is_swappable() {
        let parsed = parse_timestamp("2024-01-01T00:00:00Z", StoreOffset::utc()).unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn fractional_seconds_survive() {
        let parsed = parse_timestamp("2024-01-01T00:00:00.250Z", StoreOffset::default()).unwrap();
        assert_eq!(format_timestamp(&parsed), "2024-01-01T09:00:00.250+09:00");
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_timestamp("yesterday", StoreOffset::default()).unwrap_err();
        assert!(err.is_malformed_wire());
        assert!(parse_date("2024-13-01").is_err());
        assert_eq!(parse_date("2024-02-29").unwrap().to_string(), "2024-02-29");
    }
}
