//! Date-bearing properties: Date, CreatedTime and LastEditedTime.
//!
//! Every timestamp is normalized into the [`StoreOffset`] it was parsed with.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, envelope, id_of, sub_key};
use crate::error::{PropertyError, Result};
use crate::time::{StoreOffset, format_timestamp, parse_date, parse_timestamp};

/// One end of a date range: a calendar date or a full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl DateBound {
    /// Parses `YYYY-MM-DD` as a date and anything longer as a timestamp.
    pub fn parse(text: &str, offset: StoreOffset) -> Result<Self> {
        if text.len() == 10 {
            parse_date(text).map(Self::Date)
        } else {
            parse_timestamp(text, offset).map(Self::DateTime)
        }
    }

    /// The calendar date, in the bound's own offset for timestamps.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(instant) => instant.date_naive(),
        }
    }

    pub fn has_time(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    pub fn to_wire_string(&self) -> String {
        match self {
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::DateTime(instant) => format_timestamp(instant),
        }
    }
}

/// The value of a Date property.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: DateBound,
    pub end: Option<DateBound>,
    pub time_zone: Option<String>,
    nulls: NullKeys,
}

/// Optional keys the store sent as explicit `null`; re-emitted so that
/// round trips keep the original shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NullKeys {
    end: bool,
    time_zone: bool,
}

impl DateRange {
    pub fn starting(start: DateBound) -> Self {
        Self {
            start,
            end: None,
            time_zone: None,
            nulls: NullKeys::default(),
        }
    }

    pub fn with_end(self, end: DateBound) -> Self {
        Self {
            end: Some(end),
            ..self
        }
    }

    fn to_wire(&self) -> Value {
        let mut wire = Map::new();
        wire.insert("start".to_owned(), Value::String(self.start.to_wire_string()));
        match &self.end {
            Some(end) => {
                wire.insert("end".to_owned(), Value::String(end.to_wire_string()));
            }
            None if self.nulls.end => {
                wire.insert("end".to_owned(), Value::Null);
            }
            None => {}
        }
        match &self.time_zone {
            Some(zone) => {
                wire.insert("time_zone".to_owned(), Value::String(zone.clone()));
            }
            None if self.nulls.time_zone => {
                wire.insert("time_zone".to_owned(), Value::Null);
            }
            None => {}
        }
        Value::Object(wire)
    }
}

/// Shape of the wire `date` object before bounds are parsed.
#[derive(Deserialize)]
struct RawDateRange {
    start: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
}

/// A date or date range; `range` is `None` when the date is unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Date {
    pub name: String,
    pub id: Option<String>,
    pub range: Option<DateRange>,
}

impl Date {
    pub fn new(name: impl Into<String>, range: Option<DateRange>) -> Self {
        Self {
            name: name.into(),
            id: None,
            range,
        }
    }

    /// A single date or timestamp with no end.
    pub fn from_start(name: impl Into<String>, start: DateBound) -> Self {
        Self::new(name, Some(DateRange::starting(start)))
    }

    pub fn start(&self) -> Option<&DateBound> {
        self.range.as_ref().map(|r| &r.start)
    }

    pub fn end(&self) -> Option<&DateBound> {
        self.range.as_ref().and_then(|r| r.end.as_ref())
    }

    pub(crate) fn parse(name: &str, params: &Params, offset: StoreOffset) -> Result<Self> {
        let kind = PropertyKind::Date;
        let value = sub_key(name, kind, params)?;
        let raw: Option<RawDateRange> = decode(name, kind, value)?;
        let bound = |text: &str| {
            DateBound::parse(text, offset)
                .map_err(|e| PropertyError::malformed(name, kind, e.to_string()))
        };
        let range = match raw {
            Some(raw) => {
                let is_null = |key: &str| value.get(key).is_some_and(Value::is_null);
                Some(DateRange {
                    start: bound(&raw.start)?,
                    end: raw.end.as_deref().map(bound).transpose()?,
                    time_zone: raw.time_zone,
                    nulls: NullKeys {
                        end: is_null("end"),
                        time_zone: is_null("time_zone"),
                    },
                })
            }
            None => None,
        };
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            range,
        })
    }

    pub fn to_wire(&self) -> Value {
        let value = self.range.as_ref().map_or(Value::Null, DateRange::to_wire);
        Value::Object(envelope(PropertyKind::Date, value, self.id.as_deref()))
    }
}

macro_rules! timestamp_property {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
            pub value: DateTime<FixedOffset>,
        }

        impl $name {
            pub fn new(name: impl Into<String>, value: DateTime<FixedOffset>) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                    value,
                }
            }

            /// Parses `{<kind>: isoDatetime}` into the store offset.
            pub fn of(name: &str, params: &Params, offset: StoreOffset) -> Result<Self> {
                Self::parse(name, params, offset)
            }

            /// The ISO-8601 form used in filter clauses.
            pub fn value_for_filter(&self) -> String {
                format_timestamp(&self.value)
            }

            pub(crate) fn parse(name: &str, params: &Params, offset: StoreOffset) -> Result<Self> {
                let text: String = decode(name, $kind, sub_key(name, $kind, params)?)?;
                let value = parse_timestamp(&text, offset)
                    .map_err(|e| PropertyError::malformed(name, $kind, e.to_string()))?;
                Ok(Self {
                    name: name.to_owned(),
                    id: id_of(params),
                    value,
                })
            }

            pub fn to_wire(&self) -> Value {
                Value::Object(envelope(
                    $kind,
                    Value::String(format_timestamp(&self.value)),
                    self.id.as_deref(),
                ))
            }
        }
    };
}

timestamp_property! {
    /// When the page was created. Read-only in the store.
    CreatedTime, PropertyKind::CreatedTime
}

timestamp_property! {
    /// When the page was last edited. Read-only in the store.
    LastEditedTime, PropertyKind::LastEditedTime
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn created_time_is_shifted_to_plus_nine() {
        let params = json!({"created_time": "2024-01-01T00:00:00"});
        let created = CreatedTime::of("Created", params.as_object().unwrap(), StoreOffset::default()).unwrap();
        assert_eq!(created.value, at("2024-01-01T09:00:00+09:00"));
        assert_eq!(created.value.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(created.id, None);
    }

    #[test]
    fn last_edited_time_serializes_with_offset() {
        let wire = json!({"id": "e", "type": "last_edited_time", "last_edited_time": "2024-05-01T03:00:00.000Z"});
        let edited = Property::from_wire("Edited", &wire).unwrap();
        assert_eq!(
            edited.to_wire(),
            json!({"id": "e", "type": "last_edited_time", "last_edited_time": "2024-05-01T12:00:00+09:00"})
        );
    }

    #[test]
    fn date_only_start_stays_a_date() {
        let wire = json!({"type": "date", "date": {"start": "2024-02-29", "end": null, "time_zone": null}});
        let Property::Date(date) = Property::from_wire("Due", &wire).unwrap() else {
            panic!("expected a date");
        };
        let start = date.start().unwrap();
        assert!(!start.has_time());
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(date.end(), None);
    }

    #[test]
    fn date_range_timestamps_are_normalized() {
        let wire = json!({"type": "date", "date": {"start": "2024-01-01T15:00:00Z", "end": "2024-01-01T16:00:00Z"}});
        let Property::Date(date) = Property::from_wire("Meeting", &wire).unwrap() else {
            panic!("expected a date");
        };
        assert_eq!(date.start(), Some(&DateBound::DateTime(at("2024-01-02T00:00:00+09:00"))));
        assert_eq!(date.start().unwrap().date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(
            date.to_wire()["date"],
            json!({"start": "2024-01-02T00:00:00+09:00", "end": "2024-01-02T01:00:00+09:00"})
        );
    }

    #[test]
    fn absent_optional_keys_stay_absent() {
        let wire = json!({"type": "date", "date": {"start": "2024-01-01"}});
        let date = Property::from_wire("Due", &wire).unwrap();
        assert_eq!(date.to_wire(), wire);

        let wire = json!({"type": "date", "date": {"start": "2024-01-01", "end": null}});
        assert_eq!(Property::from_wire("Due", &wire).unwrap().to_wire(), wire);
    }

    #[test]
    fn constructed_ranges_emit_only_set_keys() {
        let start = DateBound::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let end = DateBound::Date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        let date = Date::new("Trip", Some(DateRange::starting(start).with_end(end)));
        assert_eq!(
            date.to_wire(),
            json!({"type": "date", "date": {"start": "2024-03-01", "end": "2024-03-02"}})
        );
    }

    #[test]
    fn unset_date_round_trips_as_null() {
        let date = Date::new("Due", None);
        assert_eq!(date.to_wire(), json!({"type": "date", "date": null}));
    }

    #[test]
    fn bad_date_text_is_malformed() {
        let wire = json!({"type": "date", "date": {"start": "not a date"}});
        let err = Property::from_wire("Due", &wire).unwrap_err();
        assert!(matches!(err, PropertyError::Malformed { kind: PropertyKind::Date, .. }));

        let wire = json!({"type": "created_time", "created_time": 12});
        assert!(Property::from_wire("Created", &wire).unwrap_err().is_malformed_wire());
    }
}
