//! Which conditions are legal for which property kinds, and with what values.

use std::fmt;

use serde_json::{Map, Value};

use super::{Cond, Prop};
use crate::time::{StoreOffset, parse_date, parse_timestamp};

/// The accepted value shape for one `(Prop, Cond)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Any non-empty string.
    Text,
    /// Any JSON number.
    Number,
    Boolean,
    /// A non-empty option name.
    Tag,
    /// A non-empty option name, or a non-empty list of them.
    Tags,
    /// `YYYY-MM-DD` or an ISO-8601 timestamp.
    IsoDate,
    /// A non-empty user or page id.
    Id,
    /// `is_empty` / `is_not_empty`: `null` or `true`, sent as `true`.
    Flag,
    /// Relative date windows: `null` or `{}`, sent as `{}`.
    EmptyObject,
}

impl ValueShape {
    /// Checks `value` and returns the form to send, or `None` if it does not fit.
    pub fn accept(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::Text, Value::String(s)) if !s.is_empty() => Some(Value::String(s)),
            (Self::Number, v @ Value::Number(_)) => Some(v),
            (Self::Boolean, v @ Value::Bool(_)) => Some(v),
            (Self::Tag | Self::Id, Value::String(s)) if !s.trim().is_empty() => {
                Some(Value::String(s))
            }
            (Self::Tags, Value::String(s)) if !s.trim().is_empty() => Some(Value::String(s)),
            (Self::Tags, Value::Array(items))
                if !items.is_empty()
                    && items
                        .iter()
                        .all(|i| i.as_str().is_some_and(|s| !s.trim().is_empty())) =>
            {
                Some(Value::Array(items))
            }
            (Self::IsoDate, Value::String(s)) if is_iso_date(&s) => Some(Value::String(s)),
            (Self::Flag, Value::Null | Value::Bool(true)) => Some(Value::Bool(true)),
            (Self::EmptyObject, Value::Null) => Some(Value::Object(Map::new())),
            (Self::EmptyObject, Value::Object(m)) if m.is_empty() => Some(Value::Object(m)),
            _ => None,
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "a non-empty string",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::Tag => "a non-empty option name",
            Self::Tags => "an option name or a list of option names",
            Self::IsoDate => "an ISO-8601 date",
            Self::Id => "a non-empty id",
            Self::Flag => "true or null",
            Self::EmptyObject => "{} or null",
        })
    }
}

fn is_iso_date(text: &str) -> bool {
    parse_date(text).is_ok() || parse_timestamp(text, StoreOffset::utc()).is_ok()
}

/// A clause that the ruleset rejects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("condition {cond} is not supported for {prop} properties")]
    UnsupportedCondition { prop: Prop, cond: Cond },

    #[error("{prop} {cond} expects {expected}, got {value}")]
    InvalidValue {
        prop: Prop,
        cond: Cond,
        expected: ValueShape,
        value: Value,
    },
}

use Cond::*;
use ValueShape::{Boolean, EmptyObject, Flag, Id, IsoDate, Tag, Tags, Text};

const TEXT_RULES: &[(Cond, ValueShape)] = &[
    (Equals, Text),
    (DoesNotEqual, Text),
    (Contains, Text),
    (DoesNotContain, Text),
    (StartsWith, Text),
    (EndsWith, Text),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
];

const NUMBER_RULES: &[(Cond, ValueShape)] = &[
    (Equals, ValueShape::Number),
    (DoesNotEqual, ValueShape::Number),
    (GreaterThan, ValueShape::Number),
    (LessThan, ValueShape::Number),
    (GreaterThanOrEqualTo, ValueShape::Number),
    (LessThanOrEqualTo, ValueShape::Number),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
];

const CHECKBOX_RULES: &[(Cond, ValueShape)] = &[(Equals, Boolean), (DoesNotEqual, Boolean)];

const SELECT_RULES: &[(Cond, ValueShape)] = &[
    (Equals, Tag),
    (DoesNotEqual, Tag),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
];

const MULTI_SELECT_RULES: &[(Cond, ValueShape)] = &[
    (Contains, Tags),
    (DoesNotContain, Tags),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
];

const DATE_RULES: &[(Cond, ValueShape)] = &[
    (Equals, IsoDate),
    (Before, IsoDate),
    (After, IsoDate),
    (OnOrBefore, IsoDate),
    (OnOrAfter, IsoDate),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
    (PastWeek, EmptyObject),
    (PastMonth, EmptyObject),
    (PastYear, EmptyObject),
    (NextWeek, EmptyObject),
    (NextMonth, EmptyObject),
    (NextYear, EmptyObject),
    (ThisWeek, EmptyObject),
];

// Store-assigned timestamps are never empty.
const TIMESTAMP_RULES: &[(Cond, ValueShape)] = &[
    (Equals, IsoDate),
    (Before, IsoDate),
    (After, IsoDate),
    (OnOrBefore, IsoDate),
    (OnOrAfter, IsoDate),
    (PastWeek, EmptyObject),
    (PastMonth, EmptyObject),
    (PastYear, EmptyObject),
    (NextWeek, EmptyObject),
    (NextMonth, EmptyObject),
    (NextYear, EmptyObject),
    (ThisWeek, EmptyObject),
];

const REFERENCE_RULES: &[(Cond, ValueShape)] = &[
    (Contains, Id),
    (DoesNotContain, Id),
    (IsEmpty, Flag),
    (IsNotEmpty, Flag),
];

/// The static compatibility table between [`Prop`] and [`Cond`].
pub struct ConditionRuleset;

impl ConditionRuleset {
    /// Every legal condition for `prop`, with its value shape.
    pub fn rules_for(prop: Prop) -> &'static [(Cond, ValueShape)] {
        match prop {
            Prop::Title | Prop::RichText | Prop::Url | Prop::Email => TEXT_RULES,
            Prop::Number => NUMBER_RULES,
            Prop::Checkbox => CHECKBOX_RULES,
            Prop::Select | Prop::Status => SELECT_RULES,
            Prop::MultiSelect => MULTI_SELECT_RULES,
            Prop::Date => DATE_RULES,
            Prop::CreatedTime | Prop::LastEditedTime => TIMESTAMP_RULES,
            Prop::People | Prop::CreatedBy | Prop::LastEditedBy | Prop::Relation => {
                REFERENCE_RULES
            }
        }
    }

    /// The value shape for a pair, or `None` when the pair is not in the table.
    pub fn shape_for(prop: Prop, cond: Cond) -> Option<ValueShape> {
        Self::rules_for(prop)
            .iter()
            .find(|(c, _)| *c == cond)
            .map(|(_, shape)| *shape)
    }

    pub fn is_supported(prop: Prop, cond: Cond) -> bool {
        Self::shape_for(prop, cond).is_some()
    }

    /// Fails unless the pair is in the table and `value` has its shape.
    pub fn validate(prop: Prop, cond: Cond, value: &Value) -> Result<(), ValidationError> {
        Self::normalize(prop, cond, value.clone()).map(|_| ())
    }

    /// Validates like [`validate`](Self::validate) and returns the value in
    /// the form the store expects (placeholders for `is_empty` and relative
    /// date windows are filled in).
    pub fn normalize(prop: Prop, cond: Cond, value: Value) -> Result<Value, ValidationError> {
        let expected = Self::shape_for(prop, cond)
            .ok_or(ValidationError::UnsupportedCondition { prop, cond })?;
        match expected.accept(value.clone()) {
            Some(accepted) => Ok(accepted),
            None => Err(ValidationError::InvalidValue {
                prop,
                cond,
                expected,
                value,
            }),
        }
    }
}
