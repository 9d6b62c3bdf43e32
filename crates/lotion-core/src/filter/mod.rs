//! Query filter construction.
//!
//! [`Builder`] accumulates clauses of the form
//! `{property: <name>, <prop>: {<cond>: <value>}}`. Each clause is checked
//! against the [`ConditionRuleset`] before it is added, so a built filter is
//! always one the store will accept.

mod builder;
mod ruleset;

pub use builder::{Builder, FilterError};
pub use ruleset::{ConditionRuleset, ValidationError, ValueShape};

use crate::property::PropertyKind;

closed_enum! {
    /// Property kind as it appears in a filter clause.
    Prop, what = "filter property kind",
    variants: [
        (Title, "title"),
        (RichText, "rich_text"),
        (Url, "url"),
        (Email, "email"),
        (Number, "number"),
        (Checkbox, "checkbox"),
        (Select, "select"),
        (MultiSelect, "multi_select"),
        (Status, "status"),
        (Date, "date"),
        (CreatedTime, "created_time"),
        (LastEditedTime, "last_edited_time"),
        (People, "people"),
        (CreatedBy, "created_by"),
        (LastEditedBy, "last_edited_by"),
        (Relation, "relation"),
    ]
}

impl Prop {
    /// The filter kind for a property kind, if that kind can be filtered on.
    pub fn for_kind(kind: PropertyKind) -> Option<Self> {
        Some(match kind {
            PropertyKind::Title => Self::Title,
            PropertyKind::Text => Self::RichText,
            PropertyKind::Url => Self::Url,
            PropertyKind::Email => Self::Email,
            PropertyKind::Number => Self::Number,
            PropertyKind::Checkbox => Self::Checkbox,
            PropertyKind::Select => Self::Select,
            PropertyKind::MultiSelect => Self::MultiSelect,
            PropertyKind::Status => Self::Status,
            PropertyKind::Date => Self::Date,
            PropertyKind::CreatedTime => Self::CreatedTime,
            PropertyKind::LastEditedTime => Self::LastEditedTime,
            PropertyKind::People => Self::People,
            PropertyKind::CreatedBy => Self::CreatedBy,
            PropertyKind::LastEditedBy => Self::LastEditedBy,
            PropertyKind::Relation => Self::Relation,
            PropertyKind::Rollup
            | PropertyKind::Button
            | PropertyKind::Cover
            | PropertyKind::Icon
            | PropertyKind::Parent => return None,
        })
    }
}

closed_enum! {
    /// Comparison operator of a filter clause.
    Cond, what = "filter condition",
    variants: [
        (Equals, "equals"),
        (DoesNotEqual, "does_not_equal"),
        (Contains, "contains"),
        (DoesNotContain, "does_not_contain"),
        (StartsWith, "starts_with"),
        (EndsWith, "ends_with"),
        (IsEmpty, "is_empty"),
        (IsNotEmpty, "is_not_empty"),
        (GreaterThan, "greater_than"),
        (LessThan, "less_than"),
        (GreaterThanOrEqualTo, "greater_than_or_equal_to"),
        (LessThanOrEqualTo, "less_than_or_equal_to"),
        (Before, "before"),
        (After, "after"),
        (OnOrBefore, "on_or_before"),
        (OnOrAfter, "on_or_after"),
        (PastWeek, "past_week"),
        (PastMonth, "past_month"),
        (PastYear, "past_year"),
        (NextWeek, "next_week"),
        (NextMonth, "next_month"),
        (NextYear, "next_year"),
        (ThisWeek, "this_week"),
    ]
}
