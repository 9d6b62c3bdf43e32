//! The closed set of typed page properties.
//!
//! Each wire property is an object carrying a `type` discriminator and a
//! sub-key of the same name holding the value:
//!
//! ```json
//! {"id": "a%3Bc", "type": "checkbox", "checkbox": true}
//! ```
//!
//! [`Property::from_wire`] dispatches on the discriminator to the matching
//! variant's parser; [`Property::to_wire`] is its inverse.

mod date;
mod page_meta;
mod people;
mod relation;
mod scalar;
mod select;
mod text;

pub use date::{CreatedTime, Date, DateBound, DateRange, LastEditedTime};
pub use page_meta::{Cover, CoverSource, FileLink, Icon, IconSource, Parent, ParentRef};
pub use people::{CreatedBy, LastEditedBy, People, User};
pub use relation::{Relation, Rollup};
pub use scalar::{Button, Checkbox, Email, Number, Url};
pub use select::{MultiSelect, Select, SelectOption, Status};
pub use text::{RichText, RichTextSegment, Text, TextContent, Title};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PropertyError, Result};
use crate::time::StoreOffset;

closed_enum! {
    /// Wire discriminator of a property.
    PropertyKind, what = "property kind",
    variants: [
        (Title, "title"),
        (Text, "rich_text"),
        (Number, "number"),
        (Checkbox, "checkbox"),
        (Select, "select"),
        (MultiSelect, "multi_select"),
        (Status, "status"),
        (Date, "date"),
        (Url, "url"),
        (Email, "email"),
        (Relation, "relation"),
        (Rollup, "rollup"),
        (People, "people"),
        (CreatedTime, "created_time"),
        (LastEditedTime, "last_edited_time"),
        (CreatedBy, "created_by"),
        (LastEditedBy, "last_edited_by"),
        (Button, "button"),
        /// Page-level attribute, not a store property type.
        (Cover, "cover"),
        /// Page-level attribute, not a store property type.
        (Icon, "icon"),
        /// Page-level attribute, not a store property type.
        (Parent, "parent"),
    ]
}

impl PropertyKind {
    /// Returns `true` for kinds the store computes itself and rejects on update.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::CreatedTime
                | Self::LastEditedTime
                | Self::CreatedBy
                | Self::LastEditedBy
                | Self::Rollup
                | Self::Button
        )
    }

    /// Returns `true` for kinds that live at the page's top level rather than
    /// in its `properties` map.
    pub fn is_page_attribute(&self) -> bool {
        matches!(self, Self::Cover | Self::Icon | Self::Parent)
    }
}

/// Implemented by every variant struct; allows typed lookups such as
/// [`Properties::get`](crate::Properties::get).
pub trait TypedProperty: Sized {
    /// The kind this struct represents.
    const KIND: PropertyKind;

    /// Borrows the variant out of a [`Property`] if the kinds match.
    fn from_property(property: &Property) -> Option<&Self>;
}

// ---------------------------------------------------------------------------
// Macro: the Property enum and its per-variant plumbing.
// ---------------------------------------------------------------------------
macro_rules! property_variants {
    ( $( $variant:ident ),+ $(,)? ) => {
        /// One typed page property.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Property {
            $( $variant($variant), )+
        }

        impl Property {
            /// The property's name (its key in the page's `properties` map).
            pub fn name(&self) -> &str {
                match self {
                    $( Self::$variant(p) => &p.name, )+
                }
            }

            /// The store-assigned id, absent for properties not yet persisted.
            pub fn id(&self) -> Option<&str> {
                match self {
                    $( Self::$variant(p) => p.id.as_deref(), )+
                }
            }

            /// The fixed kind tag of this variant.
            pub fn kind(&self) -> PropertyKind {
                match self {
                    $( Self::$variant(_) => PropertyKind::$variant, )+
                }
            }

            /// Serializes to the wire shape.
            pub fn to_wire(&self) -> Value {
                match self {
                    $( Self::$variant(p) => p.to_wire(), )+
                }
            }
        }

        $(
            impl From<$variant> for Property {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }

            impl TypedProperty for $variant {
                const KIND: PropertyKind = PropertyKind::$variant;

                fn from_property(property: &Property) -> Option<&Self> {
                    match property {
                        Property::$variant(p) => Some(p),
                        _ => None,
                    }
                }
            }
        )+
    };
}

property_variants! {
    Title,
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Status,
    Date,
    Url,
    Email,
    Relation,
    Rollup,
    People,
    CreatedTime,
    LastEditedTime,
    CreatedBy,
    LastEditedBy,
    Button,
    Cover,
    Icon,
    Parent,
}

impl Property {
    /// Parses one wire property using the default [`StoreOffset`].
    pub fn from_wire(name: &str, params: &Value) -> Result<Self> {
        Self::from_wire_in(name, params, StoreOffset::default())
    }

    /// Parses one wire property, normalizing timestamps into `offset`.
    ///
    /// Page-level attributes (cover, icon, parent) have no `type` tag of
    /// their own in the `properties` map and are rejected here.
    pub fn from_wire_in(name: &str, params: &Value, offset: StoreOffset) -> Result<Self> {
        let params = params
            .as_object()
            .ok_or_else(|| PropertyError::not_an_object(format!("property {name:?}"), params))?;
        let tag = params
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| PropertyError::MissingType {
                name: name.to_owned(),
            })?;
        let unknown = || PropertyError::UnknownType {
            name: name.to_owned(),
            tag: tag.to_owned(),
        };
        let kind = PropertyKind::from_wire_type(tag).ok_or_else(unknown)?;
        debug!(name, %kind, "parsing property");

        let property = match kind {
            PropertyKind::Title => Title::parse(name, params)?.into(),
            PropertyKind::Text => Text::parse(name, params)?.into(),
            PropertyKind::Number => Number::parse(name, params)?.into(),
            PropertyKind::Checkbox => Checkbox::parse(name, params)?.into(),
            PropertyKind::Select => Select::parse(name, params)?.into(),
            PropertyKind::MultiSelect => MultiSelect::parse(name, params)?.into(),
            PropertyKind::Status => Status::parse(name, params)?.into(),
            PropertyKind::Date => Date::parse(name, params, offset)?.into(),
            PropertyKind::Url => Url::parse(name, params)?.into(),
            PropertyKind::Email => Email::parse(name, params)?.into(),
            PropertyKind::Relation => Relation::parse(name, params)?.into(),
            PropertyKind::Rollup => Rollup::parse(name, params)?.into(),
            PropertyKind::People => People::parse(name, params)?.into(),
            PropertyKind::CreatedTime => CreatedTime::parse(name, params, offset)?.into(),
            PropertyKind::LastEditedTime => LastEditedTime::parse(name, params, offset)?.into(),
            PropertyKind::CreatedBy => CreatedBy::parse(name, params)?.into(),
            PropertyKind::LastEditedBy => LastEditedBy::parse(name, params)?.into(),
            PropertyKind::Button => Button::parse(name, params)?.into(),
            PropertyKind::Cover | PropertyKind::Icon | PropertyKind::Parent => {
                return Err(unknown());
            }
        };
        Ok(property)
    }

    /// The JSON value a filter clause would compare against, or `None` when
    /// the property holds nothing filterable.
    pub fn value_for_filter(&self) -> Option<Value> {
        match self {
            Self::Title(p) => Some(Value::String(p.text())),
            Self::Text(p) => Some(Value::String(p.text())),
            Self::Number(p) => p.number.clone().map(Value::Number),
            Self::Checkbox(p) => Some(Value::Bool(p.checked)),
            Self::Select(p) => p.selected_name().map(|n| Value::String(n.to_owned())),
            Self::Status(p) => p.selected_name().map(|n| Value::String(n.to_owned())),
            Self::MultiSelect(p) => p.names().first().map(|n| Value::String((*n).to_owned())),
            Self::Date(p) => p.start().map(|start| Value::String(start.to_wire_string())),
            Self::Url(p) => p.url.clone().map(Value::String),
            Self::Email(p) => p.email.clone().map(Value::String),
            Self::Relation(p) => p.ids.first().cloned().map(Value::String),
            Self::People(p) => p.people.first().map(|u| Value::String(u.id.clone())),
            Self::CreatedTime(p) => Some(Value::String(p.value_for_filter())),
            Self::LastEditedTime(p) => Some(Value::String(p.value_for_filter())),
            Self::CreatedBy(p) => Some(Value::String(p.user.id.clone())),
            Self::LastEditedBy(p) => Some(Value::String(p.user.id.clone())),
            Self::Rollup(_) | Self::Button(_) | Self::Cover(_) | Self::Icon(_) | Self::Parent(_) => {
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wire helpers shared by the variant modules
// ---------------------------------------------------------------------------

/// A wire property object.
pub(crate) type Params = Map<String, Value>;

/// Returns the kind's sub-key value, or [`PropertyError::MissingKey`].
pub(crate) fn sub_key<'a>(name: &str, kind: PropertyKind, params: &'a Params) -> Result<&'a Value> {
    params
        .get(kind.as_str())
        .ok_or_else(|| PropertyError::missing_key(name, kind, kind.as_str()))
}

/// Deserializes a sub-key value into a typed structure.
pub(crate) fn decode<T: DeserializeOwned>(name: &str, kind: PropertyKind, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| PropertyError::malformed(name, kind, e.to_string()))
}

/// Serializes a plain data structure.
///
/// The structures passed here only have string keys, so conversion cannot fail.
pub(crate) fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Reads the optional `id` field.
pub(crate) fn id_of(params: &Params) -> Option<String> {
    params.get("id").and_then(Value::as_str).map(str::to_owned)
}

/// Builds `{type: <kind>, <kind>: value}` plus `id` when set.
pub(crate) fn envelope(kind: PropertyKind, value: Value, id: Option<&str>) -> Params {
    let mut wire = Map::new();
    if let Some(id) = id {
        wire.insert("id".to_owned(), Value::String(id.to_owned()));
    }
    wire.insert("type".to_owned(), Value::String(kind.as_str().to_owned()));
    wire.insert(kind.as_str().to_owned(), value);
    wire
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Wire samples for every kind the `properties` map can carry.
    fn samples() -> Vec<(&'static str, Value)> {
        vec![
            (
                "Name",
                json!({"id": "title", "type": "title", "title": [
                    {"type": "text", "text": {"content": "Alice", "link": null},
                     "annotations": {"bold": false}, "plain_text": "Alice", "href": null}
                ]}),
            ),
            (
                "Memo",
                json!({"id": "m%3Ae", "type": "rich_text", "rich_text": [
                    {"type": "text", "text": {"content": "hi"}, "plain_text": "hi"}
                ]}),
            ),
            ("Points", json!({"id": "p", "type": "number", "number": 3})),
            ("Ratio", json!({"type": "number", "number": 0.5})),
            ("Empty", json!({"type": "number", "number": null})),
            ("Done", json!({"id": "c", "type": "checkbox", "checkbox": true})),
            (
                "Kind",
                json!({"type": "select", "select": {"id": "x", "name": "Bug", "color": "red"}}),
            ),
            ("Unset", json!({"type": "select", "select": null})),
            (
                "Tags",
                json!({"type": "multi_select", "multi_select": [{"name": "a"}, {"name": "b", "color": "blue"}]}),
            ),
            ("State", json!({"type": "status", "status": {"name": "Done"}})),
            (
                "Due",
                json!({"type": "date", "date": {"start": "2024-01-01", "end": null, "time_zone": null}}),
            ),
            (
                "Meeting",
                json!({"type": "date", "date": {"start": "2024-01-01T09:00:00+09:00", "end": "2024-01-01T10:30:00+09:00", "time_zone": null}}),
            ),
            ("Deadline", json!({"type": "date", "date": {"start": "2024-01-01"}})),
            ("NoDate", json!({"type": "date", "date": null})),
            ("Link", json!({"type": "url", "url": "https://example.com"})),
            ("Mail", json!({"type": "email", "email": null})),
            (
                "Parent",
                json!({"type": "relation", "relation": [{"id": "abc"}, {"id": "def"}], "has_more": false}),
            ),
            (
                "Total",
                json!({"type": "rollup", "rollup": {"type": "number", "number": 42, "function": "sum"}}),
            ),
            (
                "Owners",
                json!({"type": "people", "people": [{"object": "user", "id": "u1", "name": "Ann"}]}),
            ),
            ("Created", json!({"type": "created_time", "created_time": "2024-01-01T09:00:00+09:00"})),
            ("Edited", json!({"type": "last_edited_time", "last_edited_time": "2024-05-01T12:00:00+09:00"})),
            ("Author", json!({"type": "created_by", "created_by": {"object": "user", "id": "u1"}})),
            ("Editor", json!({"type": "last_edited_by", "last_edited_by": {"object": "user", "id": "u2"}})),
            ("Run", json!({"id": "b", "type": "button", "button": {}})),
        ]
    }

    #[test]
    fn every_kind_round_trips_through_the_wire() {
        for (name, wire) in samples() {
            let property = Property::from_wire(name, &wire).unwrap();
            assert_eq!(property.name(), name);
            assert_eq!(property.kind().as_str(), wire["type"].as_str().unwrap());
            assert_eq!(property.to_wire(), wire, "serialize(parse(wire)) for {name}");

            let reparsed = Property::from_wire(name, &property.to_wire()).unwrap();
            assert_eq!(reparsed, property, "parse(serialize(p)) for {name}");
        }
    }

    #[test]
    fn id_is_carried_only_when_present() {
        let with_id = Property::from_wire("Done", &json!({"id": "c", "type": "checkbox", "checkbox": true})).unwrap();
        assert_eq!(with_id.id(), Some("c"));

        let without = Property::from_wire("Done", &json!({"type": "checkbox", "checkbox": false})).unwrap();
        assert_eq!(without.id(), None);
        assert!(without.to_wire().get("id").is_none());
    }

    #[test]
    fn missing_sub_key_is_malformed() {
        let err = Property::from_wire("Due", &json!({"type": "date"})).unwrap_err();
        assert!(matches!(err, PropertyError::MissingKey { kind: PropertyKind::Date, .. }));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = Property::from_wire("Done", &json!({"type": "checkbox", "checkbox": "yes"})).unwrap_err();
        assert!(matches!(err, PropertyError::Malformed { kind: PropertyKind::Checkbox, .. }));
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let err = Property::from_wire("F", &json!({"type": "formula", "formula": {}})).unwrap_err();
        assert!(matches!(err, PropertyError::UnknownType { ref tag, .. } if tag == "formula"));

        let err = Property::from_wire("C", &json!({"type": "cover", "cover": {}})).unwrap_err();
        assert!(matches!(err, PropertyError::UnknownType { .. }));
    }

    #[test]
    fn missing_discriminator_is_rejected() {
        let err = Property::from_wire("X", &json!({"checkbox": true})).unwrap_err();
        assert!(matches!(err, PropertyError::MissingType { .. }));
        assert!(Property::from_wire("X", &json!("text")).unwrap_err().is_malformed_wire());
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in PropertyKind::ALL {
            assert_eq!(kind.as_str().parse::<PropertyKind>().unwrap(), *kind);
        }
        assert!("formula".parse::<PropertyKind>().is_err());
        assert_eq!(serde_json::to_value(PropertyKind::Text).unwrap(), json!("rich_text"));
    }

    #[test]
    fn read_only_kinds() {
        assert!(PropertyKind::CreatedTime.is_read_only());
        assert!(PropertyKind::Button.is_read_only());
        assert!(!PropertyKind::Title.is_read_only());
        assert!(PropertyKind::Icon.is_page_attribute());
    }

    #[test]
    fn filter_values_follow_the_kind() {
        let title = Property::from(Title::from_plain_text("Name", "Alice"));
        assert_eq!(title.value_for_filter(), Some(json!("Alice")));

        let done = Property::from(Checkbox::new("Done", true));
        assert_eq!(done.value_for_filter(), Some(json!(true)));

        let unset = Property::from(Select::new("Kind", None));
        assert_eq!(unset.value_for_filter(), None);

        let created = Property::from_wire(
            "Created",
            &json!({"type": "created_time", "created_time": "2024-01-01T00:00:00.000Z"}),
        )
        .unwrap();
        assert_eq!(created.value_for_filter(), Some(json!("2024-01-01T09:00:00+09:00")));
    }
}
