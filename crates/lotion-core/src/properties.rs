//! The unique-by-name collection of a page's properties.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{PropertyError, Result};
use crate::property::{Property, PropertyKind, Title, TypedProperty};
use crate::time::StoreOffset;

/// An ordered set of properties keyed by name.
///
/// Immutable: every update returns a new collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: Vec<Property>,
}

impl Properties {
    /// Builds a collection, rejecting duplicate names.
    pub fn new(values: Vec<Property>) -> Result<Self> {
        let mut seen = HashSet::new();
        for value in &values {
            if !seen.insert(value.name()) {
                return Err(PropertyError::DuplicateName(value.name().to_owned()));
            }
        }
        Ok(Self { values })
    }

    /// Builds a collection from possibly-missing entries.
    ///
    /// Holes are skipped with a warning. Upstream data has been seen to
    /// contain them; this is a tolerance, not a guarantee.
    pub fn from_slots<I>(slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<Property>>,
    {
        let values = slots
            .into_iter()
            .enumerate()
            .filter_map(|(position, slot)| {
                if slot.is_none() {
                    warn!(position, "skipping missing property slot");
                }
                slot
            })
            .collect();
        Self::new(values)
    }

    /// Parses a wire `properties` map using the default [`StoreOffset`].
    pub fn from_wire(wire: &Value) -> Result<Self> {
        Self::from_wire_in(wire, StoreOffset::default())
    }

    /// Parses a wire `properties` map, normalizing timestamps into `offset`.
    ///
    /// `null` entries are skipped the same way as in [`from_slots`](Self::from_slots).
    pub fn from_wire_in(wire: &Value, offset: StoreOffset) -> Result<Self> {
        let map = wire
            .as_object()
            .ok_or_else(|| PropertyError::not_an_object("properties", wire))?;
        let mut values = Vec::with_capacity(map.len());
        for (name, params) in map {
            if params.is_null() {
                warn!(name = name.as_str(), "skipping null property");
                continue;
            }
            values.push(Property::from_wire_in(name, params, offset)?);
        }
        debug!(count = values.len(), "parsed properties");
        // Object keys are already unique.
        Ok(Self { values })
    }

    /// Serializes to a wire `properties` map keyed by name.
    pub fn to_wire(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|p| (p.name().to_owned(), p.to_wire()))
            .collect();
        Value::Object(map)
    }

    /// Returns a copy with `prop` replacing the member of the same name, or
    /// appended when no member has that name.
    pub fn append_property(&self, prop: impl Into<Property>) -> Self {
        let prop = prop.into();
        let mut values = Vec::with_capacity(self.values.len() + 1);
        let mut replaced = false;
        for existing in &self.values {
            if existing.name() == prop.name() {
                values.push(prop.clone());
                replaced = true;
            } else {
                values.push(existing.clone());
            }
        }
        if !replaced {
            values.push(prop);
        }
        Self { values }
    }

    /// The Title member.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::TitleNotFound`] if there is none.
    pub fn get_title(&self) -> Result<&Title> {
        self.values
            .iter()
            .find_map(|p| match p {
                Property::Title(title) => Some(title),
                _ => None,
            })
            .ok_or(PropertyError::TitleNotFound)
    }

    /// First member matching both `name` and `kind`.
    pub fn get_property(&self, name: &str, kind: PropertyKind) -> Option<&Property> {
        self.values
            .iter()
            .find(|p| p.kind() == kind && p.name() == name)
    }

    /// Typed variant of [`get_property`](Self::get_property).
    ///
    /// ```
    /// use lotion_core::Properties;
    /// use lotion_core::property::{Checkbox, Title};
    ///
    /// let props = Properties::new(vec![
    ///     Title::from_plain_text("Name", "Alice").into(),
    ///     Checkbox::new("Done", true).into(),
    /// ])
    /// .unwrap();
    /// assert!(props.get::<Checkbox>("Done").unwrap().checked);
    /// assert!(props.get::<Title>("Done").is_none());
    /// ```
    pub fn get<T: TypedProperty>(&self, name: &str) -> Option<&T> {
        self.get_property(name, T::KIND).and_then(T::from_property)
    }

    /// Like [`get`](Self::get) but absence is an error.
    pub fn require<T: TypedProperty>(&self, name: &str) -> Result<&T> {
        self.get::<T>(name).ok_or_else(|| PropertyError::NotFound {
            kind: T::KIND,
            name: name.to_owned(),
        })
    }

    /// A copy without Button members, which the store rejects on update.
    pub fn exclude_button(&self) -> Self {
        self.filtered(|p| p.kind() != PropertyKind::Button)
    }

    /// A copy without any read-only member (buttons, timestamps, authors,
    /// rollups), i.e. what an update request may carry.
    pub fn submittable(&self) -> Self {
        self.filtered(|p| !p.kind().is_read_only())
    }

    fn filtered(&self, keep: impl Fn(&Property) -> bool) -> Self {
        Self {
            values: self.values.iter().filter(|p| keep(*p)).cloned().collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.values.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(Property::name).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = Value::deserialize(deserializer)?;
        Self::from_wire(&wire).map_err(serde::de::Error::custom)
    }
}
