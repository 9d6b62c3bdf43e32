//! Scalar properties: Number, Checkbox, Url, Email, and the valueless Button.

use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, envelope, id_of, sub_key};
use crate::error::{PropertyError, Result};

/// A numeric property. The exact JSON number is kept, so integers stay
/// integers on the way back out.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub name: String,
    pub id: Option<String>,
    pub number: Option<serde_json::Number>,
}

impl Number {
    pub fn new(name: impl Into<String>, number: Option<serde_json::Number>) -> Self {
        Self {
            name: name.into(),
            id: None,
            number,
        }
    }

    pub fn from_i64(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Some(value.into()))
    }

    /// Returns `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(name: impl Into<String>, value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(|n| Self::new(name, Some(n)))
    }

    /// The value as a float.
    pub fn value(&self) -> Option<f64> {
        self.number.as_ref().and_then(serde_json::Number::as_f64)
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::Number;
        let value = sub_key(name, kind, params)?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            number: decode(name, kind, value)?,
        })
    }

    pub fn to_wire(&self) -> Value {
        let value = self.number.clone().map_or(Value::Null, Value::Number);
        Value::Object(envelope(PropertyKind::Number, value, self.id.as_deref()))
    }
}

/// A boolean property.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkbox {
    pub name: String,
    pub id: Option<String>,
    pub checked: bool,
}

impl Checkbox {
    pub fn new(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            id: None,
            checked,
        }
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::Checkbox;
        let value = sub_key(name, kind, params)?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            checked: decode(name, kind, value)?,
        })
    }

    pub fn to_wire(&self) -> Value {
        Value::Object(envelope(
            PropertyKind::Checkbox,
            Value::Bool(self.checked),
            self.id.as_deref(),
        ))
    }
}

macro_rules! optional_string_property {
    ($(#[$meta:meta])* $name:ident, $field:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
            pub $field: Option<String>,
        }

        impl $name {
            pub fn new(name: impl Into<String>, $field: Option<String>) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                    $field,
                }
            }

            pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
                let value = sub_key(name, $kind, params)?;
                Ok(Self {
                    name: name.to_owned(),
                    id: id_of(params),
                    $field: decode(name, $kind, value)?,
                })
            }

            pub fn to_wire(&self) -> Value {
                let value = self.$field.clone().map_or(Value::Null, Value::String);
                Value::Object(envelope($kind, value, self.id.as_deref()))
            }
        }
    };
}

optional_string_property! {
    /// A URL property; `None` when blank.
    Url, url, PropertyKind::Url
}

optional_string_property! {
    /// An email property; `None` when blank.
    Email, email, PropertyKind::Email
}

/// A button. It has no value, and the store rejects it on update.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub name: String,
    pub id: Option<String>,
}

impl Button {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::Button;
        if !sub_key(name, kind, params)?.is_object() {
            return Err(PropertyError::malformed(name, kind, "expected an object"));
        }
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
        })
    }

    pub fn to_wire(&self) -> Value {
        Value::Object(envelope(
            PropertyKind::Button,
            Value::Object(Map::new()),
            self.id.as_deref(),
        ))
    }
}
