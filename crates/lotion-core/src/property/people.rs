//! User-valued properties: People, CreatedBy and LastEditedBy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, encode, envelope, id_of, sub_key};
use crate::error::Result;

/// A user reference as the store sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `avatar_url`, `person`, `bot` and the rest.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// A bare `{object: "user", id}` reference, as accepted on update.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            object: Some("user".to_owned()),
            id: id.into(),
            name: None,
            extra: Map::new(),
        }
    }

    /// The email of a person user, if the store disclosed it.
    pub fn email(&self) -> Option<&str> {
        self.extra
            .get("person")
            .and_then(|p| p.get("email"))
            .and_then(Value::as_str)
    }
}

/// A list of users.
#[derive(Debug, Clone, PartialEq)]
pub struct People {
    pub name: String,
    pub id: Option<String>,
    pub people: Vec<User>,
}

impl People {
    pub fn new(name: impl Into<String>, people: Vec<User>) -> Self {
        Self {
            name: name.into(),
            id: None,
            people,
        }
    }

    pub fn user_ids(&self) -> Vec<&str> {
        self.people.iter().map(|u| u.id.as_str()).collect()
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::People;
        let value = sub_key(name, kind, params)?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            people: decode(name, kind, value)?,
        })
    }

    pub fn to_wire(&self) -> Value {
        Value::Object(envelope(
            PropertyKind::People,
            encode(&self.people),
            self.id.as_deref(),
        ))
    }
}

macro_rules! single_user_property {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
            pub user: User,
        }

        impl $name {
            pub fn new(name: impl Into<String>, user: User) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                    user,
                }
            }

            pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
                let value = sub_key(name, $kind, params)?;
                Ok(Self {
                    name: name.to_owned(),
                    id: id_of(params),
                    user: decode(name, $kind, value)?,
                })
            }

            pub fn to_wire(&self) -> Value {
                Value::Object(envelope($kind, encode(&self.user), self.id.as_deref()))
            }
        }
    };
}

single_user_property! {
    /// Who created the page. Read-only in the store.
    CreatedBy, PropertyKind::CreatedBy
}

single_user_property! {
    /// Who last edited the page. Read-only in the store.
    LastEditedBy, PropertyKind::LastEditedBy
}
