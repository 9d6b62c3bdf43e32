//! Enumerated properties: Select, Status and MultiSelect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, encode, envelope, id_of, sub_key};
use crate::error::Result;

/// One option of a select-like property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SelectOption {
    /// An option identified by name only, as accepted on update.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
            extra: Map::new(),
        }
    }
}

macro_rules! single_option_property {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
            /// `None` when nothing is selected.
            pub option: Option<SelectOption>,
        }

        impl $name {
            pub fn new(name: impl Into<String>, option: Option<SelectOption>) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                    option,
                }
            }

            /// Selects an option by name.
            pub fn of_name(name: impl Into<String>, option_name: impl Into<String>) -> Self {
                Self::new(name, Some(SelectOption::named(option_name)))
            }

            /// Name of the selected option.
            pub fn selected_name(&self) -> Option<&str> {
                self.option.as_ref().map(|o| o.name.as_str())
            }

            pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
                let value = sub_key(name, $kind, params)?;
                Ok(Self {
                    name: name.to_owned(),
                    id: id_of(params),
                    option: decode(name, $kind, value)?,
                })
            }

            pub fn to_wire(&self) -> Value {
                Value::Object(envelope($kind, encode(&self.option), self.id.as_deref()))
            }
        }
    };
}

single_option_property! {
    /// A single-choice tag.
    Select, PropertyKind::Select
}

single_option_property! {
    /// A workflow status (grouped options such as "Not started", "Done").
    Status, PropertyKind::Status
}

/// A set of tags.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelect {
    pub name: String,
    pub id: Option<String>,
    pub options: Vec<SelectOption>,
}

impl MultiSelect {
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            name: name.into(),
            id: None,
            options,
        }
    }

    /// Builds the property from option names.
    pub fn of_names<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, names.into_iter().map(SelectOption::named).collect())
    }

    /// Names of the selected options, in wire order.
    pub fn names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn contains(&self, option_name: &str) -> bool {
        self.options.iter().any(|o| o.name == option_name)
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::MultiSelect;
        let value = sub_key(name, kind, params)?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            options: decode(name, kind, value)?,
        })
    }

    pub fn to_wire(&self) -> Value {
        Value::Object(envelope(
            PropertyKind::MultiSelect,
            encode(&self.options),
            self.id.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn status_reads_the_option_name() {
        let wire = json!({"id": "s", "type": "status", "status": {"id": "1", "name": "Done", "color": "green"}});
        let Property::Status(status) = Property::from_wire("State", &wire).unwrap() else {
            panic!("expected a status");
        };
        assert_eq!(status.selected_name(), Some("Done"));
        assert_eq!(status.option.as_ref().unwrap().color.as_deref(), Some("green"));
    }

    #[test]
    fn null_select_is_unselected() {
        let wire = json!({"type": "select", "select": null});
        let Property::Select(select) = Property::from_wire("Kind", &wire).unwrap() else {
            panic!("expected a select");
        };
        assert_eq!(select.selected_name(), None);
    }

    #[test]
    fn of_name_serializes_a_bare_option() {
        assert_eq!(
            Select::of_name("Kind", "Bug").to_wire(),
            json!({"type": "select", "select": {"name": "Bug"}})
        );
    }

    #[test]
    fn multi_select_keeps_wire_order() {
        let tags = MultiSelect::of_names("Tags", ["b", "a"]);
        assert_eq!(tags.names(), vec!["b", "a"]);
        assert!(tags.contains("a"));
        assert!(!tags.contains("c"));
        assert_eq!(
            tags.to_wire(),
            json!({"type": "multi_select", "multi_select": [{"name": "b"}, {"name": "a"}]})
        );
    }

    #[test]
    fn option_without_name_is_malformed() {
        let wire = json!({"type": "multi_select", "multi_select": [{"color": "red"}]});
        assert!(Property::from_wire("Tags", &wire).unwrap_err().is_malformed_wire());
    }
}
