//! Cross-page properties: Relation and Rollup.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, envelope, id_of, sub_key};
use crate::error::{PropertyError, Result};

#[derive(Deserialize)]
struct RelationRef {
    id: String,
}

/// Links to other pages, by page id.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub name: String,
    pub id: Option<String>,
    pub ids: Vec<String>,
    /// Set by the store when the relation was truncated.
    pub has_more: Option<bool>,
}

impl Relation {
    pub fn new(name: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            ids,
            has_more: None,
        }
    }

    pub fn contains(&self, page_id: &str) -> bool {
        self.ids.iter().any(|id| id == page_id)
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::Relation;
        let refs: Vec<RelationRef> = decode(name, kind, sub_key(name, kind, params)?)?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            ids: refs.into_iter().map(|r| r.id).collect(),
            has_more: params.get("has_more").and_then(Value::as_bool),
        })
    }

    pub fn to_wire(&self) -> Value {
        let refs = self
            .ids
            .iter()
            .map(|id| {
                let mut r = Map::new();
                r.insert("id".to_owned(), Value::String(id.clone()));
                Value::Object(r)
            })
            .collect();
        let mut wire = envelope(PropertyKind::Relation, Value::Array(refs), self.id.as_deref());
        if let Some(has_more) = self.has_more {
            wire.insert("has_more".to_owned(), Value::Bool(has_more));
        }
        Value::Object(wire)
    }
}

/// A value aggregated by the store from related pages. Read-only.
///
/// The payload sits under the key named by `rollup_type` (`number`, `date`,
/// `array`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub name: String,
    pub id: Option<String>,
    pub rollup_type: String,
    pub function: Option<String>,
    pub payload: Value,
}

impl Rollup {
    pub fn number(&self) -> Option<f64> {
        match self.rollup_type.as_str() {
            "number" => self.payload.as_f64(),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&Vec<Value>> {
        match self.rollup_type.as_str() {
            "array" => self.payload.as_array(),
            _ => None,
        }
    }

    pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
        let kind = PropertyKind::Rollup;
        let rollup = sub_key(name, kind, params)?
            .as_object()
            .ok_or_else(|| PropertyError::malformed(name, kind, "expected an object"))?;
        let rollup_type = rollup
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| PropertyError::malformed(name, kind, "missing rollup type"))?;
        Ok(Self {
            name: name.to_owned(),
            id: id_of(params),
            rollup_type: rollup_type.to_owned(),
            function: rollup.get("function").and_then(Value::as_str).map(str::to_owned),
            payload: rollup.get(rollup_type).cloned().unwrap_or(Value::Null),
        })
    }

    pub fn to_wire(&self) -> Value {
        let mut rollup = Map::new();
        rollup.insert("type".to_owned(), Value::String(self.rollup_type.clone()));
        rollup.insert(self.rollup_type.clone(), self.payload.clone());
        if let Some(function) = &self.function {
            rollup.insert("function".to_owned(), Value::String(function.clone()));
        }
        Value::Object(envelope(PropertyKind::Rollup, Value::Object(rollup), self.id.as_deref()))
    }
}
