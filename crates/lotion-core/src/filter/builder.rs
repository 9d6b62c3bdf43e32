//! Immutable accumulator of validated filter clauses.

use serde_json::{Map, Value};
use tracing::debug;

use super::{Cond, ConditionRuleset, Prop, ValidationError};
use crate::property::{Property, PropertyKind};

/// Errors raised while adding clauses or building the filter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// The clause failed the ruleset; the builder is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `build` was called before any clause was added.
    #[error("filter is empty")]
    Empty,

    /// The property's kind cannot appear in a filter.
    #[error("{0} properties cannot be filtered on")]
    UnfilterableKind(PropertyKind),

    /// The property holds no value to compare against.
    #[error("property {0:?} has no value to filter on")]
    NoFilterValue(String),
}

/// Builds a store query filter.
///
/// ```
/// use lotion_core::filter::{Builder, Cond, Prop};
/// use serde_json::json;
///
/// let filter = Builder::create()
///     .add(Prop::Title, "Name", Cond::Equals, "Alice")
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(filter, json!({"property": "Name", "title": {"equals": "Alice"}}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Builder {
    conditions: Vec<Value>,
}

impl Builder {
    /// An empty builder.
    pub fn create() -> Self {
        Self::default()
    }

    /// Returns a new builder with one more clause.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Validation`] if the ruleset rejects the clause.
    pub fn add(
        &self,
        prop: Prop,
        prop_name: &str,
        cond: Cond,
        value: impl Into<Value>,
    ) -> Result<Self, FilterError> {
        let value = ConditionRuleset::normalize(prop, cond, value.into())?;
        debug!(property = prop_name, %prop, %cond, "adding filter clause");

        let mut condition = Map::new();
        condition.insert(cond.as_str().to_owned(), value);
        let mut clause = Map::new();
        clause.insert("property".to_owned(), Value::String(prop_name.to_owned()));
        clause.insert(prop.as_str().to_owned(), Value::Object(condition));

        let mut conditions = self.conditions.clone();
        conditions.push(Value::Object(clause));
        Ok(Self { conditions })
    }

    /// Adds a clause comparing against an existing property's current value.
    pub fn add_property(&self, property: &Property, cond: Cond) -> Result<Self, FilterError> {
        let prop = Prop::for_kind(property.kind())
            .ok_or(FilterError::UnfilterableKind(property.kind()))?;
        let value = property
            .value_for_filter()
            .ok_or_else(|| FilterError::NoFilterValue(property.name().to_owned()))?;
        self.add(prop, property.name(), cond, value)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// The clauses added so far, in order.
    pub fn clauses(&self) -> &[Value] {
        &self.conditions
    }

    /// Produces the filter: the lone clause itself, or `{and: [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Empty`] when no clause was added, so that an
    /// unfiltered query is never issued by accident.
    pub fn build(&self) -> Result<Value, FilterError> {
        match self.conditions.as_slice() {
            [] => Err(FilterError::Empty),
            [single] => Ok(single.clone()),
            many => {
                let mut filter = Map::new();
                filter.insert("and".to_owned(), Value::Array(many.to_vec()));
                Ok(Value::Object(filter))
            }
        }
    }
}
