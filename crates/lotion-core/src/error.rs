//! Error types for wire parsing and property lookup.

use crate::property::PropertyKind;

/// A wire tag that is not part of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {tag:?}")]
pub struct UnknownTag {
    /// What kind of tag was expected (e.g. "property kind").
    pub what: &'static str,
    /// The tag that was received.
    pub tag: String,
}

/// Errors raised while converting wire JSON or looking up properties.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// A value that should be a JSON object was something else.
    #[error("{context} must be a JSON object, got {found}")]
    NotAnObject {
        /// What was being parsed.
        context: String,
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// The wire object has no `type` discriminator.
    #[error("property {name:?} has no type discriminator")]
    MissingType {
        /// The property name.
        name: String,
    },

    /// The `type` discriminator matches no known property kind.
    #[error("property {name:?} has unknown type {tag:?}")]
    UnknownType {
        /// The property name.
        name: String,
        /// The discriminator that was received.
        tag: String,
    },

    /// The wire object lacks the kind's expected sub-key.
    #[error("{kind} property {name:?} is missing key {key:?}")]
    MissingKey {
        /// The property name.
        name: String,
        /// The kind being parsed.
        kind: PropertyKind,
        /// The absent key.
        key: String,
    },

    /// The sub-key is present but has the wrong shape.
    #[error("{kind} property {name:?} is malformed: {reason}")]
    Malformed {
        /// The property name.
        name: String,
        /// The kind being parsed.
        kind: PropertyKind,
        /// What was wrong with it.
        reason: String,
    },

    /// A timestamp or date could not be parsed as ISO-8601.
    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp {
        /// The text that failed to parse.
        value: String,
        /// The underlying chrono error.
        #[source]
        source: chrono::ParseError,
    },

    /// Two members of one collection share a name.
    #[error("duplicate property name: {0:?}")]
    DuplicateName(String),

    /// The collection has no Title member.
    #[error("title property not found")]
    TitleNotFound,

    /// No member matches the requested name and kind.
    #[error("{kind} property not found: {name:?}")]
    NotFound {
        /// The requested kind.
        kind: PropertyKind,
        /// The requested name.
        name: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PropertyError>;

impl PropertyError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`PropertyError::NotAnObject`] describing `value`.
    pub fn not_an_object(context: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            context: context.into(),
            found: json_type_name(value),
        }
    }

    /// Creates a [`PropertyError::MissingKey`].
    pub fn missing_key(name: impl Into<String>, kind: PropertyKind, key: impl Into<String>) -> Self {
        Self::MissingKey {
            name: name.into(),
            kind,
            key: key.into(),
        }
    }

    /// Creates a [`PropertyError::Malformed`].
    pub fn malformed(name: impl Into<String>, kind: PropertyKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            name: name.into(),
            kind,
            reason: reason.into(),
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` for lookup failures ([`TitleNotFound`](Self::TitleNotFound)
    /// and [`NotFound`](Self::NotFound)).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TitleNotFound | Self::NotFound { .. })
    }

    /// Returns `true` if the error was caused by malformed wire JSON.
    pub fn is_malformed_wire(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject { .. }
                | Self::MissingType { .. }
                | Self::UnknownType { .. }
                | Self::MissingKey { .. }
                | Self::Malformed { .. }
                | Self::InvalidTimestamp { .. }
        )
    }
}

/// Names the JSON type of `value` for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
