//! Rich-text properties: Title and Text (`rich_text`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Params, PropertyKind, decode, encode, envelope, id_of, sub_key};
use crate::error::Result;

/// The `text` payload of a rich-text segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,

    /// `link` and anything else the store sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One segment of a rich-text array.
///
/// Only the fields this crate reads are typed; annotations, mentions and the
/// like are kept verbatim in `extra` so that round trips are lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextSegment {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichTextSegment {
    /// A plain `text` segment with no annotations.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            segment_type: Some("text".to_owned()),
            text: Some(TextContent {
                content: content.into(),
                extra: Map::new(),
            }),
            plain_text: None,
            extra: Map::new(),
        }
    }

    /// The segment's visible text: `plain_text`, else `text.content`.
    pub fn as_str(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or_default()
    }
}

/// An ordered list of rich-text segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<RichTextSegment>);

impl RichText {
    /// A single plain segment, or no segments for an empty string.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self(vec![RichTextSegment::plain(text)])
    }

    /// Concatenated visible text of all segments.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(RichTextSegment::as_str).collect()
    }

    pub fn segments(&self) -> &[RichTextSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

macro_rules! rich_text_property {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
            pub rich_text: RichText,
        }

        impl $name {
            pub fn new(name: impl Into<String>, rich_text: RichText) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                    rich_text,
                }
            }

            /// Builds the property from plain text.
            pub fn from_plain_text(name: impl Into<String>, text: impl Into<String>) -> Self {
                Self::new(name, RichText::from_plain_text(text))
            }

            /// Concatenated visible text.
            pub fn text(&self) -> String {
                self.rich_text.plain_text()
            }

            pub(crate) fn parse(name: &str, params: &Params) -> Result<Self> {
                let value = sub_key(name, $kind, params)?;
                Ok(Self {
                    name: name.to_owned(),
                    id: id_of(params),
                    rich_text: decode(name, $kind, value)?,
                })
            }

            pub fn to_wire(&self) -> Value {
                Value::Object(envelope($kind, encode(&self.rich_text), self.id.as_deref()))
            }
        }
    };
}

rich_text_property! {
    /// The page title. Every valid page has exactly one.
    Title, PropertyKind::Title
}

rich_text_property! {
    /// A free-text property (`rich_text` on the wire).
    Text, PropertyKind::Text
}
