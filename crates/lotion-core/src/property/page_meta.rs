//! Page-level attributes: Cover, Icon and Parent.
//!
//! These sit beside `properties` on a page object rather than inside it, and
//! their `type` tag names the source (`external`, `emoji`, `database_id`, ...)
//! instead of the attribute itself. They are carried as [`Property`]
//! variants so pages can treat them uniformly, but only
//! [`BasePage`](crate::BasePage) parses them.
//!
//! [`Property`]: super::Property

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PropertyKind, decode, encode};
use crate::error::Result;

/// A hosted or uploaded file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

impl FileLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expiry_time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverSource {
    External { external: FileLink },
    File { file: FileLink },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IconSource {
    Emoji { emoji: String },
    External { external: FileLink },
    File { file: FileLink },
    CustomEmoji { custom_emoji: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParentRef {
    DatabaseId {
        database_id: String,
    },
    DataSourceId {
        data_source_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database_id: Option<String>,
    },
    PageId {
        page_id: String,
    },
    BlockId {
        block_id: String,
    },
    Workspace {
        workspace: bool,
    },
}

macro_rules! page_attribute {
    ($(#[$meta:meta])* $name:ident, $field:ident: $source:ty, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            /// Always the page-level key unless a caller renames it.
            pub name: String,
            pub id: Option<String>,
            pub $field: $source,
        }

        impl $name {
            pub fn new($field: $source) -> Self {
                Self {
                    name: $kind.as_str().to_owned(),
                    id: None,
                    $field,
                }
            }

            /// Parses the page-level object (`page.<key>`).
            pub fn from_wire(value: &Value) -> Result<Self> {
                Ok(Self::new(decode($kind.as_str(), $kind, value)?))
            }

            pub fn to_wire(&self) -> Value {
                encode(&self.$field)
            }
        }
    };
}

page_attribute! {
    /// The page's cover image.
    Cover, source: CoverSource, PropertyKind::Cover
}

page_attribute! {
    /// The page's icon.
    Icon, source: IconSource, PropertyKind::Icon
}

page_attribute! {
    /// Where the page lives.
    Parent, target: ParentRef, PropertyKind::Parent
}

impl Cover {
    pub fn external(url: impl Into<String>) -> Self {
        Self::new(CoverSource::External {
            external: FileLink::new(url),
        })
    }

    pub fn url(&self) -> &str {
        match &self.source {
            CoverSource::External { external: link } | CoverSource::File { file: link } => &link.url,
        }
    }
}

impl Icon {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self::new(IconSource::Emoji {
            emoji: emoji.into(),
        })
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self::new(IconSource::External {
            external: FileLink::new(url),
        })
    }
}

impl Parent {
    pub fn database(database_id: impl Into<String>) -> Self {
        Self::new(ParentRef::DatabaseId {
            database_id: database_id.into(),
        })
    }

    pub fn page(page_id: impl Into<String>) -> Self {
        Self::new(ParentRef::PageId {
            page_id: page_id.into(),
        })
    }

    /// The parent database id, also for data-source parents that report one.
    pub fn database_id(&self) -> Option<&str> {
        match &self.target {
            ParentRef::DatabaseId { database_id } => Some(database_id.as_str()),
            ParentRef::DataSourceId { database_id, .. } => database_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cover_round_trip() {
        let wire = json!({"type": "external", "external": {"url": "https://example.com/c.png"}});
        let cover = Cover::from_wire(&wire).unwrap();
        assert_eq!(cover.name, "cover");
        assert_eq!(cover.url(), "https://example.com/c.png");
        assert_eq!(cover.to_wire(), wire);
        assert_eq!(Cover::external("https://example.com/c.png"), cover);
    }

    #[test]
    fn uploaded_cover_keeps_expiry() {
        let wire = json!({"type": "file", "file": {"url": "https://files/c.png", "expiry_time": "2024-01-01T00:00:00.000Z"}});
        assert_eq!(Cover::from_wire(&wire).unwrap().to_wire(), wire);
    }

    #[test]
    fn icon_variants() {
        let emoji = Icon::from_wire(&json!({"type": "emoji", "emoji": "🎉"})).unwrap();
        assert_eq!(emoji, Icon::emoji("🎉"));
        assert_eq!(
            Icon::external("https://example.com/i.png").to_wire(),
            json!({"type": "external", "external": {"url": "https://example.com/i.png"}})
        );
    }

    #[test]
    fn parent_database_id() {
        let parent = Parent::from_wire(&json!({"type": "database_id", "database_id": "db1"})).unwrap();
        assert_eq!(parent.database_id(), Some("db1"));
        assert_eq!(Parent::page("p1").database_id(), None);
        assert_eq!(Parent::page("p1").to_wire(), json!({"type": "page_id", "page_id": "p1"}));
    }

    #[test]
    fn unknown_source_is_malformed() {
        assert!(Icon::from_wire(&json!({"type": "hologram"})).unwrap_err().is_malformed_wire());
    }
}
