//! The page aggregate: identity, timestamps and a [`Properties`] collection.
//!
//! Property access is delegated to [`Properties`]; this type adds the
//! page-level fields and "not created yet" checks.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::error::{PropertyError, json_type_name};
use crate::properties::Properties;
use crate::property::{
    Checkbox, Cover, Date, Icon, MultiSelect, Number, Parent, Property, PropertyKind, Relation,
    Select, Status, Text, Title, TypedProperty, Url, User,
};
use crate::time::{StoreOffset, parse_timestamp};

/// Errors raised by page accessors.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// A store-assigned field was read on a page that was never persisted.
    #[error("{0} is not set: the page has not been created yet")]
    NotCreated(&'static str),

    /// A page-level field is present but has the wrong JSON type.
    #[error("page field {key:?} must be {expected}, got {found}")]
    MalformedField {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The id is not 32 hexadecimal digits.
    #[error("invalid page id: {0:?}")]
    InvalidPageId(String),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

pub type Result<T> = std::result::Result<T, PageError>;

/// A page id in canonical dashed form (8-4-4-4-12, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Accepts dashed or compact ids, in either case.
    pub fn parse(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| *c != '-').collect();
        if compact.len() != 32 || !compact.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PageError::InvalidPageId(text.to_owned()));
        }
        let compact = compact.to_ascii_lowercase();
        Ok(Self(format!(
            "{}-{}-{}-{}-{}",
            &compact[0..8],
            &compact[8..12],
            &compact[12..16],
            &compact[16..20],
            &compact[20..32]
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without dashes, as used in page URLs.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A page in the store, or one about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePage {
    pub properties: Properties,
    pub id: Option<PageId>,
    pub url: Option<String>,
    pub created_time: Option<DateTime<FixedOffset>>,
    pub last_edited_time: Option<DateTime<FixedOffset>>,
    pub created_by: Option<User>,
    pub last_edited_by: Option<User>,
    pub cover: Option<Cover>,
    pub icon: Option<Icon>,
    pub archived: bool,
    pub parent: Option<Parent>,
}

impl BasePage {
    /// A new, not-yet-persisted page.
    pub fn create(properties: Vec<Property>) -> Result<Self> {
        Ok(Self::from_properties(Properties::new(properties)?))
    }

    pub fn from_properties(properties: Properties) -> Self {
        Self {
            properties,
            id: None,
            url: None,
            created_time: None,
            last_edited_time: None,
            created_by: None,
            last_edited_by: None,
            cover: None,
            icon: None,
            archived: false,
            parent: None,
        }
    }

    /// Parses a wire page object using the default [`StoreOffset`].
    pub fn from_wire(page: &Value) -> Result<Self> {
        Self::from_wire_in(page, StoreOffset::default())
    }

    /// Parses a wire page object, normalizing timestamps into `offset`.
    pub fn from_wire_in(page: &Value, offset: StoreOffset) -> Result<Self> {
        let object = page
            .as_object()
            .ok_or_else(|| PropertyError::not_an_object("page", page))?;
        let present = |key: &str| object.get(key).filter(|v| !v.is_null());

        let properties = match present("properties") {
            Some(wire) => Properties::from_wire_in(wire, offset)?,
            None => Properties::default(),
        };
        let string = |key: &'static str| {
            present(key)
                .map(|v| v.as_str().ok_or_else(|| malformed_field(key, "a string", v)))
                .transpose()
        };
        let timestamp = |key: &'static str| {
            string(key).and_then(|text| {
                text.map(|text| parse_timestamp(text, offset))
                    .transpose()
                    .map_err(PageError::from)
            })
        };
        let user = |key: &'static str, kind: PropertyKind| {
            present(key)
                .map(|v| serde_json::from_value::<User>(v.clone()))
                .transpose()
                .map_err(|e| PageError::from(PropertyError::malformed(key, kind, e.to_string())))
        };
        let archived = match present("archived") {
            Some(v) => v
                .as_bool()
                .ok_or_else(|| malformed_field("archived", "a boolean", v))?,
            None => false,
        };

        Ok(Self {
            properties,
            id: string("id")?.map(PageId::parse).transpose()?,
            url: string("url")?.map(str::to_owned),
            created_time: timestamp("created_time")?,
            last_edited_time: timestamp("last_edited_time")?,
            created_by: user("created_by", PropertyKind::CreatedBy)?,
            last_edited_by: user("last_edited_by", PropertyKind::LastEditedBy)?,
            cover: present("cover").map(Cover::from_wire).transpose()?,
            icon: present("icon").map(Icon::from_wire).transpose()?,
            archived,
            parent: present("parent").map(Parent::from_wire).transpose()?,
        })
    }

    /// The body of a create request: parent, cover, icon and every
    /// submittable property except buttons.
    pub fn to_create_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(parent) = &self.parent {
            payload.insert("parent".to_owned(), parent.to_wire());
        }
        payload.insert(
            "properties".to_owned(),
            self.properties.exclude_button().to_wire(),
        );
        if let Some(cover) = &self.cover {
            payload.insert("cover".to_owned(), cover.to_wire());
        }
        if let Some(icon) = &self.icon {
            payload.insert("icon".to_owned(), icon.to_wire());
        }
        Value::Object(payload)
    }

    /// Returns a copy with `prop` set (replacing any property of that name).
    pub fn with_property(&self, prop: impl Into<Property>) -> Self {
        Self {
            properties: self.properties.append_property(prop),
            ..self.clone()
        }
    }

    /// Returns a copy that records the store-assigned id and url.
    pub fn with_id_and_url(self, id: PageId, url: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            url: Some(url.into()),
            ..self
        }
    }

    // -- Properties ----------------------------------------------------------

    pub fn get_title(&self) -> Result<&Title> {
        Ok(self.properties.get_title()?)
    }

    pub fn title(&self) -> Result<String> {
        Ok(self.get_title()?.text())
    }

    pub fn get_status(&self, name: &str) -> Result<&Status> {
        self.property(name)
    }

    pub fn get_text(&self, name: &str) -> Result<&Text> {
        self.property(name)
    }

    pub fn get_date(&self, name: &str) -> Result<&Date> {
        self.property(name)
    }

    pub fn get_select(&self, name: &str) -> Result<&Select> {
        self.property(name)
    }

    pub fn get_multi_select(&self, name: &str) -> Result<&MultiSelect> {
        self.property(name)
    }

    pub fn get_relation(&self, name: &str) -> Result<&Relation> {
        self.property(name)
    }

    pub fn get_checkbox(&self, name: &str) -> Result<&Checkbox> {
        self.property(name)
    }

    pub fn get_url(&self, name: &str) -> Result<&Url> {
        self.property(name)
    }

    pub fn get_number(&self, name: &str) -> Result<&Number> {
        self.property(name)
    }

    fn property<T: TypedProperty>(&self, name: &str) -> Result<&T> {
        Ok(self.properties.require::<T>(name)?)
    }

    // -- Store-assigned fields -----------------------------------------------

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    pub fn page_id(&self) -> Result<&PageId> {
        self.id.as_ref().ok_or(PageError::NotCreated("page id"))
    }

    pub fn created_at(&self) -> Result<DateTime<FixedOffset>> {
        self.created_time.ok_or(PageError::NotCreated("created_time"))
    }

    pub fn updated_at(&self) -> Result<DateTime<FixedOffset>> {
        self.last_edited_time
            .ok_or(PageError::NotCreated("last_edited_time"))
    }

    pub fn created_by(&self) -> Result<&User> {
        self.created_by.as_ref().ok_or(PageError::NotCreated("created_by"))
    }

    pub fn edited_by(&self) -> Result<&User> {
        self.last_edited_by
            .as_ref()
            .ok_or(PageError::NotCreated("last_edited_by"))
    }

    /// Both the id and the url, which exist only together.
    pub fn id_and_url(&self) -> Result<(&PageId, &str)> {
        match (&self.id, &self.url) {
            (Some(id), Some(url)) => Ok((id, url)),
            _ => Err(PageError::NotCreated("id or url")),
        }
    }

    pub fn parent_database_id(&self) -> Option<&str> {
        self.parent.as_ref().and_then(Parent::database_id)
    }

    // -- Formatting ----------------------------------------------------------

    /// `<url|title>`, the link form Slack renders.
    pub fn title_for_slack(&self) -> Result<String> {
        let url = self.url.as_deref().ok_or(PageError::NotCreated("url"))?;
        Ok(format!("<{}|{}>", url, self.title()?))
    }

    /// `[title](url)`.
    pub fn title_for_markdown(&self) -> Result<String> {
        let url = self.url.as_deref().ok_or(PageError::NotCreated("url"))?;
        Ok(format!("[{}]({})", self.title()?, url))
    }
}

fn malformed_field(key: &'static str, expected: &'static str, found: &Value) -> PageError {
    PageError::MalformedField {
        key,
        expected,
        found: json_type_name(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Button;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ID: &str = "1429989f-e8ac-4eff-bc8f-57f56486db54";

    fn wire_page() -> Value {
        json!({
            "object": "page",
            "id": ID,
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T03:00:00.000Z",
            "created_by": {"object": "user", "id": "u1"},
            "last_edited_by": {"object": "user", "id": "u2"},
            "cover": null,
            "icon": {"type": "emoji", "emoji": "📝"},
            "parent": {"type": "database_id", "database_id": "db1"},
            "archived": false,
            "url": "https://www.notion.so/Task-1429989fe8ac4effbc8f57f56486db54",
            "properties": {
                "Name": {"id": "title", "type": "title", "title": [{"plain_text": "Write docs"}]},
                "Status": {"id": "s", "type": "status", "status": {"name": "Doing"}},
                "Done": {"id": "d", "type": "checkbox", "checkbox": false},
            }
        })
    }

    #[test]
    fn parses_a_wire_page() {
        let page = BasePage::from_wire(&wire_page()).unwrap();
        assert!(page.is_created());
        assert_eq!(page.page_id().unwrap().as_str(), ID);
        assert_eq!(page.title().unwrap(), "Write docs");
        assert_eq!(page.get_status("Status").unwrap().selected_name(), Some("Doing"));
        assert!(!page.get_checkbox("Done").unwrap().checked);
        assert_eq!(
            page.created_at().unwrap(),
            DateTime::parse_from_rfc3339("2024-01-01T09:00:00+09:00").unwrap()
        );
        assert_eq!(page.edited_by().unwrap().id, "u2");
        assert_eq!(page.parent_database_id(), Some("db1"));
        assert_eq!(page.icon, Some(Icon::emoji("📝")));
        assert_eq!(page.cover, None);
    }

    #[test]
    fn typed_getters_report_missing_properties() {
        let page = BasePage::from_wire(&wire_page()).unwrap();
        let err = page.get_status("Done").unwrap_err();
        assert_eq!(err.to_string(), r#"status property not found: "Done""#);
        assert!(matches!(page.get_number("Points"), Err(PageError::Property(e)) if e.is_not_found()));
    }

    #[test]
    fn new_pages_are_not_created() {
        let page = BasePage::create(vec![Title::from_plain_text("Name", "Draft").into()]).unwrap();
        assert!(!page.is_created());
        assert!(matches!(page.created_at(), Err(PageError::NotCreated(_))));
        assert!(matches!(page.id_and_url(), Err(PageError::NotCreated(_))));
        assert!(page.title_for_slack().is_err());

        let id = PageId::parse(ID).unwrap();
        let created = page.with_id_and_url(id.clone(), "https://example.com/p");
        assert_eq!(created.id_and_url().unwrap(), (&id, "https://example.com/p"));
        assert_eq!(created.title_for_slack().unwrap(), "<https://example.com/p|Draft>");
        assert_eq!(created.title_for_markdown().unwrap(), "[Draft](https://example.com/p)");
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let err = BasePage::create(vec![
            Title::from_plain_text("Name", "a").into(),
            Checkbox::new("Name", true).into(),
        ])
        .unwrap_err();
        assert!(matches!(err, PageError::Property(PropertyError::DuplicateName(_))));
    }

    #[test]
    fn create_payload_skips_buttons() {
        let page = BasePage::create(vec![
            Title::from_plain_text("Name", "Draft").into(),
            Button::new("Run").into(),
        ])
        .unwrap();
        let page = BasePage {
            parent: Some(Parent::database("db1")),
            ..page
        };
        assert_eq!(
            page.to_create_payload(),
            json!({
                "parent": {"type": "database_id", "database_id": "db1"},
                "properties": {
                    "Name": {"type": "title", "title": [{"type": "text", "text": {"content": "Draft"}}]}
                }
            })
        );
    }

    #[test]
    fn with_property_is_copy_on_write() {
        let page = BasePage::from_wire(&wire_page()).unwrap();
        let updated = page.with_property(Checkbox::new("Done", true));
        assert!(updated.get_checkbox("Done").unwrap().checked);
        assert!(!page.get_checkbox("Done").unwrap().checked);
    }

    #[test]
    fn page_ids_are_canonicalized() {
        let id = PageId::parse("1429989FE8AC4EFFBC8F57F56486DB54").unwrap();
        assert_eq!(id.to_string(), ID);
        assert_eq!(id.compact(), "1429989fe8ac4effbc8f57f56486db54");
        assert!(PageId::parse("not-an-id").is_err());
    }

    #[test]
    fn wrongly_typed_page_fields_are_errors() {
        let wire = json!({"object": "page", "created_time": 12345, "properties": {}});
        let err = BasePage::from_wire(&wire).unwrap_err();
        assert!(matches!(err, PageError::MalformedField { key: "created_time", found: "a number", .. }));

        for (key, value) in [("id", json!(7)), ("url", json!(["x"])), ("archived", json!("no"))] {
            let mut wire = wire_page();
            wire[key] = value;
            assert!(
                matches!(BasePage::from_wire(&wire), Err(PageError::MalformedField { .. })),
                "{key}"
            );
        }
    }

    #[test]
    fn user_errors_name_their_own_kind() {
        let mut wire = wire_page();
        wire["last_edited_by"] = json!({"object": "user"});
        let err = BasePage::from_wire(&wire).unwrap_err();
        assert!(matches!(
            err,
            PageError::Property(PropertyError::Malformed { kind: PropertyKind::LastEditedBy, .. })
        ));
    }

    #[test]
    fn malformed_properties_fail_the_page() {
        let mut wire = wire_page();
        wire["properties"]["Done"] = json!({"type": "checkbox"});
        assert!(matches!(BasePage::from_wire(&wire), Err(PageError::Property(_))));
    }
}
