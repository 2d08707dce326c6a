#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared REST DTOs for the PKI administration console.
//!
//! The console widgets work on loosely-typed attribute bags so that any REST
//! resource can be shown in a table. The typed resources here describe the
//! payloads of the built-in pages and are converted to and from attribute bags
//! at the codec boundary.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unordered mapping from field name to scalar value for one entity.
pub type Attributes = Map<String, Value>;

/// A named relation to another URL returned alongside a collection page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Relation name such as `next` or `prev`.
    pub rel: String,
    /// Target URL of the relation.
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    /// Optional media type advertised by the server.
    pub media_type: Option<String>,
}

/// Explicit name/value pair held by in-memory property tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    /// Property name; acts as the row identity.
    pub name: String,
    /// Property value.
    pub value: String,
}

impl Property {
    /// Build a property from any string-like pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Read a property out of a dialog attribute bag; missing fields are blank.
    #[must_use]
    pub fn from_attributes(attributes: &Attributes) -> Self {
        let field = |name: &str| {
            attributes
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            name: field("name"),
            value: field("value"),
        }
    }

    /// Convert into an attribute bag with `name` and `value` keys.
    #[must_use]
    pub fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), Value::String(self.name.clone()));
        attributes.insert("value".to_string(), Value::String(self.value.clone()));
        attributes
    }
}

/// PKI user account as exposed by `/rest/admin/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserData {
    /// Server-assigned identifier (same as the user ID once created).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login name.
    #[serde(rename = "UserID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name.
    #[serde(rename = "FullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Contact address.
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account state flag.
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Account type (for example `adminType`).
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// PKI group as exposed by `/rest/admin/groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupData {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name.
    #[serde(rename = "GroupID", default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Free-form description.
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_reads_server_names_and_ignores_links() {
        let user: UserData = serde_json::from_value(json!({
            "id": "admin",
            "UserID": "admin",
            "FullName": "Administrator",
            "Link": { "rel": "self", "href": "/rest/admin/users/admin" }
        }))
        .expect("user should parse");
        assert_eq!(user.full_name.as_deref(), Some("Administrator"));
        assert_eq!(user.email, None);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let user = UserData {
            email: Some(String::new()),
            ..UserData::default()
        };
        assert_eq!(serde_json::to_value(user).expect("user should serialize"), json!({"Email": ""}));
        assert_eq!(
            serde_json::to_value(GroupData::default()).expect("group should serialize"),
            json!({})
        );
    }

    #[test]
    fn link_media_type_is_optional() {
        let link: Link = serde_json::from_value(json!({ "rel": "next", "href": "/p2" }))
            .expect("link should parse");
        assert_eq!(link.media_type, None);
        assert_eq!(serde_json::to_value(&link).expect("link should serialize"), json!({ "rel": "next", "href": "/p2" }));
    }

    #[test]
    fn property_reads_blank_for_missing_fields() {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), json!("ca.cert.signing"));
        let property = Property::from_attributes(&attributes);
        assert_eq!(property, Property::new("ca.cert.signing", ""));
        assert_eq!(property.to_attributes()["value"], json!(""));
    }
}
