//! User accounts page (`/rest/admin/users`).

use super::{ResourcePage, add_form, edit_form, field_text, put};
use crate::core::attributes::Attributes;
use crate::core::model::EntityCodec;
use crate::core::table::Column;
use pki_ui_models::UserData;
use serde_json::Value;
use std::rc::Rc;

/// REST path of the user collection.
pub const USERS_PATH: &str = "/rest/admin/users";

/// Maps [`UserData`] payloads to `id`, `userID`, `fullName`, `email`,
/// `state` and `type` attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserCodec;

impl EntityCodec for UserCodec {
    fn parse_response(&self, response: Value) -> Attributes {
        let user: UserData = match serde_json::from_value(response) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "unreadable user payload");
                return Attributes::new();
            }
        };
        let mut attributes = Attributes::new();
        put(&mut attributes, "id", user.id);
        put(&mut attributes, "userID", user.user_id);
        put(&mut attributes, "fullName", user.full_name);
        put(&mut attributes, "email", user.email);
        put(&mut attributes, "state", user.state);
        put(&mut attributes, "type", user.kind);
        attributes
    }

    fn create_request(&self, attributes: &Attributes) -> Value {
        let user = UserData {
            id: field_text(attributes, "id"),
            user_id: field_text(attributes, "userID"),
            full_name: field_text(attributes, "fullName"),
            email: field_text(attributes, "email"),
            state: field_text(attributes, "state"),
            kind: field_text(attributes, "type"),
        };
        serde_json::to_value(user).unwrap_or(Value::Null)
    }
}

/// Users table: selection, user ID link and full name.
#[must_use]
pub fn page() -> ResourcePage {
    ResourcePage {
        name: "users",
        path: USERS_PATH,
        columns: vec![Column::select(), Column::id(), Column::field("fullName")],
        add_dialog: add_form("Add User", &["userID", "fullName", "email"]),
        edit_dialog: edit_form(
            "Edit User",
            &["id", "fullName", "email", "state", "type"],
            &["id", "type"],
        ),
        codec: Rc::new(UserCodec),
    }
}
