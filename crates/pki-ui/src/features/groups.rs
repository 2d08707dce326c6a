//! Groups page (`/rest/admin/groups`).

use super::{ResourcePage, add_form, edit_form, field_text, put};
use crate::core::attributes::Attributes;
use crate::core::model::EntityCodec;
use crate::core::table::Column;
use pki_ui_models::GroupData;
use serde_json::Value;
use std::rc::Rc;

/// REST path of the group collection.
pub const GROUPS_PATH: &str = "/rest/admin/groups";

/// Maps [`GroupData`] payloads to `id`, `groupID` and `description` attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupCodec;

impl EntityCodec for GroupCodec {
    fn parse_response(&self, response: Value) -> Attributes {
        let Ok(group) = serde_json::from_value::<GroupData>(response) else {
            tracing::warn!("unreadable group payload");
            return Attributes::new();
        };
        let mut attributes = Attributes::new();
        put(&mut attributes, "id", group.id);
        put(&mut attributes, "groupID", group.group_id);
        put(&mut attributes, "description", group.description);
        attributes
    }

    fn create_request(&self, attributes: &Attributes) -> Value {
        let group = GroupData {
            id: field_text(attributes, "id"),
            group_id: field_text(attributes, "groupID"),
            description: field_text(attributes, "description"),
        };
        serde_json::to_value(group).unwrap_or(Value::Null)
    }
}

/// Groups table: selection, group ID link and description.
#[must_use]
pub fn page() -> ResourcePage {
    ResourcePage {
        name: "groups",
        path: GROUPS_PATH,
        columns: vec![Column::select(), Column::id(), Column::field("description")],
        add_dialog: add_form("Add Group", &["groupID", "description"]),
        edit_dialog: edit_form("Edit Group", &["id", "description"], &["id"]),
        codec: Rc::new(GroupCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UiConfig;
    use crate::core::table::{DialogKind, TableActions};
    use crate::core::testing::{MockTransport, RecordingNotifier, attrs};
    use crate::core::transport::{HttpResponse, Method};
    use serde_json::json;

    #[test]
    fn round_trips_description() {
        let parsed = GroupCodec.parse_response(json!({
            "id": "Administrators",
            "GroupID": "Administrators",
            "Description": "Agents for administration"
        }));
        assert_eq!(parsed["description"], json!("Agents for administration"));
        assert_eq!(
            GroupCodec.create_request(&parsed),
            json!({
                "id": "Administrators",
                "GroupID": "Administrators",
                "Description": "Agents for administration"
            })
        );
    }

    #[test]
    fn non_object_payload_yields_nothing() {
        assert!(GroupCodec.parse_response(json!("oops")).is_empty());
        assert_eq!(GroupCodec.create_request(&attrs(json!({}))), json!({}));
    }

    #[tokio::test]
    async fn add_posts_group_payload() {
        let transport = Rc::new(MockTransport::new());
        let table = page().into_table(
            &UiConfig::default(),
            transport.clone(),
            Rc::new(RecordingNotifier::new(true)),
        );
        table.add();
        table.dialog_input(DialogKind::Add, "groupID", "Auditors".into());
        transport.respond(HttpResponse::new(201, "Created", ""));
        transport.respond_json(200, &json!({"total": 1, "entries": {"id": "Auditors", "GroupID": "Auditors"}}));
        table.dialog_action(DialogKind::Add, "add").await.unwrap();

        let post = &transport.requests()[0];
        assert_eq!(post.method, Method::Post);
        assert_eq!(post.url, "/rest/admin/groups");
        assert_eq!(post.body, Some(json!({"GroupID": "Auditors"})));
        assert_eq!(table.collection().len(), 1);
    }

    #[tokio::test]
    async fn edit_sends_only_the_description() {
        let transport = Rc::new(MockTransport::new());
        let table = page().into_table(
            &UiConfig::default(),
            transport.clone(),
            Rc::new(RecordingNotifier::new(true)),
        );
        let auditors = json!({"id": "Auditors", "GroupID": "Auditors", "Description": "Audit"});
        transport.respond_json(200, &json!({"total": 1, "entries": auditors.clone()}));
        table.render().await.unwrap();
        transport.respond_json(200, &auditors);
        table.open(0).await.unwrap();

        table.dialog_input(DialogKind::Edit, "description", "Auditors of record".into());
        transport.respond(HttpResponse::new(200, "OK", ""));
        transport.respond_json(200, &json!({"total": 1, "entries": auditors}));
        table.dialog_action(DialogKind::Edit, "save").await.unwrap();

        let patch = &transport.requests()[2];
        assert_eq!(patch.method, Method::Patch);
        assert_eq!(patch.url, "/rest/admin/groups/Auditors");
        assert_eq!(patch.body, Some(json!({"Description": "Auditors of record"})));
    }
}
