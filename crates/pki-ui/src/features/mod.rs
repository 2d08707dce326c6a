//! Console pages built on the core widgets.
//!
//! # Design
//! - Each feature owns its REST path, wire codec, columns and dialog forms.
//! - Wire payloads go through the shared DTOs so field names live in one place.

pub mod groups;
pub mod users;

use crate::core::attributes::{self, Attributes};
use crate::core::collection::{Collection, CollectionOptions, EnvelopeCodec};
use crate::core::config::UiConfig;
use crate::core::dialog::{Dialog, DialogOptions};
use crate::core::model::EntityCodec;
use crate::core::notify::Notifier;
use crate::core::table::{Column, Table, TableOptions};
use crate::core::transport::Transport;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything needed to build the table for one remote resource.
pub struct ResourcePage {
    /// Table name; prefixes checkbox ids.
    pub name: &'static str,
    /// REST path below the API base URL.
    pub path: &'static str,
    /// Column layout.
    pub columns: Vec<Column>,
    /// Add form.
    pub add_dialog: DialogOptions,
    /// Edit form.
    pub edit_dialog: DialogOptions,
    /// Wire codec for one entity.
    pub codec: Rc<dyn EntityCodec>,
}

impl ResourcePage {
    /// Wire the page into a table over its collection.
    #[must_use]
    pub fn into_table(
        self,
        config: &UiConfig,
        transport: Rc<dyn Transport>,
        notifier: Rc<dyn Notifier>,
    ) -> Table {
        let collection = Collection::new(
            CollectionOptions::new(config.api_url(self.path)),
            Rc::new(EnvelopeCodec::new(Rc::clone(&self.codec))),
            self.codec,
        );
        let options = TableOptions::new(self.name, self.columns).page_size(config.page_size());
        Table::new(options, collection, transport, notifier)
            .with_add_dialog(Rc::new(RefCell::new(Dialog::new(self.add_dialog))))
            .with_edit_dialog(Rc::new(RefCell::new(Dialog::new(self.edit_dialog))))
    }
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

/// Form with the standard `add`/`cancel` buttons.
pub(crate) fn add_form(title: &str, fields: &[&str]) -> DialogOptions {
    DialogOptions {
        title: Some(title.to_string()),
        fields: names(fields),
        buttons: names(&["add", "cancel"]),
        readonly: Vec::new(),
        actions: None,
    }
}

/// Form with the standard `save`/`cancel` buttons.
pub(crate) fn edit_form(title: &str, fields: &[&str], readonly: &[&str]) -> DialogOptions {
    DialogOptions {
        title: Some(title.to_string()),
        fields: names(fields),
        buttons: names(&["save", "cancel"]),
        readonly: names(readonly),
        actions: None,
    }
}

/// Text of an attribute that is present; a cleared field stays `Some("")`.
pub(crate) fn field_text(attributes: &Attributes, name: &str) -> Option<String> {
    attributes
        .get(name)
        .map(|value| attributes::value_text(Some(value)))
}

/// Insert `value` unless it is absent.
pub(crate) fn put(attributes: &mut Attributes, name: &str, value: Option<String>) {
    if let Some(value) = value {
        attributes.insert(name.to_string(), Value::String(value));
    }
}
