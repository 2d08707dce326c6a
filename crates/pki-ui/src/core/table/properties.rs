//! Table over an in-memory list of name/value properties.
//!
//! Filtering, paging and edits all happen locally; nothing here touches the
//! network or can fail.

use super::{DialogKind, DialogView, TableActions, TableFrame, TableOptions};
use crate::core::attributes::Attributes;
use crate::core::dialog::Dialog;
use crate::core::error::UiError;
use crate::core::notify::Notifier;
use async_trait::async_trait;
use pki_ui_models::Property;
use std::cell::RefCell;
use std::rc::Rc;

/// Local edit requested by a dialog button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyIntent {
    /// Write the edit dialog back into the property at this position.
    Update(usize),
    /// Append the add dialog as a new property.
    Create,
}

/// Shared handle to a dialog driven by a properties table.
pub(super) type PropertyDialog = Rc<RefCell<Dialog<PropertyIntent>>>;

/// Paged, locally filtered view of a property list.
pub struct PropertiesTable {
    frame: TableFrame,
    properties: RefCell<Vec<Property>>,
    entries: RefCell<Vec<usize>>,
    notifier: Rc<dyn Notifier>,
    add_dialog: Option<PropertyDialog>,
    edit_dialog: Option<PropertyDialog>,
}

impl PropertiesTable {
    /// Table over `properties`; call [`TableActions::render`] to show it.
    #[must_use]
    pub fn new(options: TableOptions, properties: Vec<Property>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            frame: TableFrame::new(options),
            properties: RefCell::new(properties),
            entries: RefCell::new(Vec::new()),
            notifier,
            add_dialog: None,
            edit_dialog: None,
        }
    }

    /// Attach the dialog used by the add button.
    #[must_use]
    pub fn with_add_dialog(mut self, dialog: PropertyDialog) -> Self {
        self.add_dialog = Some(dialog);
        self
    }

    /// Attach the dialog used when a row link is clicked.
    #[must_use]
    pub fn with_edit_dialog(mut self, dialog: PropertyDialog) -> Self {
        self.edit_dialog = Some(dialog);
        self
    }

    /// Copy of the full property list.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        self.properties.borrow().clone()
    }

    /// Properties matching the current search, in list order.
    #[must_use]
    pub fn entries(&self) -> Vec<Property> {
        let properties = self.properties.borrow();
        self.entries
            .borrow()
            .iter()
            .filter_map(|index| properties.get(*index).cloned())
            .collect()
    }

    fn dialog(&self, kind: DialogKind) -> Option<&PropertyDialog> {
        match kind {
            DialogKind::Add => self.add_dialog.as_ref(),
            DialogKind::Edit => self.edit_dialog.as_ref(),
        }
    }

    fn dialog_attributes(&self, kind: DialogKind) -> Option<Attributes> {
        self.dialog(kind)
            .map(|dialog| dialog.borrow().attributes().clone())
    }

    fn close(&self, kind: DialogKind) {
        if let Some(dialog) = self.dialog(kind) {
            dialog.borrow_mut().close();
        }
    }

    /// Filter, then rebind every row slot from the matching entries.
    pub fn refresh(&self) {
        let filter = self.frame.search();
        let matching: Vec<usize> = self
            .properties
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, property)| {
                filter.is_empty() || property.name.contains(&filter) || property.value.contains(&filter)
            })
            .map(|(index, _)| index)
            .collect();
        self.frame.render_controls(matching.len() as u64);

        let name = self.frame.name().to_string();
        let offset = usize::try_from(self.frame.start()).unwrap_or(usize::MAX);
        let properties = self.properties.borrow();
        for row in 0..self.frame.page_size() as usize {
            let slot = offset
                .checked_add(row)
                .and_then(|position| matching.get(position))
                .and_then(|index| properties.get(*index).map(|property| (*index, property)));
            self.frame.with_item(row, |item| match slot {
                Some((index, property)) => item.render_property(&name, index, property),
                None => item.reset(),
            });
        }
        *self.entries.borrow_mut() = matching;
    }

    fn apply(&self, intent: PropertyIntent) {
        match intent {
            PropertyIntent::Update(index) => {
                if let Some(attributes) = self.dialog_attributes(DialogKind::Edit) {
                    let mut properties = self.properties.borrow_mut();
                    if let Some(property) = properties.get_mut(index) {
                        merge(property, &attributes);
                    }
                }
                self.refresh();
                self.close(DialogKind::Edit);
            }
            PropertyIntent::Create => {
                if let Some(attributes) = self.dialog_attributes(DialogKind::Add) {
                    let mut properties = self.properties.borrow_mut();
                    properties.push(Property::from_attributes(&attributes));
                    properties.sort_by(|left, right| left.name.cmp(&right.name));
                }
                self.refresh();
                self.close(DialogKind::Add);
            }
        }
    }
}

fn merge(property: &mut Property, attributes: &Attributes) {
    let incoming = Property::from_attributes(attributes);
    if attributes.contains_key("name") {
        property.name = incoming.name;
    }
    if attributes.contains_key("value") {
        property.value = incoming.value;
    }
}

#[async_trait(?Send)]
impl TableActions for PropertiesTable {
    fn frame(&self) -> &TableFrame {
        &self.frame
    }

    fn notifier(&self) -> &dyn Notifier {
        &*self.notifier
    }

    async fn render(&self) -> Result<(), UiError> {
        self.refresh();
        Ok(())
    }

    async fn open(&self, row: usize) -> Result<(), UiError> {
        let index = self
            .frame
            .with_item(row, |item| match item.binding() {
                super::Binding::Property { index, .. } => Some(*index),
                _ => None,
            })
            .flatten()
            .ok_or_else(|| UiError::MissingEntity(format!("row {row}")))?;
        let Some(property) = self.properties.borrow().get(index).cloned() else {
            return Err(UiError::MissingEntity(format!("property {index}")));
        };
        let Some(dialog) = self.dialog(DialogKind::Edit) else {
            return Ok(());
        };
        let mut dialog = dialog.borrow_mut();
        dialog.set_attributes(property.to_attributes());
        dialog.handler("save", move |dialog: &mut Dialog<PropertyIntent>| {
            dialog.save();
            Some(PropertyIntent::Update(index))
        });
        dialog.open();
        Ok(())
    }

    fn add(&self) {
        let Some(dialog) = self.dialog(DialogKind::Add) else {
            return;
        };
        let mut dialog = dialog.borrow_mut();
        dialog.set_attributes(Attributes::new());
        dialog.handler("add", |dialog: &mut Dialog<PropertyIntent>| {
            dialog.save();
            Some(PropertyIntent::Create)
        });
        dialog.open();
    }

    async fn remove(&self, ids: Vec<String>) -> Result<(), UiError> {
        self.properties
            .borrow_mut()
            .retain(|property| !ids.contains(&property.name));
        self.refresh();
        Ok(())
    }

    async fn dialog_action(&self, kind: DialogKind, action: &str) -> Result<(), UiError> {
        let Some(dialog) = self.dialog(kind) else {
            return Ok(());
        };
        let intent = dialog.borrow_mut().trigger(action);
        if let Some(intent) = intent {
            self.apply(intent);
        }
        Ok(())
    }

    fn dialog_input(&self, kind: DialogKind, field: &str, value: String) {
        if let Some(dialog) = self.dialog(kind) {
            dialog.borrow_mut().set_field(field, value);
        }
    }

    fn dialog_dismiss(&self, kind: DialogKind) {
        if let Some(dialog) = self.dialog(kind) {
            dialog.borrow_mut().dismiss();
        }
    }

    fn dialog_view(&self, kind: DialogKind) -> Option<DialogView> {
        self.dialog(kind).map(|dialog| dialog.borrow().view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dialog::DialogOptions;
    use crate::core::table::{Cell, Column};
    use crate::core::testing::RecordingNotifier;

    fn property_dialog(buttons: &[&str]) -> PropertyDialog {
        Rc::new(RefCell::new(Dialog::new(DialogOptions {
            fields: vec!["name".into(), "value".into()],
            buttons: buttons.iter().map(|name| (*name).to_string()).collect(),
            ..DialogOptions::default()
        })))
    }

    fn table(properties: Vec<Property>, notifier: Rc<RecordingNotifier>) -> PropertiesTable {
        let options = TableOptions::new(
            "props",
            vec![Column::select(), Column::id(), Column::field("value")],
        )
        .page_size(2);
        PropertiesTable::new(options, properties, notifier)
            .with_add_dialog(property_dialog(&["add", "cancel"]))
            .with_edit_dialog(property_dialog(&["save", "cancel"]))
    }

    fn sample() -> Vec<Property> {
        vec![
            Property::new("alpha", "one"),
            Property::new("beta", "two"),
            Property::new("gamma", "alphabet"),
        ]
    }

    fn names(table: &PropertiesTable) -> Vec<String> {
        table.entries().into_iter().map(|property| property.name).collect()
    }

    #[tokio::test]
    async fn search_matches_names_or_values() {
        let table = table(sample(), Rc::new(RecordingNotifier::new(true)));
        table.search("alpha").await.unwrap();
        assert_eq!(names(&table), vec!["alpha", "gamma"]);
        assert_eq!(table.frame().total_entries(), 2);

        table.search("Alpha").await.unwrap();
        assert!(names(&table).is_empty());
        assert_eq!(table.frame().total_pages(), 1);
    }

    #[tokio::test]
    async fn pages_fill_rows_then_blank_the_rest() {
        let table = table(sample(), Rc::new(RecordingNotifier::new(true)));
        table.render().await.unwrap();
        assert_eq!(table.frame().total_pages(), 2);

        table.next_page().await.unwrap();
        let rows = table.frame().rows();
        assert_eq!(rows[0][1], Cell::Id(Some("gamma".into())));
        assert_eq!(rows[0][2], Cell::Text("alphabet".into()));
        assert_eq!(rows[1][1], Cell::Id(None));
    }

    #[tokio::test]
    async fn add_keeps_list_sorted_by_name() {
        let table = table(sample(), Rc::new(RecordingNotifier::new(true)));
        table.render().await.unwrap();
        table.add();
        table.dialog_input(DialogKind::Add, "name", "aardvark".into());
        table.dialog_input(DialogKind::Add, "value", "zero".into());
        table.dialog_action(DialogKind::Add, "add").await.unwrap();

        let all: Vec<String> = table.properties().into_iter().map(|p| p.name).collect();
        assert_eq!(all, vec!["aardvark", "alpha", "beta", "gamma"]);
        assert!(table.dialog_view(DialogKind::Add).is_some_and(|view| !view.open));
    }

    #[tokio::test]
    async fn edit_updates_property_in_place() {
        let table = table(sample(), Rc::new(RecordingNotifier::new(true)));
        table.render().await.unwrap();
        table.open(1).await.unwrap();
        let view = table.dialog_view(DialogKind::Edit).unwrap_or_default();
        assert!(view.open);
        assert_eq!(view.fields[1].value, "two");

        table.dialog_input(DialogKind::Edit, "value", "deux".into());
        table.dialog_action(DialogKind::Edit, "save").await.unwrap();
        assert_eq!(table.properties()[1], Property::new("beta", "deux"));
        assert_eq!(table.frame().rows()[1][2], Cell::Text("deux".into()));
    }

    #[tokio::test]
    async fn open_on_empty_row_is_missing_entity() {
        let table = table(vec![Property::new("only", "1")], Rc::new(RecordingNotifier::new(true)));
        table.render().await.unwrap();
        assert!(matches!(table.open(1).await, Err(UiError::MissingEntity(_))));
    }

    #[tokio::test]
    async fn remove_selected_confirms_then_drops_by_name() {
        let notifier = Rc::new(RecordingNotifier::new(true));
        let table = table(sample(), Rc::clone(&notifier));
        table.render().await.unwrap();
        table.frame().toggle_all(true);
        table.remove_selected().await.unwrap();

        assert_eq!(
            notifier.prompts(),
            vec!["Are you sure you want to remove the following entries?\n - alpha\n - beta\n"]
        );
        assert_eq!(table.properties(), vec![Property::new("gamma", "alphabet")]);
        assert!(!table.frame().select_all());
    }

    #[tokio::test]
    async fn declined_remove_keeps_everything() {
        let notifier = Rc::new(RecordingNotifier::new(false));
        let table = table(sample(), Rc::clone(&notifier));
        table.render().await.unwrap();
        table.frame().set_checked(0, true);
        table.remove_selected().await.unwrap();
        assert_eq!(notifier.prompts().len(), 1);
        assert_eq!(table.properties().len(), 3);
    }
}
