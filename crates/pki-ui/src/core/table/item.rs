//! One reusable table row slot.
//!
//! # Design
//! - Slots are allocated once per table and rebound on every render.
//! - A bound slot keeps one subscription per text column; rebinding or
//!   resetting drops them before anything new is attached.

use crate::core::events::{Emitter, Subscription};
use crate::core::attributes;
use crate::core::model::Model;
use pki_ui_models::Property;
use std::cell::RefCell;
use std::rc::Rc;

/// Role of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Checkbox used for bulk selection.
    Select,
    /// Entity identity rendered as a link that opens the edit dialog.
    Id,
    /// Plain text value of a field.
    Field,
}

/// A named table column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Field name shown in the column.
    pub name: String,
    /// Column role.
    pub kind: ColumnKind,
}

impl Column {
    /// Bulk-selection checkbox column.
    #[must_use]
    pub fn select() -> Self {
        Self {
            name: "select".to_string(),
            kind: ColumnKind::Select,
        }
    }

    /// Identity link column.
    #[must_use]
    pub fn id() -> Self {
        Self {
            name: "id".to_string(),
            kind: ColumnKind::Id,
        }
    }

    /// Text column bound to a field.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Field,
        }
    }
}

/// Rendered state of one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Selection checkbox and its label.
    Select {
        /// DOM id of the checkbox; blank on an empty row.
        checkbox_id: String,
        /// Checkbox value (the row identity); blank on an empty row.
        value: String,
        /// Whether the checkbox is ticked.
        checked: bool,
        /// Whether the checkbox label is shown.
        label_visible: bool,
    },
    /// Edit link; hidden when `None`.
    Id(Option<String>),
    /// Plain text.
    Text(String),
}

impl Cell {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Select => Self::Select {
                checkbox_id: String::new(),
                value: String::new(),
                checked: false,
                label_visible: false,
            },
            ColumnKind::Id => Self::Id(None),
            ColumnKind::Field => Self::Text(String::new()),
        }
    }
}

/// What a slot currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Binding {
    /// Empty row.
    #[default]
    Empty,
    /// Remote entity.
    Model(Model),
    /// Entry of an in-memory property list, by position in that list.
    Property {
        /// Position in the owning table's property list.
        index: usize,
        /// Property name (the row identity).
        name: String,
    },
}

/// Reusable row slot.
pub struct TableItem {
    index: usize,
    columns: Rc<[Column]>,
    cells: Rc<RefCell<Vec<Cell>>>,
    binding: Binding,
    subscriptions: Vec<Subscription>,
    updates: Emitter<usize>,
}

impl TableItem {
    /// Empty slot at position `index`; live cell edits are announced on `updates`.
    #[must_use]
    pub fn new(index: usize, columns: Rc<[Column]>, updates: Emitter<usize>) -> Self {
        let mut item = Self {
            index,
            columns,
            cells: Rc::new(RefCell::new(Vec::new())),
            binding: Binding::Empty,
            subscriptions: Vec::new(),
            updates,
        };
        item.reset();
        item
    }

    /// Blank the row: untick and hide the checkbox, hide the link, clear text.
    pub fn reset(&mut self) {
        self.subscriptions.clear();
        self.binding = Binding::Empty;
        *self.cells.borrow_mut() = self
            .columns
            .iter()
            .map(|column| Cell::empty(column.kind))
            .collect();
    }

    /// Show a remote entity. Text cells follow later changes of the entity
    /// until the slot is rebound or reset.
    pub fn render_model(&mut self, table_name: &str, model: &Model) {
        self.subscriptions.clear();
        let id = model.id().unwrap_or_default();
        let mut cells = Vec::with_capacity(self.columns.len());
        for (position, column) in self.columns.iter().enumerate() {
            let cell = match column.kind {
                ColumnKind::Select => select_cell(table_name, &id),
                ColumnKind::Id => Cell::Id(Some(id.clone())),
                ColumnKind::Field => {
                    let cells = Rc::clone(&self.cells);
                    let updates = self.updates.clone();
                    let row = self.index;
                    self.subscriptions
                        .push(model.on_change(&column.name, move |value| {
                            if let Some(slot) = cells.borrow_mut().get_mut(position) {
                                *slot = Cell::Text(attributes::value_text(Some(value)));
                            }
                            updates.emit("row", &row);
                        }));
                    Cell::Text(model.text(&column.name))
                }
            };
            cells.push(cell);
        }
        *self.cells.borrow_mut() = cells;
        self.binding = Binding::Model(model.clone());
    }

    /// Show an in-memory property stored at `index` of the owning list.
    pub fn render_property(&mut self, table_name: &str, index: usize, property: &Property) {
        self.subscriptions.clear();
        let cells = self
            .columns
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Select => select_cell(table_name, &property.name),
                ColumnKind::Id => Cell::Id(Some(property.name.clone())),
                ColumnKind::Field if column.name == "name" => Cell::Text(property.name.clone()),
                ColumnKind::Field => Cell::Text(property.value.clone()),
            })
            .collect();
        *self.cells.borrow_mut() = cells;
        self.binding = Binding::Property {
            index,
            name: property.name.clone(),
        };
    }

    /// Slot position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current binding.
    #[must_use]
    pub const fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Bound entity, if the row shows one.
    #[must_use]
    pub fn model(&self) -> Option<Model> {
        match &self.binding {
            Binding::Model(model) => Some(model.clone()),
            _ => None,
        }
    }

    /// Row identity: entity id or property name.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match &self.binding {
            Binding::Empty => None,
            Binding::Model(model) => model.id(),
            Binding::Property { name, .. } => Some(name.clone()),
        }
    }

    /// Snapshot of the rendered cells.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.cells.borrow().clone()
    }

    /// Number of live field subscriptions held by the slot.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Tick or untick the selection checkbox.
    pub fn set_checked(&self, checked: bool) {
        for cell in self.cells.borrow_mut().iter_mut() {
            if let Cell::Select { checked: slot, .. } = cell {
                *slot = checked;
            }
        }
    }

    /// Checkbox value when ticked and non-blank.
    #[must_use]
    pub fn selected_value(&self) -> Option<String> {
        self.cells.borrow().iter().find_map(|cell| match cell {
            Cell::Select { value, checked: true, .. } if !value.is_empty() => Some(value.clone()),
            _ => None,
        })
    }
}

fn select_cell(table_name: &str, id: &str) -> Cell {
    Cell::Select {
        checkbox_id: format!("{table_name}_select_{id}"),
        value: id.to_string(),
        checked: false,
        label_visible: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::IdentityCodec;
    use crate::core::testing::attrs;
    use serde_json::json;

    fn columns() -> Rc<[Column]> {
        Rc::from(vec![Column::select(), Column::id(), Column::field("fullName")])
    }

    fn user(id: &str, name: &str) -> Model {
        Model::with_attributes(
            "/rest/admin/users",
            Rc::new(IdentityCodec),
            attrs(json!({"id": id, "fullName": name})),
        )
    }

    #[test]
    fn reset_blanks_every_cell() {
        let item = TableItem::new(0, columns(), Emitter::new());
        assert_eq!(
            item.cells(),
            vec![
                Cell::Select {
                    checkbox_id: String::new(),
                    value: String::new(),
                    checked: false,
                    label_visible: false,
                },
                Cell::Id(None),
                Cell::Text(String::new()),
            ]
        );
        assert_eq!(item.id(), None);
    }

    #[test]
    fn render_model_fills_cells() {
        let mut item = TableItem::new(0, columns(), Emitter::new());
        item.render_model("users", &user("u1", "Alice"));
        let cells = item.cells();
        assert_eq!(
            cells[0],
            Cell::Select {
                checkbox_id: "users_select_u1".to_string(),
                value: "u1".to_string(),
                checked: false,
                label_visible: true,
            }
        );
        assert_eq!(cells[1], Cell::Id(Some("u1".to_string())));
        assert_eq!(cells[2], Cell::Text("Alice".to_string()));
    }

    #[test]
    fn text_cells_follow_model_changes() {
        let updates = Emitter::new();
        let bumps = Rc::new(std::cell::Cell::new(0));
        let counter = Rc::clone(&bumps);
        let _watch = updates.subscribe("row", move |_: &usize| counter.set(counter.get() + 1));
        let mut item = TableItem::new(2, columns(), updates);
        let model = user("u1", "Alice");
        item.render_model("users", &model);
        model.set(attrs(json!({"fullName": "Alicia"})));
        assert_eq!(item.cells()[2], Cell::Text("Alicia".to_string()));
        assert_eq!(bumps.get(), 1);
    }

    #[test]
    fn rebinding_drops_previous_subscriptions() {
        let mut item = TableItem::new(0, columns(), Emitter::new());
        let first = user("u1", "Alice");
        let second = user("u2", "Bob");
        for _ in 0..3 {
            item.render_model("users", &first);
        }
        assert_eq!(item.subscription_count(), 1);
        item.render_model("users", &second);
        first.set(attrs(json!({"fullName": "Changed"})));
        assert_eq!(item.cells()[2], Cell::Text("Bob".to_string()));
        item.reset();
        assert_eq!(item.subscription_count(), 0);
    }

    #[test]
    fn selection_skips_blank_rows() {
        let mut item = TableItem::new(0, columns(), Emitter::new());
        item.set_checked(true);
        assert_eq!(item.selected_value(), None);
        item.render_property("props", 0, &Property::new("a", "1"));
        item.set_checked(true);
        assert_eq!(item.selected_value().as_deref(), Some("a"));
    }
}
