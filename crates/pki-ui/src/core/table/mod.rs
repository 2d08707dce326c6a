//! Paged tables with bulk selection and add/edit dialogs.
//!
//! # Design
//! - [`TableFrame`] owns what every table shares: row slots, paging, the
//!   search field and selection.
//! - [`Table`] binds a frame to a remote [`Collection`](crate::core::collection::Collection);
//!   [`PropertiesTable`] binds one to an in-memory property list.
//! - Operator gestures go through [`TableActions`] so views drive either kind
//!   the same way.

mod item;
mod properties;
mod remote;

pub use item::{Binding, Cell, Column, ColumnKind, TableItem};
pub use properties::{PropertiesTable, PropertyIntent};
pub use remote::{Table, TableIntent};

pub use crate::core::dialog::DialogView;
use crate::core::error::UiError;
use crate::core::events::{Emitter, Subscription};
use crate::core::notify::Notifier;
use crate::core::pagination::Pager;
use async_trait::async_trait;
use std::cell::{Cell as StdCell, Ref, RefCell};
use std::rc::Rc;

/// Rows shown per page when a table does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Prompt shown before a bulk remove, followed by one ` - <id>` line per entry.
pub const REMOVE_PROMPT: &str = "Are you sure you want to remove the following entries?\n";

/// Static table configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOptions {
    /// Table name; prefixes checkbox ids.
    pub name: String,
    /// Rows per page.
    pub page_size: u32,
    /// Column layout.
    pub columns: Vec<Column>,
}

impl TableOptions {
    /// Options with the default page size.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            page_size: DEFAULT_PAGE_SIZE,
            columns,
        }
    }

    /// Override the page size; zero is treated as one.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Which of a table's dialogs an action targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKind {
    /// The add dialog.
    Add,
    /// The edit dialog.
    Edit,
}

/// Paging, search, selection and row slots shared by every table.
pub struct TableFrame {
    name: String,
    columns: Rc<[Column]>,
    pager: StdCell<Pager>,
    total_entries: StdCell<u64>,
    page_field: RefCell<String>,
    search: RefCell<String>,
    select_all: StdCell<bool>,
    items: RefCell<Vec<TableItem>>,
    updates: Emitter<usize>,
}

impl TableFrame {
    /// Frame with `page_size` empty rows.
    #[must_use]
    pub fn new(options: TableOptions) -> Self {
        let pager = Pager::new(options.page_size);
        let columns: Rc<[Column]> = Rc::from(options.columns);
        let updates = Emitter::new();
        let items = (0..pager.page_size() as usize)
            .map(|index| TableItem::new(index, Rc::clone(&columns), updates.clone()))
            .collect();
        Self {
            name: options.name,
            columns,
            pager: StdCell::new(pager),
            total_entries: StdCell::new(0),
            page_field: RefCell::new("1".to_string()),
            search: RefCell::new(String::new()),
            select_all: StdCell::new(false),
            items: RefCell::new(items),
            updates,
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column layout shared by every row.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Current 1-based page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.pager.get().page()
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.pager.get().page_size()
    }

    /// Page count shown in the footer.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.pager.get().total_pages()
    }

    /// Entry count shown in the footer.
    #[must_use]
    pub fn total_entries(&self) -> u64 {
        self.total_entries.get()
    }

    /// Zero-based offset of the first row of the current page.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.pager.get().start()
    }

    /// Text of the page-number field.
    #[must_use]
    pub fn page_field(&self) -> String {
        self.page_field.borrow().clone()
    }

    /// Text of the search field.
    #[must_use]
    pub fn search(&self) -> String {
        self.search.borrow().clone()
    }

    /// Operator typed into the search field (applied on the next render).
    pub fn set_search(&self, text: impl Into<String>) {
        *self.search.borrow_mut() = text.into();
    }

    /// Whether the select-all checkbox is ticked.
    #[must_use]
    pub fn select_all(&self) -> bool {
        self.select_all.get()
    }

    fn update_pager(&self, change: impl FnOnce(&mut Pager)) {
        let mut pager = self.pager.get();
        change(&mut pager);
        self.pager.set(pager);
    }

    /// Move to page one.
    pub fn first(&self) {
        self.update_pager(Pager::first);
    }

    /// Move back one page.
    pub fn prev(&self) {
        self.update_pager(Pager::prev);
    }

    /// Move forward one page.
    pub fn next(&self) {
        self.update_pager(Pager::next);
    }

    /// Move to the last page.
    pub fn last(&self) {
        self.update_pager(Pager::last);
    }

    /// Move to the page typed into the page field.
    pub fn jump(&self, raw: &str) {
        self.update_pager(|pager| pager.jump(raw));
    }

    /// Refresh footer controls after new data arrived and clear select-all.
    pub fn render_controls(&self, total_entries: u64) {
        self.select_all.set(false);
        self.total_entries.set(total_entries);
        *self.page_field.borrow_mut() = self.page().to_string();
        self.update_pager(|pager| pager.set_total_entries(total_entries));
    }

    /// Tick or untick every row checkbox along with select-all.
    pub fn toggle_all(&self, checked: bool) {
        self.select_all.set(checked);
        for item in self.items.borrow().iter() {
            item.set_checked(checked);
        }
    }

    /// Tick or untick one row checkbox.
    pub fn set_checked(&self, row: usize, checked: bool) {
        if let Some(item) = self.items.borrow().get(row) {
            item.set_checked(checked);
        }
    }

    /// Identities of ticked, non-empty rows.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .filter_map(TableItem::selected_value)
            .collect()
    }

    /// Row slots.
    pub fn items(&self) -> Ref<'_, Vec<TableItem>> {
        self.items.borrow()
    }

    /// Mutate one row slot.
    pub fn with_item<R>(&self, row: usize, change: impl FnOnce(&mut TableItem) -> R) -> Option<R> {
        self.items.borrow_mut().get_mut(row).map(change)
    }

    /// Cells of every row, for rendering.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.items.borrow().iter().map(TableItem::cells).collect()
    }

    /// Listen for live cell edits; the listener receives the row index.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn on_row_update(&self, listener: impl Fn(&usize) + 'static) -> Subscription {
        self.updates.subscribe("row", listener)
    }
}

/// Confirmation text listing every id to be removed.
#[must_use]
pub fn removal_prompt(ids: &[String]) -> String {
    ids.iter().fold(REMOVE_PROMPT.to_string(), |mut message, id| {
        message.push_str(" - ");
        message.push_str(id);
        message.push('\n');
        message
    })
}

/// Operator gestures common to remote and in-memory tables.
#[async_trait(?Send)]
pub trait TableActions {
    /// Shared paging/selection state.
    fn frame(&self) -> &TableFrame;

    /// Prompt capability used for confirmations and errors.
    fn notifier(&self) -> &dyn Notifier;

    /// Reload the current page and rebind every row slot.
    ///
    /// # Errors
    /// Returns the failure that was already reported to the operator.
    async fn render(&self) -> Result<(), UiError>;

    /// Open the edit dialog for the entry shown in `row`.
    ///
    /// # Errors
    /// Returns [`UiError::MissingEntity`] for an empty row or the reported load failure.
    async fn open(&self, row: usize) -> Result<(), UiError>;

    /// Open the add dialog with a blank form.
    fn add(&self);

    /// Remove entries by identity.
    ///
    /// # Errors
    /// Returns the first failure that was reported to the operator.
    async fn remove(&self, ids: Vec<String>) -> Result<(), UiError>;

    /// Operator pressed `action` in one of the table's dialogs.
    ///
    /// # Errors
    /// Returns the reported persistence failure.
    async fn dialog_action(&self, kind: DialogKind, action: &str) -> Result<(), UiError>;

    /// Operator typed into a dialog field.
    fn dialog_input(&self, kind: DialogKind, field: &str, value: String);

    /// Header close control of a dialog; same as cancelling.
    fn dialog_dismiss(&self, kind: DialogKind);

    /// Render-ready dialog state, if the table has that dialog.
    fn dialog_view(&self, kind: DialogKind) -> Option<DialogView>;

    /// Search submitted: show the first page of results.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn search(&self, filter: &str) -> Result<(), UiError> {
        self.frame().set_search(filter);
        self.frame().first();
        self.render().await
    }

    /// First-page control.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn first_page(&self) -> Result<(), UiError> {
        self.frame().first();
        self.render().await
    }

    /// Previous-page control.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn prev_page(&self) -> Result<(), UiError> {
        self.frame().prev();
        self.render().await
    }

    /// Next-page control.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn next_page(&self) -> Result<(), UiError> {
        self.frame().next();
        self.render().await
    }

    /// Last-page control.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn last_page(&self) -> Result<(), UiError> {
        self.frame().last();
        self.render().await
    }

    /// Page number submitted in the footer field.
    ///
    /// # Errors
    /// See [`TableActions::render`].
    async fn jump_to(&self, raw: &str) -> Result<(), UiError> {
        self.frame().jump(raw);
        self.render().await
    }

    /// Remove button: confirm the ticked rows, then remove them.
    ///
    /// Nothing happens when no populated row is ticked or the operator declines.
    ///
    /// # Errors
    /// See [`TableActions::remove`].
    async fn remove_selected(&self) -> Result<(), UiError> {
        let ids = self.frame().selected_ids();
        if ids.is_empty() {
            return Ok(());
        }
        if !self.notifier().confirm(&removal_prompt(&ids)) {
            tracing::debug!(count = ids.len(), "bulk remove declined");
            return Ok(());
        }
        self.remove(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_allocates_page_size_rows() {
        let frame = TableFrame::new(TableOptions::new("users", vec![Column::id()]).page_size(3));
        assert_eq!(frame.items().len(), 3);
        assert!(frame.rows().iter().all(|row| row == &vec![Cell::Id(None)]));
    }

    #[test]
    fn render_controls_updates_footer() {
        let frame = TableFrame::new(TableOptions::new("users", vec![Column::id()]));
        frame.toggle_all(true);
        frame.render_controls(12);
        assert_eq!(frame.total_pages(), 3);
        assert_eq!(frame.total_entries(), 12);
        assert_eq!(frame.page_field(), "1");
        assert!(!frame.select_all());
    }

    #[test]
    fn removal_prompt_lists_ids() {
        let prompt = removal_prompt(&["a".to_string(), "b".to_string()]);
        assert_eq!(
            prompt,
            "Are you sure you want to remove the following entries?\n - a\n - b\n"
        );
    }
}
