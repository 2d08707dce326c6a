//! Table bound to a remote REST collection.

use super::{DialogKind, DialogView, TableActions, TableFrame, TableOptions};
use crate::core::attributes;
use crate::core::collection::Collection;
use crate::core::dialog::Dialog;
use crate::core::error::UiError;
use crate::core::model::{Model, SaveOptions};
use crate::core::notify::Notifier;
use crate::core::query::QueryParams;
use crate::core::transport::Transport;
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;

/// Persistence work requested by a dialog button.
#[derive(Clone, Debug, PartialEq)]
pub enum TableIntent {
    /// Write the edit dialog back into this entity with `PATCH`.
    Update(Model),
    /// Create a new entity from the add dialog with `POST`.
    Create,
}

/// Shared handle to a dialog driven by a remote table.
pub(super) type TableDialog = Rc<RefCell<Dialog<TableIntent>>>;

/// Paged view of a remote collection with add, edit and bulk remove.
pub struct Table {
    frame: TableFrame,
    collection: Collection,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
    add_dialog: Option<TableDialog>,
    edit_dialog: Option<TableDialog>,
}

impl Table {
    /// Table over `collection`; call [`TableActions::render`] to load it.
    #[must_use]
    pub fn new(
        options: TableOptions,
        collection: Collection,
        transport: Rc<dyn Transport>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            frame: TableFrame::new(options),
            collection,
            transport,
            notifier,
            add_dialog: None,
            edit_dialog: None,
        }
    }

    /// Attach the dialog used by the add button.
    #[must_use]
    pub fn with_add_dialog(mut self, dialog: TableDialog) -> Self {
        self.add_dialog = Some(dialog);
        self
    }

    /// Attach the dialog used when a row link is clicked.
    #[must_use]
    pub fn with_edit_dialog(mut self, dialog: TableDialog) -> Self {
        self.edit_dialog = Some(dialog);
        self
    }

    /// Underlying collection.
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    fn dialog(&self, kind: DialogKind) -> Option<&TableDialog> {
        match kind {
            DialogKind::Add => self.add_dialog.as_ref(),
            DialogKind::Edit => self.edit_dialog.as_ref(),
        }
    }

    fn close(&self, kind: DialogKind) {
        if let Some(dialog) = self.dialog(kind) {
            dialog.borrow_mut().close();
        }
    }

    fn report(&self, err: &UiError) {
        tracing::warn!(table = self.frame.name(), error = %err, "request failed");
        self.notifier.alert(&format!("ERROR: {}", err.body_text()));
    }

    fn rebind_rows(&self) {
        let name = self.frame.name().to_string();
        for row in 0..self.frame.page_size() as usize {
            let model = self.collection.at(row);
            self.frame.with_item(row, |item| match &model {
                Some(model) => item.render_model(&name, model),
                None => item.reset(),
            });
        }
    }

    async fn update(&self, model: Model) -> Result<(), UiError> {
        let Some(dialog) = self.dialog(DialogKind::Edit) else {
            return Ok(());
        };
        let edited = dialog.borrow().attributes().clone();
        let changed = model.set(edited);
        if changed.is_empty() {
            tracing::debug!(id = ?model.id(), "no changes to save");
            return Ok(());
        }
        let options = SaveOptions {
            patch: true,
            wait: true,
        };
        match model.save(&*self.transport, Some(changed), options).await {
            Ok(()) => {
                let rendered = self.render().await;
                self.close(DialogKind::Edit);
                rendered
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn create(&self) -> Result<(), UiError> {
        let Some(dialog) = self.dialog(DialogKind::Add) else {
            return Ok(());
        };
        let entered = attributes::strip_empty(dialog.borrow().attributes());
        let model = self.collection.create_model();
        let options = SaveOptions {
            patch: false,
            wait: true,
        };
        match model.save(&*self.transport, Some(entered), options).await {
            Ok(()) => {
                let rendered = self.render().await;
                self.close(DialogKind::Add);
                rendered
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }
}

#[async_trait(?Send)]
impl TableActions for Table {
    fn frame(&self) -> &TableFrame {
        &self.frame
    }

    fn notifier(&self) -> &dyn Notifier {
        &*self.notifier
    }

    async fn render(&self) -> Result<(), UiError> {
        let params = QueryParams::new()
            .with("start", self.frame.start())
            .with("size", self.frame.page_size())
            .with("filter", self.frame.search());
        self.collection.query(params);
        match self.collection.fetch(&*self.transport).await {
            Ok(()) => {
                self.frame.render_controls(self.collection.total());
                self.rebind_rows();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(table = self.frame.name(), error = %err, "table fetch failed");
                self.notifier.alert(&err.status_text());
                Err(err)
            }
        }
    }

    async fn open(&self, row: usize) -> Result<(), UiError> {
        let model = self
            .frame
            .with_item(row, |item| item.model())
            .flatten()
            .ok_or_else(|| UiError::MissingEntity(format!("row {row}")))?;
        if let Err(err) = model.fetch(&*self.transport).await {
            self.report(&err);
            return Err(err);
        }
        let Some(dialog) = self.dialog(DialogKind::Edit) else {
            return Ok(());
        };
        let mut dialog = dialog.borrow_mut();
        dialog.set_attributes(model.attributes());
        dialog.handler("save", move |dialog: &mut Dialog<TableIntent>| {
            dialog.save();
            Some(TableIntent::Update(model.clone()))
        });
        dialog.open();
        Ok(())
    }

    fn add(&self) {
        let Some(dialog) = self.dialog(DialogKind::Add) else {
            return;
        };
        let mut dialog = dialog.borrow_mut();
        dialog.set_attributes(attributes::Attributes::new());
        dialog.handler("add", |dialog: &mut Dialog<TableIntent>| {
            dialog.save();
            Some(TableIntent::Create)
        });
        dialog.open();
    }

    async fn remove(&self, ids: Vec<String>) -> Result<(), UiError> {
        // Every delete settles before the single re-render.
        let mut failures = Vec::new();
        for id in &ids {
            let Some(model) = self.collection.get(id) else {
                tracing::warn!(id = %id, "selected entry is no longer on the page");
                continue;
            };
            match model.destroy(&*self.transport).await {
                Ok(()) => self.collection.remove(id),
                Err(err) => failures.push(err),
            }
        }
        if failures.is_empty() {
            return self.render().await;
        }
        for err in &failures {
            self.report(err);
        }
        Err(failures.swap_remove(0))
    }

    async fn dialog_action(&self, kind: DialogKind, action: &str) -> Result<(), UiError> {
        let Some(dialog) = self.dialog(kind) else {
            return Ok(());
        };
        let intent = dialog.borrow_mut().trigger(action);
        match intent {
            None => Ok(()),
            Some(TableIntent::Update(model)) => self.update(model).await,
            Some(TableIntent::Create) => self.create().await,
        }
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
