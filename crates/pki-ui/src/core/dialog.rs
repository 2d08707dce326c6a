//! Modal add/edit form bound to a transient attribute bag.
//!
//! # Design
//! - The form is described by its field and button names; views render it.
//! - Button handlers are registered per invocation and return an intent `A`
//!   for the owning widget to execute, so persistence stays out of the dialog.
//! - Buttons are bound on open and unbound on close so handlers never double up.

use crate::core::attributes::{self, Attributes};
use crate::core::events::{Emitter, Subscription};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Handler invoked when a dialog button is pressed.
pub type DialogHandler<A> = Rc<dyn Fn(&mut Dialog<A>) -> Option<A>>;

/// Static description of a dialog form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Heading shown when the dialog opens.
    pub title: Option<String>,
    /// Input field names in display order.
    pub fields: Vec<String>,
    /// Button (action) names declared by the form.
    pub buttons: Vec<String>,
    /// Fields rendered read-only.
    pub readonly: Vec<String>,
    /// Buttons to show; every declared button when `None`.
    pub actions: Option<Vec<String>>,
}

/// One input of the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Attribute name backing the input.
    pub name: String,
    /// Current input text.
    pub value: String,
    /// Whether the operator may edit the input.
    pub readonly: bool,
}

/// One action button of the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    /// Action name.
    pub name: String,
    /// Whether the button is shown.
    pub visible: bool,
    /// Whether a click is currently dispatched to the handler.
    pub bound: bool,
}

/// Render-ready copy of a dialog's state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogView {
    /// Heading text.
    pub title: Option<String>,
    /// Inputs in display order.
    pub fields: Vec<Field>,
    /// Buttons in display order.
    pub buttons: Vec<Button>,
    /// Whether the dialog is shown.
    pub open: bool,
}

/// Modal form state.
pub struct Dialog<A> {
    title: Option<String>,
    readonly: Vec<String>,
    actions: Vec<String>,
    fields: Vec<Field>,
    buttons: Vec<Button>,
    attributes: Attributes,
    handlers: BTreeMap<String, DialogHandler<A>>,
    open: bool,
    events: Emitter<()>,
}

impl<A> fmt::Debug for Dialog<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("title", &self.title)
            .field("fields", &self.fields)
            .field("buttons", &self.buttons)
            .field("attributes", &self.attributes)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl<A: 'static> Dialog<A> {
    /// Closed dialog with a `cancel` handler that closes it.
    #[must_use]
    pub fn new(options: DialogOptions) -> Self {
        let actions = options
            .actions
            .unwrap_or_else(|| options.buttons.clone());
        let fields = options
            .fields
            .into_iter()
            .map(|name| Field {
                name,
                value: String::new(),
                readonly: false,
            })
            .collect();
        let buttons = options
            .buttons
            .into_iter()
            .map(|name| Button {
                name,
                visible: false,
                bound: false,
            })
            .collect();
        let mut dialog = Self {
            title: options.title,
            readonly: options.readonly,
            actions,
            fields,
            buttons,
            attributes: Attributes::new(),
            handlers: BTreeMap::new(),
            open: false,
            events: Emitter::new(),
        };
        dialog.handler("cancel", |dialog: &mut Self| {
            dialog.close();
            None
        });
        dialog
    }

    /// Register (or replace) the handler for an action button.
    pub fn handler(&mut self, action: impl Into<String>, handler: impl Fn(&mut Self) -> Option<A> + 'static) {
        self.handlers.insert(action.into(), Rc::new(handler));
    }

    /// Heading text.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether the dialog is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Inputs in display order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up one input.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Buttons in display order.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Attribute bag backing the form.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Replace the attribute bag (before opening).
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    /// Apply read-only flags and button bindings, load the fields and show.
    pub fn open(&mut self) {
        for field in &mut self.fields {
            field.readonly = self.readonly.contains(&field.name);
        }
        for button in &mut self.buttons {
            let active = self.actions.contains(&button.name);
            button.visible = active;
            button.bound = active;
        }
        self.load();
        self.open = true;
    }

    /// Hide, unbind every button and emit `close`.
    pub fn close(&mut self) {
        self.open = false;
        for button in &mut self.buttons {
            button.bound = false;
        }
        self.events.emit("close", &());
    }

    /// Copy attribute values into the inputs; missing values become blank.
    pub fn load(&mut self) {
        for field in &mut self.fields {
            field.value = attributes::value_text(self.attributes.get(&field.name));
        }
    }

    /// Copy input values back into the attribute bag.
    pub fn save(&mut self) {
        for field in &self.fields {
            self.attributes
                .insert(field.name.clone(), Value::String(field.value.clone()));
        }
    }

    /// Operator typed into an input. Read-only and unknown fields are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) if !field.readonly => {
                field.value = value.into();
                true
            }
            _ => false,
        }
    }

    /// Operator pressed an action button; returns the handler's intent.
    pub fn trigger(&mut self, action: &str) -> Option<A> {
        let bound = self
            .buttons
            .iter()
            .any(|button| button.name == action && button.bound);
        if !self.open || !bound {
            tracing::debug!(action, "ignoring unbound dialog action");
            return None;
        }
        let handler = self.handlers.get(action).cloned()?;
        handler(self)
    }

    /// The header close control; same as cancelling.
    pub fn dismiss(&mut self) {
        if self.open {
            self.close();
        }
    }

    /// Copy of the state a view needs to draw the dialog.
    #[must_use]
    pub fn view(&self) -> DialogView {
        DialogView {
            title: self.title.clone(),
            fields: self.fields.clone(),
            buttons: self.buttons.clone(),
            open: self.open,
        }
    }

    /// Listen for the dialog closing.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn on_close(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.events.subscribe("close", listener)
    }
}
