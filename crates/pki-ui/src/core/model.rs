//! Single remote entity bound to a REST resource.
//!
//! # Design
//! - Entity-specific wire shapes are supplied through an [`EntityCodec`]
//!   strategy instead of subclassing.
//! - `Model` is a cheap handle; rows, dialogs and collections share one entity.
//! - Field changes are published as `change:<field>` events.

use crate::core::attributes::{self, Attributes};
use crate::core::error::UiError;
use crate::core::events::{Emitter, Subscription};
use crate::core::transport::{HttpRequest, Method, ResponseOutcome, Transport};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Converts between local attribute bags and an entity's wire payloads.
pub trait EntityCodec {
    /// Turn a server response into local attributes.
    fn parse_response(&self, response: Value) -> Attributes {
        match response {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }

    /// Turn local attributes into the request body.
    fn create_request(&self, attributes: &Attributes) -> Value {
        Value::Object(attributes.clone())
    }
}

/// Codec that passes attributes through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityCodec;

impl EntityCodec for IdentityCodec {}

/// Persistence options for [`Model::save`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Send only the given attributes with `PATCH`.
    pub patch: bool,
    /// Apply attributes locally only after the server confirms.
    pub wait: bool,
}

struct ModelInner {
    url_root: String,
    id_attribute: String,
    attributes: RefCell<Attributes>,
    codec: Rc<dyn EntityCodec>,
    events: Emitter<Value>,
}

/// Shared handle to one remote entity.
#[derive(Clone)]
pub struct Model {
    inner: Rc<ModelInner>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("url_root", &self.inner.url_root)
            .field("attributes", &self.inner.attributes.borrow())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Model {
    /// New, unsaved entity under `url_root`.
    #[must_use]
    pub fn new(url_root: impl Into<String>, codec: Rc<dyn EntityCodec>) -> Self {
        Self {
            inner: Rc::new(ModelInner {
                url_root: url_root.into(),
                id_attribute: "id".to_string(),
                attributes: RefCell::new(Attributes::new()),
                codec,
                events: Emitter::new(),
            }),
        }
    }

    /// Entity pre-populated with attributes (for example a parsed list entry).
    #[must_use]
    pub fn with_attributes(
        url_root: impl Into<String>,
        codec: Rc<dyn EntityCodec>,
        attributes: Attributes,
    ) -> Self {
        let model = Self::new(url_root, codec);
        *model.inner.attributes.borrow_mut() = attributes;
        model
    }

    /// Server-assigned identity, if any.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        let text = attributes::value_text(self.inner.attributes.borrow().get(&self.inner.id_attribute));
        (!text.is_empty()).then_some(text)
    }

    /// Whether the server has not assigned an identity yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Read one attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.attributes.borrow().get(name).cloned()
    }

    /// Read one attribute as display text.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        attributes::value_text(self.inner.attributes.borrow().get(name))
    }

    /// Copy of every attribute.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.inner.attributes.borrow().clone()
    }

    /// Resource URL: the root for new entities, `root/<id>` otherwise.
    #[must_use]
    pub fn url(&self) -> String {
        let root = &self.inner.url_root;
        match self.id() {
            None => root.clone(),
            Some(id) => format!("{}/{}", root.trim_end_matches('/'), urlencoding::encode(&id)),
        }
    }

    /// Merge `attributes` in and return the fields that changed.
    ///
    /// Emits `change:<field>` for each changed field and `change` once when
    /// anything changed.
    pub fn set(&self, attributes: Attributes) -> Attributes {
        let changed = {
            let mut current = self.inner.attributes.borrow_mut();
            let changed = attributes::diff(&current, &attributes);
            for (name, value) in &changed {
                current.insert(name.clone(), value.clone());
            }
            changed
        };
        for (name, value) in &changed {
            self.inner.events.emit(&format!("change:{name}"), value);
        }
        if !changed.is_empty() {
            self.inner.events.emit("change", &Value::Object(changed.clone()));
        }
        changed
    }

    /// Remove every attribute.
    pub fn clear(&self) {
        let removed: Vec<String> = {
            let mut current = self.inner.attributes.borrow_mut();
            let names = current.keys().cloned().collect();
            current.clear();
            names
        };
        for name in &removed {
            self.inner.events.emit(&format!("change:{name}"), &Value::Null);
        }
    }

    /// Listen for changes of one field; the listener receives the new value.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn on_change(&self, field: &str, listener: impl Fn(&Value) + 'static) -> Subscription {
        self.inner.events.subscribe(format!("change:{field}"), listener)
    }

    /// Reload the entity from the server.
    ///
    /// # Errors
    /// Returns the transport, status or decode failure.
    pub async fn fetch(&self, transport: &dyn Transport) -> Result<(), UiError> {
        let response = transport
            .send(HttpRequest::new(Method::Get, self.url()))
            .await?;
        let parsed = self.inner.codec.parse_response(response.json()?);
        self.set(parsed);
        Ok(())
    }

    /// Persist the entity.
    ///
    /// Uses the current attributes when `attributes` is `None`. A new entity is
    /// cleared before the request so the server response fully replaces local
    /// state. New entities are `POST`ed to the root; existing ones are `PATCH`ed
    /// or `PUT` depending on `options.patch`.
    ///
    /// # Errors
    /// Returns the transport or status failure; local attributes are left as
    /// they were before the call when `options.wait` is set.
    pub async fn save(
        &self,
        transport: &dyn Transport,
        attributes: Option<Attributes>,
        options: SaveOptions,
    ) -> Result<(), UiError> {
        let attributes = attributes.unwrap_or_else(|| self.attributes());
        let body = self.inner.codec.create_request(&attributes);
        let is_new = self.is_new();
        let url = self.url();
        let method = if is_new {
            Method::Post
        } else if options.patch {
            Method::Patch
        } else {
            Method::Put
        };
        if is_new {
            self.clear();
        }
        if !options.wait {
            self.set(attributes.clone());
        }

        tracing::debug!(%method, %url, "saving entity");
        let response = transport
            .send(HttpRequest::new(method, url).with_body(body))
            .await?;
        match response.outcome() {
            ResponseOutcome::Parsed(value) => {
                if options.wait {
                    self.set(attributes);
                }
                let server = self.inner.codec.parse_response(value);
                self.set(server);
                Ok(())
            }
            ResponseOutcome::Accepted => {
                tracing::debug!(status = response.status, "save accepted without entity body");
                if options.wait {
                    self.set(attributes);
                }
                Ok(())
            }
            ResponseOutcome::Failed(err) => Err(err),
        }
    }

    /// Delete the entity on the server. New entities have nothing to delete.
    ///
    /// # Errors
    /// Returns the transport or status failure.
    pub async fn destroy(&self, transport: &dyn Transport) -> Result<(), UiError> {
        if self.is_new() {
            return Ok(());
        }
        let url = self.url();
        tracing::debug!(%url, "deleting entity");
        let response = transport
            .send(HttpRequest::new(Method::Delete, url))
            .await?;
        match response.outcome() {
            ResponseOutcome::Failed(err) => Err(err),
            ResponseOutcome::Parsed(_) | ResponseOutcome::Accepted => Ok(()),
        }
    }
}
