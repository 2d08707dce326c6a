//! Paged, filterable list of remote entities.
//!
//! # Design
//! - The collection only owns URL state and response parsing; the transport
//!   performs the request.
//! - Response shapes differ per resource, so extraction goes through a
//!   [`CollectionCodec`] strategy.
//! - Links are replaced wholesale on every parse.

use crate::core::attributes::Attributes;
use crate::core::error::UiError;
use crate::core::model::{EntityCodec, Model};
use crate::core::query::QueryParams;
use crate::core::transport::{HttpRequest, Method, Transport};
use pki_ui_models::Link;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Extracts totals, links and entries from collection responses.
pub trait CollectionCodec {
    /// Total number of matching entries; reads `total` by default.
    fn total(&self, response: &Value) -> u64 {
        match response.get("total") {
            Some(Value::Number(number)) => number.as_u64().unwrap_or_default(),
            Some(Value::String(text)) => text.trim().parse().unwrap_or_default(),
            _ => 0,
        }
    }

    /// Raw link section (object or array); none by default.
    fn links(&self, _response: &Value) -> Option<Value> {
        None
    }

    /// Raw entry section (object or array); none by default.
    fn entries(&self, _response: &Value) -> Option<Value> {
        None
    }

    /// Convert one raw entry into model attributes; none by default.
    fn parse_entry(&self, _entry: Value) -> Option<Attributes> {
        None
    }
}

const ENTRIES_KEY: &str = "entries";
const LINKS_KEY: &str = "Link";

/// Codec for the `{total, entries, Link}` envelope used by PKI REST services.
#[derive(Clone)]
pub struct EnvelopeCodec {
    entity: Rc<dyn EntityCodec>,
}

impl EnvelopeCodec {
    /// Envelope whose entries are parsed with the entity's own codec.
    #[must_use]
    pub fn new(entity: Rc<dyn EntityCodec>) -> Self {
        Self { entity }
    }
}

impl CollectionCodec for EnvelopeCodec {
    fn links(&self, response: &Value) -> Option<Value> {
        response.get(LINKS_KEY).cloned()
    }

    fn entries(&self, response: &Value) -> Option<Value> {
        response.get(ENTRIES_KEY).cloned()
    }

    fn parse_entry(&self, entry: Value) -> Option<Attributes> {
        let attributes = self.entity.parse_response(entry);
        (!attributes.is_empty()).then_some(attributes)
    }
}

/// Static configuration of a collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionOptions {
    /// Resource root, e.g. `/rest/admin/users`.
    pub url_root: String,
    /// Query parameters applied when a query leaves them unset.
    pub defaults: QueryParams,
}

impl CollectionOptions {
    /// Options with no default parameters.
    #[must_use]
    pub fn new(url_root: impl Into<String>) -> Self {
        Self {
            url_root: url_root.into(),
            defaults: QueryParams::new(),
        }
    }
}

#[derive(Default)]
struct CollectionState {
    current_url: String,
    links: BTreeMap<String, String>,
    total: u64,
    models: Vec<Model>,
}

/// Paged list of entities fetched from a REST collection.
pub struct Collection {
    options: CollectionOptions,
    codec: Rc<dyn CollectionCodec>,
    entity: Rc<dyn EntityCodec>,
    state: RefCell<CollectionState>,
}

impl Collection {
    /// Collection pointing at the unfiltered root query.
    #[must_use]
    pub fn new(
        options: CollectionOptions,
        codec: Rc<dyn CollectionCodec>,
        entity: Rc<dyn EntityCodec>,
    ) -> Self {
        let collection = Self {
            options,
            codec,
            entity,
            state: RefCell::new(CollectionState::default()),
        };
        collection.query(QueryParams::new());
        collection
    }

    /// Resource root.
    #[must_use]
    pub fn url_root(&self) -> &str {
        &self.options.url_root
    }

    /// URL the next fetch will read.
    #[must_use]
    pub fn url(&self) -> String {
        self.state.borrow().current_url.clone()
    }

    /// Point the next fetch at `url_root` plus `params` merged over the defaults.
    pub fn query(&self, params: QueryParams) {
        let query = params.with_defaults(&self.options.defaults).to_query_string();
        let url = format!("{}{query}", self.options.url_root);
        tracing::debug!(%url, "collection query");
        self.state.borrow_mut().current_url = url;
    }

    /// Extract total, links and entry attributes from a response.
    pub fn parse(&self, response: &Value) -> Vec<Attributes> {
        let total = self.codec.total(response);
        let links: BTreeMap<String, String> = one_or_many(self.codec.links(response))
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<Link>(raw).ok())
            .map(|link| (link.rel, link.href))
            .collect();
        {
            let mut state = self.state.borrow_mut();
            state.total = total;
            state.links = links;
        }
        one_or_many(self.codec.entries(response))
            .into_iter()
            .filter_map(|entry| self.codec.parse_entry(entry))
            .collect()
    }

    /// Href of a named link from the last response.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<String> {
        self.state.borrow().links.get(name).cloned()
    }

    /// Every link from the last response.
    #[must_use]
    pub fn links(&self) -> BTreeMap<String, String> {
        self.state.borrow().links.clone()
    }

    /// Follow a named link on the next fetch; unknown names are ignored.
    pub fn go(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(href) = state.links.get(name).cloned() {
            state.current_url = href;
        } else {
            tracing::debug!(link = name, "ignoring unknown collection link");
        }
    }

    /// Total reported by the last response.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.state.borrow().total
    }

    /// Number of entities on the current page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().models.len()
    }

    /// Whether the current page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entity at a position on the current page.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<Model> {
        self.state.borrow().models.get(index).cloned()
    }

    /// Entity on the current page with the given identity.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Model> {
        self.state
            .borrow()
            .models
            .iter()
            .find(|model| model.id().as_deref() == Some(id))
            .cloned()
    }

    /// Drop an entity from the current page.
    pub fn remove(&self, id: &str) {
        self.state
            .borrow_mut()
            .models
            .retain(|model| model.id().as_deref() != Some(id));
    }

    /// Fresh, unsaved entity of this collection's kind.
    #[must_use]
    pub fn create_model(&self) -> Model {
        Model::new(self.options.url_root.clone(), Rc::clone(&self.entity))
    }

    /// Fetch the current URL and replace the page contents.
    ///
    /// # Errors
    /// Returns the transport, status or decode failure; the previous page is
    /// kept on failure.
    pub async fn fetch(&self, transport: &dyn Transport) -> Result<(), UiError> {
        let url = self.url();
        let response = transport.send(HttpRequest::new(Method::Get, url)).await?;
        let body = response.json()?;
        let models: Vec<Model> = self
            .parse(&body)
            .into_iter()
            .map(|attributes| {
                Model::with_attributes(
                    self.options.url_root.clone(),
                    Rc::clone(&self.entity),
                    attributes,
                )
            })
            .collect();
        tracing::debug!(entries = models.len(), total = self.total(), "collection fetched");
        self.state.borrow_mut().models = models;
        Ok(())
    }
}

fn one_or_many(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::IdentityCodec;
    use crate::core::testing::{MockTransport, attrs};
    use serde_json::json;

    fn users() -> Collection {
        let entity: Rc<dyn EntityCodec> = Rc::new(IdentityCodec);
        Collection::new(
            CollectionOptions::new("/rest/admin/users"),
            Rc::new(EnvelopeCodec::new(Rc::clone(&entity))),
            entity,
        )
    }

    struct BareCodec;
    impl CollectionCodec for BareCodec {}

    #[test]
    fn default_codec_reads_total_only() {
        let entity: Rc<dyn EntityCodec> = Rc::new(IdentityCodec);
        let collection = Collection::new(
            CollectionOptions::new("/rest/things"),
            Rc::new(BareCodec),
            entity,
        );
        let parsed = collection.parse(&json!({"total": 4, "entries": [{"id": "a"}]}));
        assert!(parsed.is_empty());
        assert_eq!(collection.total(), 4);
        assert!(collection.links().is_empty());
    }

    #[test]
    fn query_merges_defaults_and_skips_blank() {
        let entity: Rc<dyn EntityCodec> = Rc::new(IdentityCodec);
        let options = CollectionOptions {
            url_root: "/rest/certs".to_string(),
            defaults: QueryParams::new().with("status", "VALID").with("size", 20),
        };
        let collection = Collection::new(options, Rc::new(BareCodec), entity);
        assert_eq!(collection.url(), "/rest/certs?status=VALID&size=20");
        collection.query(QueryParams::new().with("start", 0).with("size", 5).with("filter", ""));
        assert_eq!(collection.url(), "/rest/certs?start=0&size=5&status=VALID");
    }

    #[test]
    fn parse_normalizes_single_entry_and_links() {
        let collection = users();
        let parsed = collection.parse(&json!({
            "total": 1,
            "entries": {"id": "admin"},
            "Link": {"rel": "next", "href": "/rest/admin/users?start=5"}
        }));
        assert_eq!(parsed, vec![attrs(json!({"id": "admin"}))]);
        assert_eq!(collection.link("next").as_deref(), Some("/rest/admin/users?start=5"));
    }

    #[test]
    fn links_are_replaced_on_each_parse() {
        let collection = users();
        collection.parse(&json!({"total": 9, "Link": [
            {"rel": "next", "href": "/n"}, {"rel": "prev", "href": "/p"}
        ]}));
        collection.parse(&json!({"total": 9, "Link": [{"rel": "prev", "href": "/p2"}]}));
        assert_eq!(collection.link("next"), None);
        assert_eq!(collection.link("prev").as_deref(), Some("/p2"));
    }

    #[test]
    fn go_follows_known_links_only() {
        let collection = users();
        collection.parse(&json!({"total": 9, "Link": [{"rel": "next", "href": "/rest/admin/users?start=5"}]}));
        collection.go("last");
        assert_eq!(collection.url(), "/rest/admin/users");
        collection.go("next");
        assert_eq!(collection.url(), "/rest/admin/users?start=5");
    }

    #[tokio::test]
    async fn fetch_replaces_models() {
        let transport = MockTransport::new();
        transport.respond_json(200, &json!({"total": 2, "entries": [{"id": "a"}, {"id": "b"}]}));
        transport.respond_json(200, &json!({"total": 1, "entries": [{"id": "c"}]}));
        let collection = users();
        collection.fetch(&transport).await.expect("first fetch");
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("b").and_then(|m| m.id()).as_deref(), Some("b"));
        collection.fetch(&transport).await.expect("second fetch");
        assert_eq!(collection.len(), 1);
        assert!(collection.get("a").is_none());
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_page() {
        let transport = MockTransport::new();
        transport.respond_json(200, &json!({"total": 1, "entries": [{"id": "a"}]}));
        transport.fail("offline");
        let collection = users();
        collection.fetch(&transport).await.expect("first fetch");
        let err = collection.fetch(&transport).await.expect_err("second fetch fails");
        assert_eq!(err, UiError::Transport("offline".to_string()));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn created_models_share_the_root() {
        let model = users().create_model();
        assert!(model.is_new());
        assert_eq!(model.url(), "/rest/admin/users");
    }
}
