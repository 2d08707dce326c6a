//! HTTP transport seam used by models and collections.
//!
//! # Design
//! - Widgets build plain request values; the browser adapter performs them.
//! - Status classification lives here, not in widget error handlers.

use crate::core::error::UiError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP methods issued by the widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Read a resource or collection page.
    Get,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Upper-case method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request produced by a model or collection.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute or root-relative URL.
    pub url: String,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Build a body-less request.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response handed back by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase.
    pub status_text: String,
    /// Raw body text.
    pub body: String,
}

/// Classified result of a response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseOutcome {
    /// Success with a JSON body.
    Parsed(Value),
    /// Success without a usable JSON body (empty, or text on 200/201).
    Accepted,
    /// Failure status.
    Failed(UiError),
}

impl HttpResponse {
    /// Build a response value.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Classify the response.
    ///
    /// Some PKI services answer a create or update with 200/201 and a non-JSON
    /// body; those are successes without server attributes.
    #[must_use]
    pub fn outcome(&self) -> ResponseOutcome {
        if !self.is_success() {
            return ResponseOutcome::Failed(UiError::from_response(self));
        }
        if self.body.trim().is_empty() {
            return ResponseOutcome::Accepted;
        }
        match serde_json::from_str::<Value>(&self.body) {
            Ok(value) => ResponseOutcome::Parsed(value),
            Err(err) => {
                tracing::debug!(status = self.status, error = %err, "accepted non-JSON success body");
                ResponseOutcome::Accepted
            }
        }
    }

    /// Decode a JSON body, failing on non-2xx or unparseable payloads.
    ///
    /// # Errors
    /// Returns [`UiError::Status`] for failure statuses and [`UiError::Decode`]
    /// when the body is not JSON.
    pub fn json(&self) -> Result<Value, UiError> {
        if !self.is_success() {
            return Err(UiError::from_response(self));
        }
        serde_json::from_str(&self.body).map_err(|err| UiError::Decode(err.to_string()))
    }
}

/// Performs HTTP requests on behalf of the widgets.
///
/// Browser futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait Transport {
    /// Send a request and return whatever the server answered.
    ///
    /// # Errors
    /// Returns [`UiError::Transport`] only when no response was received;
    /// HTTP failure statuses are returned as responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UiError>;
}

#[cfg(test)]
mod tests {
    use super::{HttpResponse, ResponseOutcome};
    use serde_json::json;

    #[test]
    fn created_with_text_body_is_accepted() {
        let response = HttpResponse::new(201, "Created", "user created");
        assert_eq!(response.outcome(), ResponseOutcome::Accepted);
    }

    #[test]
    fn ok_with_json_body_is_parsed() {
        let response = HttpResponse::new(200, "OK", r#"{"id":"admin"}"#);
        assert_eq!(response.outcome(), ResponseOutcome::Parsed(json!({"id": "admin"})));
    }

    #[test]
    fn not_found_is_a_failure() {
        let response = HttpResponse::new(404, "Not Found", "missing");
        assert!(matches!(response.outcome(), ResponseOutcome::Failed(_)));
        assert!(response.json().is_err());
    }

    #[test]
    fn empty_no_content_is_accepted() {
        assert_eq!(
            HttpResponse::new(204, "No Content", "").outcome(),
            ResponseOutcome::Accepted
        );
    }
}
