//! Error type shared by the console widgets.
//!
//! # Design
//! - Keep transport failures, HTTP status failures and decode failures distinct.
//! - Expose the exact strings shown to the operator so views never format errors.

use crate::core::transport::HttpResponse;
use thiserror::Error;

/// Errors raised by models, collections, tables and navigation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("request failed with {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// HTTP reason phrase.
        status_text: String,
        /// Raw response body.
        body: String,
    },
    /// A response body could not be decoded.
    #[error("invalid response payload: {0}")]
    Decode(String),
    /// Navigation was asked to load a page that is not registered.
    #[error("Invalid page: {0}")]
    UnknownPage(String),
    /// An operation referenced an entity the widget does not hold.
    #[error("unknown entry: {0}")]
    MissingEntity(String),
    /// Console configuration could not be read.
    #[error("invalid console configuration: {0}")]
    Config(String),
}

impl UiError {
    /// Build a status error from a failed response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::Status {
            status: response.status,
            status_text: response.status_text.clone(),
            body: response.body.clone(),
        }
    }

    /// Text shown when a table fetch fails.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Status { status_text, .. } => status_text.clone(),
            Self::Transport(message) | Self::Decode(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Raw body shown when a mutation fails.
    #[must_use]
    pub fn body_text(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            Self::Transport(message) | Self::Decode(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UiError;
    use crate::core::transport::HttpResponse;

    #[test]
    fn status_error_exposes_reason_and_body() {
        let err = UiError::from_response(&HttpResponse::new(404, "Not Found", "no such user"));
        assert_eq!(err.status_text(), "Not Found");
        assert_eq!(err.body_text(), "no such user");
    }

    #[test]
    fn unknown_page_formats_like_the_alert() {
        assert_eq!(
            UiError::UnknownPage("audit".to_string()).to_string(),
            "Invalid page: audit"
        );
    }
}
