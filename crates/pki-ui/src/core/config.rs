//! Console settings read from the host page.

use crate::core::error::UiError;
use crate::core::table::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

/// Element id of the inline JSON settings block.
pub const CONFIG_ELEMENT_ID: &str = "pki-ui-config";

/// Console settings; every key is optional.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Prefix prepended to every REST path, e.g. `https://pki.example.com:8443`.
    pub api_base_url: String,
    /// Rows per table page; zero is treated as one.
    pub page_size: u32,
    /// Page loaded when the console starts.
    pub home_page: Option<String>,
    /// `tracing` filter directive.
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            home_page: None,
            log_level: "info".to_string(),
        }
    }
}

impl UiConfig {
    /// Parse the settings document; blank input yields the defaults.
    ///
    /// # Errors
    /// Returns [`UiError::Config`] when the document is not valid JSON for
    /// these settings.
    pub fn from_json(raw: &str) -> Result<Self, UiError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|err| UiError::Config(err.to_string()))
    }

    /// Page size with zero clamped to one.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        if self.page_size == 0 { 1 } else { self.page_size }
    }

    /// Absolute URL for a REST path.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url.trim_end_matches('/'))
    }
}
