//! DOM-backed content container and browser prompts.

use crate::core::error::UiError;
use crate::core::navigation::ContentLoader;
use crate::core::notify::Notifier;
use crate::core::transport::HttpResponse;
use async_trait::async_trait;
use gloo::dialogs;
use gloo::utils::document;
use gloo_net::http::Request;

/// Notifier using `window.alert` and `window.confirm`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        dialogs::alert(message);
    }

    fn confirm(&self, message: &str) -> bool {
        dialogs::confirm(message)
    }
}

/// Replaces the markup of the element with id `container_id` by fetched fragments.
#[derive(Clone, Debug)]
pub struct FragmentLoader {
    container_id: String,
}

impl FragmentLoader {
    /// Loader writing into `#container_id`.
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }
}

#[async_trait(?Send)]
impl ContentLoader for FragmentLoader {
    async fn load(&self, url: &str) -> Result<(), UiError> {
        let fetched = Request::get(url)
            .send()
            .await
            .map_err(|err| UiError::Transport(err.to_string()))?;
        let status = fetched.status();
        let status_text = fetched.status_text();
        let body = fetched
            .text()
            .await
            .map_err(|err| UiError::Transport(err.to_string()))?;
        let response = HttpResponse::new(status, status_text, body);
        if !response.is_success() {
            return Err(UiError::from_response(&response));
        }
        let container = document()
            .get_element_by_id(&self.container_id)
            .ok_or_else(|| UiError::MissingEntity(format!("#{}", self.container_id)))?;
        container.set_inner_html(&response.body);
        Ok(())
    }
}
