//! REST transport over `fetch`.

use crate::core::error::UiError;
use crate::core::transport::{HttpRequest, HttpResponse, Method, Transport};
use async_trait::async_trait;
use gloo_net::http::Request;

/// [`Transport`] backed by gloo-net.
#[derive(Clone, Debug, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    /// Transport using the page's origin and cookies.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn request(method: Method, url: &str) -> Request {
    let request = match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    };
    request.header("Accept", "application/json")
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, http: HttpRequest) -> Result<HttpResponse, UiError> {
        let mut req = request(http.method, &http.url);
        if let Some(body) = &http.body {
            req = req
                .json(body)
                .map_err(|err| UiError::Transport(err.to_string()))?;
        }
        let response = req
            .send()
            .await
            .map_err(|err| UiError::Transport(err.to_string()))?;
        let status = response.status();
        let status_text = response.status_text();
        let body = response
            .text()
            .await
            .map_err(|err| UiError::Transport(err.to_string()))?;
        tracing::debug!(method = %http.method, url = %http.url, status, "request finished");
        Ok(HttpResponse::new(status, status_text, body))
    }
}
