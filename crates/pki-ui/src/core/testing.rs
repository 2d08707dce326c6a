//! Scripted transport and notifier doubles for unit tests.

use crate::core::attributes::Attributes;
use crate::core::error::UiError;
use crate::core::notify::Notifier;
use crate::core::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Object literal to attribute bag.
pub(crate) fn attrs(value: Value) -> Attributes {
    value.as_object().cloned().unwrap_or_default()
}

/// Transport answering from a FIFO of scripted responses.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, UiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub(crate) fn respond_json(&self, status: u16, body: &Value) {
        self.respond(HttpResponse::new(status, "OK", body.to_string()));
    }

    pub(crate) fn fail(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(UiError::Transport(message.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn pending(&self) -> usize {
        self.responses.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(UiError::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.url
            )))
        })
    }
}

/// Notifier that records prompts and answers confirmations from a flag.
pub(crate) struct RecordingNotifier {
    alerts: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
    answer: Cell<bool>,
}

impl RecordingNotifier {
    pub(crate) fn new(answer: bool) -> Self {
        Self {
            alerts: RefCell::new(Vec::new()),
            prompts: RefCell::new(Vec::new()),
            answer: Cell::new(answer),
        }
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answer.get()
    }
}
