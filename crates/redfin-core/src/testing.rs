//! In-memory connector for tests
//!
//! Serves documents from a map, records every call, and implements both
//! [`Connector`] and [`PublicConnector`].

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::connector::{Connector, Credentials, PostResponse, PublicConnector};
use crate::error::TransportError;

#[derive(Debug, Default)]
pub struct MockConnector {
    documents: RefCell<HashMap<String, Value>>,
    post_responses: RefCell<HashMap<String, PostResponse>>,
    calls: RefCell<Vec<String>>,
    credentials: RefCell<Option<Credentials>>,
    fail_deletes: Cell<bool>,
    closed: Cell<usize>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, document: Value) {
        self.documents.borrow_mut().insert(path.to_string(), document);
    }

    pub fn remove(&self, path: &str) {
        self.documents.borrow_mut().remove(path);
    }

    /// Answer POSTs to `path` with `response`; unknown paths answer 404
    pub fn respond_to_post(&self, path: &str, response: PostResponse) {
        self.post_responses
            .borrow_mut()
            .insert(path.to_string(), response);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.set(fail);
    }

    /// Every call so far, formatted as `METHOD path`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn get_count(&self, path: &str) -> usize {
        let call = format!("GET {path}");
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.borrow().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closed.get()
    }

    fn record(&self, method: &str, path: &str) {
        self.calls.borrow_mut().push(format!("{method} {path}"));
    }

    fn not_found(method: &'static str, path: &str) -> TransportError {
        TransportError::Http {
            method,
            url: path.to_string(),
            status: 404,
            body: String::new(),
        }
    }

    fn read(&self, path: &str) -> Result<Value, TransportError> {
        self.record("GET", path);
        self.documents
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found("GET", path))
    }
}

impl Connector for MockConnector {
    fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.read(path)
    }

    fn post(&self, path: &str, _body: &Value) -> Result<PostResponse, TransportError> {
        self.record("POST", path);
        self.post_responses
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found("POST", path))
    }

    fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.record("DELETE", path);
        if self.fail_deletes.get() {
            return Err(TransportError::Connection {
                url: path.to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.borrow_mut() = credentials;
    }

    fn close(&self) {
        self.closed.set(self.closed.get() + 1);
    }
}

impl PublicConnector for MockConnector {
    fn get(&self, url: &str) -> Result<Value, TransportError> {
        self.read(url)
    }
}
