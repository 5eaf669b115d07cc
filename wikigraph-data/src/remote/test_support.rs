//! In-memory stand-ins for the remote collaborators.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};

use serde_json::Value;
use wikigraph_core::EntityId;

use super::{EntitySource, RemoteError, SparqlEndpoint};

/// [`EntitySource`] answering from a fixed table of documents.
///
/// Unknown ids answer with a 404 [`RemoteError::BadResponse`].
#[derive(Debug, Default)]
pub struct StubEntitySource {
    documents: HashMap<String, Value>,
    requests: RefCell<Vec<String>>,
}

impl StubEntitySource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` for `id`.
    #[must_use]
    pub fn with_document(mut self, id: &str, document: Value) -> Self {
        self.documents.insert(id.to_owned(), document);
        self
    }

    /// Ids requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl EntitySource for StubEntitySource {
    fn fetch_entity(&self, id: &EntityId) -> Result<Value, RemoteError> {
        self.requests.borrow_mut().push(id.to_string());
        self.documents
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RemoteError::BadResponse {
                url: format!("stub://{id}.json"),
                status: 404,
                headers: Vec::new(),
                body: format!("no stub document for {id}"),
            })
    }
}

/// [`SparqlEndpoint`] replaying queued results.
///
/// An exhausted queue answers with a 500 [`RemoteError::BadResponse`].
#[derive(Debug, Default)]
pub struct StubSparqlEndpoint {
    results: RefCell<VecDeque<Value>>,
    queries: RefCell<Vec<String>>,
}

impl StubSparqlEndpoint {
    /// An endpoint with no queued results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `result` for the next query.
    #[must_use]
    pub fn with_result(self, result: Value) -> Self {
        self.results.borrow_mut().push_back(result);
        self
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl SparqlEndpoint for StubSparqlEndpoint {
    fn run_query(&self, query: &str) -> Result<Value, RemoteError> {
        self.queries.borrow_mut().push(query.to_owned());
        self.results
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RemoteError::BadResponse {
                url: "stub://sparql".to_owned(),
                status: 500,
                headers: Vec::new(),
                body: "no queued result".to_owned(),
            })
    }
}
