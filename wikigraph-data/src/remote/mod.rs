//! Blocking clients for the Wikidata linked-data and SPARQL services.
//!
//! Both collaborators sit behind traits so callers and tests can substitute
//! in-memory sources. The HTTP implementations share one [`RemoteConfig`].

mod http;
mod linked_data;
mod sparql;
#[doc(hidden)]
pub mod test_support;

pub use http::{DEFAULT_USER_AGENT, RemoteConfig, RemoteError};
pub use linked_data::{
    DEFAULT_ENTITY_DATA_URL, EntitySource, HttpEntitySource, LinkedDataError, get_entity_by_id,
};
pub use sparql::{
    DEFAULT_SPARQL_URL, HttpSparqlEndpoint, SparqlEndpoint, SparqlError, select_ids,
    subclasses_of_item,
};
