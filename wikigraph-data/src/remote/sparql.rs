//! Queries against the Wikidata SPARQL endpoint.

use serde_json::Value;
use thiserror::Error;
use url::Url;
use wikigraph_core::{EntityId, EntityIdError};

use super::http::{BlockingClient, RemoteConfig, RemoteError, parse_url};

/// Public Wikidata query service.
pub const DEFAULT_SPARQL_URL: &str = "https://query.wikidata.org/sparql";

/// Errors returned by the SPARQL helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SparqlError {
    /// The HTTP call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// The root item id was not an item id.
    #[error("invalid item id: {0}")]
    InvalidId(#[from] EntityIdError),
    /// An id query selected other than exactly one variable.
    #[error("expected one selected variable, found {vars:?}")]
    NotSingleVariable {
        /// Variables named in `head.vars`.
        vars: Vec<String>,
    },
    /// The response lacked the `head`/`results` layout of SPARQL JSON.
    #[error("malformed SPARQL result: {0}")]
    Malformed(String),
}

/// Something that can answer SPARQL queries with SPARQL JSON results.
pub trait SparqlEndpoint {
    /// Run `query` and return the decoded JSON result.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the call fails.
    fn run_query(&self, query: &str) -> Result<Value, RemoteError>;
}

/// HTTP implementation of [`SparqlEndpoint`]: GET with `query` and
/// `format=json` parameters.
#[derive(Debug)]
pub struct HttpSparqlEndpoint {
    endpoint: Url,
    client: BlockingClient,
}

impl HttpSparqlEndpoint {
    /// Query the public Wikidata endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the HTTP client or runtime fails to build.
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_config(DEFAULT_SPARQL_URL, &RemoteConfig::default())
    }

    /// Query `endpoint` with explicit client settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidUrl`] for an unparsable endpoint, or a
    /// build error for the client or runtime.
    pub fn with_config(endpoint: &str, config: &RemoteConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            endpoint: parse_url(endpoint)?,
            client: BlockingClient::new(config)?,
        })
    }

    fn query_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("format", "json");
        url
    }
}

impl SparqlEndpoint for HttpSparqlEndpoint {
    fn run_query(&self, query: &str) -> Result<Value, RemoteError> {
        self.client.get_json(&self.query_url(query))
    }
}

/// Run a query selecting one variable bound to entity URIs and return the
/// trailing id of each URI, in result order.
///
/// # Errors
///
/// Returns [`SparqlError::NotSingleVariable`] unless `head.vars` names
/// exactly one variable, and [`SparqlError::Malformed`] when the result
/// layout is wrong.
pub fn select_ids<E>(endpoint: &E, query: &str) -> Result<Vec<String>, SparqlError>
where
    E: SparqlEndpoint + ?Sized,
{
    let result = endpoint.run_query(query)?;
    let vars: Vec<String> = result
        .pointer("/head/vars")
        .and_then(Value::as_array)
        .ok_or_else(|| SparqlError::Malformed("missing head.vars".to_owned()))?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect();
    let [var] = vars.as_slice() else {
        return Err(SparqlError::NotSingleVariable { vars });
    };
    let bindings = result
        .pointer("/results/bindings")
        .and_then(Value::as_array)
        .ok_or_else(|| SparqlError::Malformed("missing results.bindings".to_owned()))?;
    bindings
        .iter()
        .map(|binding| {
            binding
                .get(var)
                .and_then(|term| term.get("value"))
                .and_then(Value::as_str)
                .map(uri_tail)
                .ok_or_else(|| SparqlError::Malformed(format!("binding without {var}")))
        })
        .collect()
}

/// Ids of `item` and every item reachable from it by following subclass of
/// (`P279`) backwards.
///
/// # Errors
///
/// Returns [`SparqlError::InvalidId`] for an unprefixed id and any error
/// from [`select_ids`].
///
/// # Examples
/// ```
/// use serde_json::json;
/// use wikigraph_data::remote::{subclasses_of_item, test_support::StubSparqlEndpoint};
///
/// let endpoint = StubSparqlEndpoint::new().with_result(json!({
///     "head": {"vars": ["WDid"]},
///     "results": {"bindings": [
///         {"WDid": {"type": "uri", "value": "http://www.wikidata.org/entity/Q5"}},
///     ]},
/// }));
/// assert_eq!(subclasses_of_item(&endpoint, "Q5")?, ["Q5"]);
/// # Ok::<(), wikigraph_data::remote::SparqlError>(())
/// ```
pub fn subclasses_of_item<E>(endpoint: &E, item: &str) -> Result<Vec<String>, SparqlError>
where
    E: SparqlEndpoint + ?Sized,
{
    let id = EntityId::parse(item)?;
    select_ids(endpoint, &subclasses_query(&id))
}

fn subclasses_query(id: &EntityId) -> String {
    format!("SELECT $WDid WHERE {{ ?WDid (wdt:P279)* wd:{id} . }}")
}

fn uri_tail(uri: &str) -> String {
    uri.rsplit('/').next().unwrap_or(uri).to_owned()
}
