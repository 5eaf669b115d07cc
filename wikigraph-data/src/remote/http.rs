//! Blocking JSON GETs over an async `reqwest` client.

use std::{fmt, io, time::Duration};

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Default user agent for Wikidata requests.
pub const DEFAULT_USER_AGENT: &str = "wikigraph/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings shared by the linked-data and SPARQL collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl RemoteConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Transport and response failures of a remote call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with status {status}: {body}")]
    BadResponse {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response headers as name/value pairs.
        headers: Vec<(String, String)>,
        /// Response body, lossily decoded.
        body: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body was not JSON.
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The URL could not be built from the configured base.
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        /// The rejected URL text.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// A `reqwest` client paired with the runtime used to block on it.
///
/// Outside any Tokio runtime, or inside a `current_thread` one, requests run
/// on the owned runtime. Inside a multi-threaded runtime they run on the
/// ambient runtime via [`tokio::task::block_in_place`].
pub(crate) struct BlockingClient {
    client: Client,
    runtime: Runtime,
}

impl fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(RemoteError::Client)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RemoteError::Runtime)?;
        Ok(Self { client, runtime })
    }

    /// GET `url` and decode the body as JSON.
    pub(crate) fn get_json(&self, url: &Url) -> Result<Value, RemoteError> {
        let future = fetch_json(&self.client, url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

async fn fetch_json(client: &Client, url: &Url) -> Result<Value, RemoteError> {
    let network = |source| RemoteError::Network {
        url: url.to_string(),
        source,
    };
    let response = client.get(url.clone()).send().await.map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::BadResponse {
            url: url.to_string(),
            status: status.as_u16(),
            headers,
            body,
        });
    }
    let bytes = response.bytes().await.map_err(network)?;
    serde_json::from_slice(&bytes).map_err(|source| RemoteError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Parse `raw` as a URL, reporting failures as [`RemoteError::InvalidUrl`].
pub(crate) fn parse_url(raw: &str) -> Result<Url, RemoteError> {
    Url::parse(raw).map_err(|source| RemoteError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}
