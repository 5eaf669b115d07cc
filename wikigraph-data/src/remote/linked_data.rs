//! Entity fetch through the Wikidata linked-data interface.

use log::warn;
use serde_json::Value;
use thiserror::Error;
use wikigraph_core::{EntityId, EntityIdError};

use super::http::{BlockingClient, RemoteConfig, RemoteError, parse_url};

/// Linked-data endpoint serving `{base}/{id}.json`.
pub const DEFAULT_ENTITY_DATA_URL: &str = "https://www.wikidata.org/wiki/Special:EntityData";

/// Errors returned by [`get_entity_by_id`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinkedDataError {
    /// The requested id does not start with `Q`, `P` or `L`.
    #[error("invalid entity id: {0}")]
    InvalidId(#[from] EntityIdError),
    /// The HTTP call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// The response had no `entities` mapping or it was empty.
    #[error("response for {id} carries no entities")]
    MissingEntity {
        /// The requested id.
        id: String,
    },
}

/// A source of linked-data documents keyed by entity id.
///
/// A document is the full response body: `{"entities": {"Q42": {...}}}`.
pub trait EntitySource {
    /// Fetch the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the call fails.
    fn fetch_entity(&self, id: &EntityId) -> Result<Value, RemoteError>;
}

/// HTTP implementation of [`EntitySource`].
///
/// # Examples
/// ```no_run
/// use wikigraph_data::remote::{HttpEntitySource, get_entity_by_id};
///
/// let source = HttpEntitySource::new()?;
/// let q42 = get_entity_by_id(&source, "Q42")?;
/// assert_eq!(q42["id"], "Q42");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct HttpEntitySource {
    base_url: String,
    client: BlockingClient,
}

impl HttpEntitySource {
    /// Fetch from the public Wikidata endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the HTTP client or runtime fails to build.
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_config(DEFAULT_ENTITY_DATA_URL, &RemoteConfig::default())
    }

    /// Fetch from `base_url` with explicit client settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the HTTP client or runtime fails to build.
    pub fn with_config(
        base_url: impl Into<String>,
        config: &RemoteConfig,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            base_url: base_url.into(),
            client: BlockingClient::new(config)?,
        })
    }

    fn document_url(&self, id: &EntityId) -> String {
        format!("{}/{id}.json", self.base_url.trim_end_matches('/'))
    }
}

impl EntitySource for HttpEntitySource {
    fn fetch_entity(&self, id: &EntityId) -> Result<Value, RemoteError> {
        let url = parse_url(&self.document_url(id))?;
        self.client.get_json(&url)
    }
}

/// Fetch the JSON of entity `raw_id` from `source`.
///
/// The id prefix is validated before any request is made. When the returned
/// entity has a different id (a redirect) a warning is logged and the
/// returned entity is used.
///
/// # Errors
///
/// Returns [`LinkedDataError::InvalidId`] for ids not starting with `Q`,
/// `P` or `L`, [`LinkedDataError::Remote`] when the call fails and
/// [`LinkedDataError::MissingEntity`] when the document holds no entity.
pub fn get_entity_by_id<S>(source: &S, raw_id: &str) -> Result<Value, LinkedDataError>
where
    S: EntitySource + ?Sized,
{
    let id = EntityId::parse(raw_id)?;
    let document = source.fetch_entity(&id)?;
    unwrap_entity(&id, document)
}

/// Take the first entity of a linked-data document.
fn unwrap_entity(id: &EntityId, document: Value) -> Result<Value, LinkedDataError> {
    let missing = || LinkedDataError::MissingEntity { id: id.to_string() };
    let Value::Object(mut root) = document else {
        return Err(missing());
    };
    let Some(Value::Object(entities)) = root.remove("entities") else {
        return Err(missing());
    };
    let (returned_id, entity) = entities.into_iter().next().ok_or_else(missing)?;
    if returned_id != id.as_str() {
        warn!("Wikidata redirect detected: requested {id}, received {returned_id}");
    }
    Ok(entity)
}
