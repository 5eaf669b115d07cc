//! Error types emitted by the wikigraph CLI.
//!
//! Keep this error type reasonably small, as every command returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wikigraph_data::dump::DumpError;
#[cfg(feature = "remote")]
use wikigraph_data::remote::{LinkedDataError, RemoteError};

/// Errors emitted by the wikigraph CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// An option value could not be parsed.
    #[error("invalid --{field} value: {reason}")]
    InvalidOption {
        /// Flag name without dashes.
        field: &'static str,
        /// Parser message.
        reason: String,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// Command that needed it.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag name without dashes.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name without dashes.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Reading, chunking or writing a dump failed.
    #[error(transparent)]
    Dump(#[from] Box<DumpError>),
    /// Building the HTTP client failed.
    #[cfg(feature = "remote")]
    #[error(transparent)]
    Remote(#[from] Box<RemoteError>),
    /// Fetching an entity failed.
    #[cfg(feature = "remote")]
    #[error(transparent)]
    Fetch(#[from] Box<LinkedDataError>),
    /// A fetched entity does not decode.
    #[error("fetched entity does not decode: {0}")]
    Schema(#[from] wikigraph_core::SchemaError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<DumpError> for CliError {
    fn from(err: DumpError) -> Self {
        Self::Dump(Box::new(err))
    }
}

#[cfg(feature = "remote")]
impl From<RemoteError> for CliError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(Box::new(err))
    }
}

#[cfg(feature = "remote")]
impl From<LinkedDataError> for CliError {
    fn from(err: LinkedDataError) -> Self {
        Self::Fetch(Box::new(err))
    }
}
