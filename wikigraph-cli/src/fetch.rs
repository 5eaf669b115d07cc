//! `fetch` command: look up one entity through the linked-data interface.

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{ARG_ENDPOINT, ARG_ID, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError, ENV_FETCH_ID};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch one entity from the Wikidata linked-data interface \
                 and print its summary line, or its full JSON with --json.",
    about = "Fetch one entity from the linked-data interface"
)]
#[ortho_config(prefix = "WIKIGRAPH")]
pub(crate) struct FetchArgs {
    /// Entity id, e.g. `Q42`, `P31` or `L7`.
    #[arg(value_name = ARG_ID)]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Base URL serving `{base}/{id}.json`.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with the request.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Print the entity JSON instead of its summary.
    #[arg(long)]
    #[serde(default)]
    pub(crate) json: bool,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchConfig {
    pub(crate) id: String,
    pub(crate) endpoint: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) user_agent: Option<String>,
    pub(crate) json: bool,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let id = args.id.ok_or(CliError::MissingArgument {
            field: ARG_ID,
            env: ENV_FETCH_ID,
        })?;
        Ok(Self {
            id,
            endpoint: args.endpoint,
            timeout_secs: args.timeout_secs,
            user_agent: args.user_agent,
            json: args.json,
        })
    }
}

#[cfg(feature = "remote")]
mod remote {
    use std::{io::Write, time::Duration};

    use serde_json::Value;
    use wikigraph_core::Entity;
    use wikigraph_data::remote::{
        DEFAULT_ENTITY_DATA_URL, EntitySource, HttpEntitySource, RemoteConfig, get_entity_by_id,
    };

    use super::FetchConfig;
    use crate::CliError;

    impl FetchConfig {
        pub(crate) fn remote_config(&self) -> RemoteConfig {
            let mut config = RemoteConfig::default();
            if let Some(secs) = self.timeout_secs {
                config = config.with_timeout(Duration::from_secs(secs));
            }
            if let Some(agent) = &self.user_agent {
                config = config.with_user_agent(agent.as_str());
            }
            config
        }

        pub(crate) fn build_source(&self) -> Result<HttpEntitySource, CliError> {
            let base = self.endpoint.as_deref().unwrap_or(DEFAULT_ENTITY_DATA_URL);
            Ok(HttpEntitySource::with_config(base, &self.remote_config())?)
        }
    }

    pub(crate) fn execute_fetch(
        config: &FetchConfig,
        source: &dyn EntitySource,
        writer: &mut dyn Write,
    ) -> Result<(), CliError> {
        let json = get_entity_by_id(source, &config.id)?;
        let rendered = if config.json {
            serde_json::to_string_pretty(&json).map_err(CliError::SerializeOutput)?
        } else {
            summary(json)?
        };
        writeln!(writer, "{rendered}").map_err(CliError::WriteOutput)
    }

    fn summary(json: Value) -> Result<String, CliError> {
        Ok(Entity::decode(json)?.to_string())
    }
}

#[cfg(feature = "remote")]
pub(crate) use remote::execute_fetch;

pub(crate) fn run_fetch(args: FetchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fetch_with(args, &mut stdout)
}

#[cfg(feature = "remote")]
pub(crate) fn run_fetch_with(args: FetchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let source = config.build_source()?;
    execute_fetch(&config, &source, writer)
}

#[cfg(not(feature = "remote"))]
pub(crate) fn run_fetch_with(args: FetchArgs, _writer: &mut dyn Write) -> Result<(), CliError> {
    let _config = args.into_config()?;
    Err(CliError::MissingFeature {
        feature: "remote",
        action: "fetch",
    })
}
