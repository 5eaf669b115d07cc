//! `filter` command: keep the items of a dump whose claims point at an entity.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wikigraph_core::{EntityId, EntityKind};
use wikigraph_data::{
    dump::{JsonDump, write_entities},
    filter::{ItemFilter, select_items},
};

use crate::{
    ARG_ALL_RANKS, ARG_DUMP, ARG_LIMIT, ARG_OUTPUT, ARG_PROPERTY, ARG_VALUE, CliError,
    ENV_FILTER_DUMP, ENV_FILTER_PROPERTY, ENV_FILTER_VALUE, chunk::require_existing,
};

/// CLI arguments for the `filter` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Stream a Wikidata JSON dump and write every item whose \
                 claims for --property point at --value. Only truthy claims \
                 are inspected unless --all-ranks is given. The selection is \
                 written as a single JSON array in dump layout.",
    about = "Write the items of a dump whose claims point at an entity"
)]
#[ortho_config(prefix = "WIKIGRAPH")]
pub(crate) struct FilterArgs {
    /// Path to the dump (`.json`, `.json.bz2` or `.json.gz`).
    #[arg(long = ARG_DUMP, value_name = "path")]
    #[serde(default)]
    pub(crate) dump: Option<Utf8PathBuf>,
    /// Property whose claims are inspected, e.g. `P106`.
    #[arg(long = ARG_PROPERTY, value_name = "id")]
    #[serde(default)]
    pub(crate) property: Option<String>,
    /// Entity the claims must point at, e.g. `Q82955`.
    #[arg(long = ARG_VALUE, value_name = "id")]
    #[serde(default)]
    pub(crate) value: Option<String>,
    /// Output file; defaults to `{dump base}-{property}-{value}.json`.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Inspect deprecated and non-preferred claims too.
    #[arg(long = ARG_ALL_RANKS)]
    #[serde(default)]
    pub(crate) all_ranks: bool,
    /// Stop after reading this many entities.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl FilterArgs {
    pub(crate) fn into_config(self) -> Result<FilterConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FilterConfig::try_from(merged)
    }
}

/// Resolved `filter` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterConfig {
    pub(crate) dump: JsonDump,
    pub(crate) filter: ItemFilter,
    pub(crate) output: Utf8PathBuf,
}

impl TryFrom<FilterArgs> for FilterConfig {
    type Error = CliError;

    fn try_from(args: FilterArgs) -> Result<Self, Self::Error> {
        let path = args.dump.ok_or(CliError::MissingArgument {
            field: ARG_DUMP,
            env: ENV_FILTER_DUMP,
        })?;
        let property = args.property.ok_or(CliError::MissingArgument {
            field: ARG_PROPERTY,
            env: ENV_FILTER_PROPERTY,
        })?;
        let value = args.value.ok_or(CliError::MissingArgument {
            field: ARG_VALUE,
            env: ENV_FILTER_VALUE,
        })?;
        require_kind(&property, EntityKind::Property, ARG_PROPERTY)?;
        require_kind(&value, EntityKind::Item, ARG_VALUE)?;

        let dump = JsonDump::new(path)?;
        let output = args.output.unwrap_or_else(|| {
            Utf8PathBuf::from(format!("{}-{property}-{value}.json", dump.basename()))
        });
        let mut filter = ItemFilter::new(property, value).with_truthy(!args.all_ranks);
        if let Some(limit) = args.limit {
            filter = filter.with_scan_limit(limit);
        }
        Ok(Self {
            dump,
            filter,
            output,
        })
    }
}

fn require_kind(raw: &str, kind: EntityKind, field: &'static str) -> Result<(), CliError> {
    let id = EntityId::parse(raw).map_err(|err| CliError::InvalidOption {
        field,
        reason: err.to_string(),
    })?;
    if id.kind() == kind {
        Ok(())
    } else {
        Err(CliError::InvalidOption {
            field,
            reason: format!("{id} is not a {kind} id"),
        })
    }
}

pub(crate) fn run_filter(args: FilterArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_filter_with(args, &mut stdout)
}

pub(crate) fn run_filter_with(args: FilterArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_filter(&config, writer)
}

pub(crate) fn execute_filter(config: &FilterConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    require_existing(config.dump.path(), ARG_DUMP)?;
    let items = select_items(&config.dump, &config.filter)?;
    write_entities(&items, &config.output)?;
    writeln!(
        writer,
        "{} items with {} = {} written to {}",
        items.len(),
        config.filter.property_id,
        config.filter.value_id,
        config.output
    )
    .map_err(CliError::WriteOutput)
}
