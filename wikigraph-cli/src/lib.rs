//! Command-line interface for working with Wikidata JSON dumps.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod chunk;
mod error;
mod fetch;
mod filter;

use chunk::{ChunkArgs, run_chunk};
pub use error::CliError;
use fetch::{FetchArgs, run_fetch};
use filter::{FilterArgs, run_filter};

pub(crate) const ARG_DUMP: &str = "dump";
pub(crate) const ARG_LINES_PER_CHUNK: &str = "lines-per-chunk";
pub(crate) const ARG_MAX_CHUNKS: &str = "max-chunks";
pub(crate) const ARG_OUTPUT_BASE: &str = "output-base";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_COMPRESS: &str = "compress";
pub(crate) const ARG_PROPERTY: &str = "property";
pub(crate) const ARG_VALUE: &str = "value";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_ALL_RANKS: &str = "all-ranks";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_ID: &str = "id";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";

pub(crate) const ENV_CHUNK_DUMP: &str = "WIKIGRAPH_CMDS_CHUNK_DUMP";
pub(crate) const ENV_FILTER_DUMP: &str = "WIKIGRAPH_CMDS_FILTER_DUMP";
pub(crate) const ENV_FILTER_PROPERTY: &str = "WIKIGRAPH_CMDS_FILTER_PROPERTY";
pub(crate) const ENV_FILTER_VALUE: &str = "WIKIGRAPH_CMDS_FILTER_VALUE";
pub(crate) const ENV_FETCH_ID: &str = "WIKIGRAPH_CMDS_FETCH_ID";

/// Run the wikigraph CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration layering or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Chunk(args) => run_chunk(args),
        Command::Filter(args) => run_filter(args),
        Command::Fetch(args) => run_fetch(args),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("WIKIGRAPH_LOG").unwrap_or_else(|_| fallback.into());
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
    if installed.is_err() {
        log::debug!("a global logger is already installed");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wikigraph",
    about = "Stream, split and filter Wikidata JSON dumps",
    version
)]
struct Cli {
    /// Log at debug level unless `WIKIGRAPH_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a dump into numbered chunk files.
    Chunk(ChunkArgs),
    /// Write the items of a dump whose claims point at an entity.
    Filter(FilterArgs),
    /// Fetch one entity from the linked-data interface.
    Fetch(FetchArgs),
}

#[cfg(test)]
mod tests;
