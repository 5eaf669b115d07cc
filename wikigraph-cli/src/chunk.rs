//! `chunk` command: split a dump into numbered chunk files.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wikigraph_data::dump::{
    ChunkFormat, ChunkOptions, Compression, Compressor, DEFAULT_LINES_PER_CHUNK, JsonDump,
};

use crate::{
    ARG_COMPRESS, ARG_DUMP, ARG_FORMAT, ARG_LINES_PER_CHUNK, ARG_MAX_CHUNKS, ARG_OUTPUT_BASE,
    CliError, ENV_CHUNK_DUMP,
};

/// CLI arguments for the `chunk` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Split a Wikidata JSON dump into files of a fixed number of \
                 entity lines. Chunks are named {base}-ichunk_{n}.json and \
                 compressed with the same codec as the dump unless \
                 --compress says otherwise.",
    about = "Split a dump into numbered chunk files"
)]
#[ortho_config(prefix = "WIKIGRAPH")]
pub(crate) struct ChunkArgs {
    /// Path to the dump (`.json`, `.json.bz2` or `.json.gz`).
    #[arg(long = ARG_DUMP, value_name = "path")]
    #[serde(default)]
    pub(crate) dump: Option<Utf8PathBuf>,
    /// Entity lines per chunk (default 100).
    #[arg(long = ARG_LINES_PER_CHUNK, value_name = "count")]
    #[serde(default)]
    pub(crate) lines_per_chunk: Option<usize>,
    /// Stop after writing this many chunks.
    #[arg(long = ARG_MAX_CHUNKS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_chunks: Option<usize>,
    /// Chunk path prefix; defaults to the dump path without its extension.
    #[arg(long = ARG_OUTPUT_BASE, value_name = "path")]
    #[serde(default)]
    pub(crate) output_base: Option<Utf8PathBuf>,
    /// Chunk layout: `json` or `jsonl`.
    #[arg(long = ARG_FORMAT, value_name = "json|jsonl")]
    #[serde(default)]
    pub(crate) format: Option<String>,
    /// Chunk compression: `none`, `bz2` or `gz`.
    #[arg(long = ARG_COMPRESS, value_name = "none|bz2|gz")]
    #[serde(default)]
    pub(crate) compress: Option<String>,
}

impl ChunkArgs {
    pub(crate) fn into_config(self) -> Result<ChunkConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ChunkConfig::try_from(merged)
    }
}

/// Resolved `chunk` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChunkConfig {
    pub(crate) dump: JsonDump,
    pub(crate) options: ChunkOptions,
}

impl ChunkConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(self.dump.path(), ARG_DUMP)
    }
}

impl TryFrom<ChunkArgs> for ChunkConfig {
    type Error = CliError;

    fn try_from(args: ChunkArgs) -> Result<Self, Self::Error> {
        let path = args.dump.ok_or(CliError::MissingArgument {
            field: ARG_DUMP,
            env: ENV_CHUNK_DUMP,
        })?;
        let dump = JsonDump::new(path)?;
        let format = match args.format {
            Some(raw) => parse_option::<ChunkFormat>(&raw, ARG_FORMAT)?,
            None => ChunkFormat::default(),
        };
        let compression = match args.compress {
            Some(raw) => parse_option::<Compression>(&raw, ARG_COMPRESS)?,
            None => dump.compression(),
        };

        let mut options = ChunkOptions::new()
            .with_lines_per_chunk(args.lines_per_chunk.unwrap_or(DEFAULT_LINES_PER_CHUNK))
            .with_format(format);
        if let Some(max_chunks) = args.max_chunks {
            options = options.with_max_chunks(max_chunks);
        }
        if let Some(output_base) = args.output_base {
            options = options.with_output_base(output_base);
        }
        if let Some(compressor) = Compressor::for_compression(compression) {
            options = options.with_compressor(compressor);
        }
        Ok(Self { dump, options })
    }
}

pub(crate) fn parse_option<T>(raw: &str, field: &'static str) -> Result<T, CliError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse()
        .map_err(|reason| CliError::InvalidOption { field, reason })
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wikigraph_fs::is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn run_chunk(args: ChunkArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_chunk_with(args, &mut stdout)
}

pub(crate) fn run_chunk_with(args: ChunkArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_chunk(&config, writer)
}

pub(crate) fn execute_chunk(config: &ChunkConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    config.validate_sources()?;
    let chunks = config.dump.create_chunks(&config.options)?;
    info!("wrote {} chunks from {}", chunks.len(), config.dump);
    for chunk in &chunks {
        writeln!(writer, "{chunk}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ChunkConfig, CliError> {
    let merged = ChunkArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ChunkConfig::try_from(merged)
}
