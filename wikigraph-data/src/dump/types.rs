//! Encodings, chunk formats and chunking options for dump files.

use std::{fmt, str::FromStr};

use camino::Utf8PathBuf;

use super::Compressor;

/// Lines written per chunk when callers do not choose a size.
pub const DEFAULT_LINES_PER_CHUNK: usize = 100;

/// Block compression applied to a dump or chunk file.
///
/// # Examples
/// ```
/// use wikigraph_data::dump::Compression;
///
/// let (compression, base) = Compression::split_file_name("wikidata-20240101-all.json.bz2")
///     .expect("known suffix");
/// assert_eq!(compression, Compression::Bzip2);
/// assert_eq!(base, "wikidata-20240101-all");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Plain `.json`.
    #[default]
    None,
    /// `.json.bz2`.
    Bzip2,
    /// `.json.gz`.
    Gzip,
}

impl Compression {
    /// File suffix added after `.json`, without the dot.
    #[must_use]
    pub const fn extension(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Bzip2 => Some("bz2"),
            Self::Gzip => Some("gz"),
        }
    }

    /// Detect the compression from a dump file name and return the name
    /// with the `.json[.bz2|.gz]` suffix removed.
    #[must_use]
    pub fn split_file_name(name: &str) -> Option<(Self, &str)> {
        [
            (".json.bz2", Self::Bzip2),
            (".json.gz", Self::Gzip),
            (".json", Self::None),
        ]
        .into_iter()
        .find_map(|(suffix, compression)| {
            name.strip_suffix(suffix).map(|base| (compression, base))
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().unwrap_or("none"))
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "bz2" | "bzip2" => Ok(Self::Bzip2),
            "gz" | "gzip" => Ok(Self::Gzip),
            other => Err(format!(
                "unknown compression `{other}` (expected none, bz2 or gz)"
            )),
        }
    }
}

/// Layout of a chunk file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChunkFormat {
    /// A JSON array with one element per line, matching the dump layout.
    #[default]
    Json,
    /// One JSON value per line with no wrapping array.
    Jsonl,
}

impl ChunkFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChunkFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(format!(
                "unknown chunk format `{other}` (expected json or jsonl)"
            )),
        }
    }
}

/// Options controlling [`JsonDump::create_chunks`](super::JsonDump::create_chunks).
///
/// # Examples
/// ```
/// use wikigraph_data::dump::{ChunkFormat, ChunkOptions, Compressor};
///
/// let options = ChunkOptions::new()
///     .with_lines_per_chunk(250)
///     .with_max_chunks(4)
///     .with_format(ChunkFormat::Jsonl)
///     .with_compressor(Compressor::gzip());
/// assert_eq!(options.lines_per_chunk, 250);
/// assert_eq!(options.max_chunks, Some(4));
/// assert!(options.output_base.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Entity lines per chunk file. Must be at least 1.
    pub lines_per_chunk: usize,
    /// Stop after this many chunk files have been written.
    pub max_chunks: Option<usize>,
    /// Path prefix for chunk files; defaults to the dump basename.
    pub output_base: Option<Utf8PathBuf>,
    /// Chunk layout.
    pub format: ChunkFormat,
    /// External compressor run over each written chunk.
    pub compressor: Option<Compressor>,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            lines_per_chunk: DEFAULT_LINES_PER_CHUNK,
            max_chunks: None,
            output_base: None,
            format: ChunkFormat::Json,
            compressor: None,
        }
    }
}

impl ChunkOptions {
    /// Options with 100 lines per chunk, no cap, uncompressed JSON output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of entity lines per chunk.
    #[must_use]
    pub const fn with_lines_per_chunk(mut self, lines_per_chunk: usize) -> Self {
        self.lines_per_chunk = lines_per_chunk;
        self
    }

    /// Cap the number of chunk files written.
    #[must_use]
    pub const fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = Some(max_chunks);
        self
    }

    /// Write chunks under `output_base` instead of the dump basename.
    #[must_use]
    pub fn with_output_base(mut self, output_base: impl Into<Utf8PathBuf>) -> Self {
        self.output_base = Some(output_base.into());
        self
    }

    /// Choose the chunk layout.
    #[must_use]
    pub const fn with_format(mut self, format: ChunkFormat) -> Self {
        self.format = format;
        self
    }

    /// Compress each chunk after it is written.
    #[must_use]
    pub fn with_compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = Some(compressor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("wikidata-20190401-all.json", Compression::None, "wikidata-20190401-all")]
    #[case("dir/wikidata-20190401-all.json.bz2", Compression::Bzip2, "dir/wikidata-20190401-all")]
    #[case("a.b.json.gz", Compression::Gzip, "a.b")]
    fn split_file_name_detects_suffix(
        #[case] name: &str,
        #[case] compression: Compression,
        #[case] base: &str,
    ) {
        assert_eq!(Compression::split_file_name(name), Some((compression, base)));
    }

    #[rstest]
    #[case("dump.jsonl")]
    #[case("dump.json.xz")]
    #[case("dump.bz2")]
    #[case("dump")]
    fn split_file_name_rejects_other_suffixes(#[case] name: &str) {
        assert_eq!(Compression::split_file_name(name), None);
    }

    #[rstest]
    #[case("none", Compression::None)]
    #[case("bz2", Compression::Bzip2)]
    #[case("gzip", Compression::Gzip)]
    fn compression_parses_names(#[case] raw: &str, #[case] expected: Compression) {
        assert_eq!(raw.parse::<Compression>(), Ok(expected));
    }

    #[rstest]
    fn chunk_format_round_trips_through_display() {
        for format in [ChunkFormat::Json, ChunkFormat::Jsonl] {
            assert_eq!(format.to_string().parse::<ChunkFormat>(), Ok(format));
        }
        assert!("csv".parse::<ChunkFormat>().is_err());
    }

    #[rstest]
    fn default_options_match_dump_layout() {
        let options = ChunkOptions::default();
        assert_eq!(options.lines_per_chunk, DEFAULT_LINES_PER_CHUNK);
        assert_eq!(options.format, ChunkFormat::Json);
        assert!(options.compressor.is_none());
        assert!(options.max_chunks.is_none());
    }
}
