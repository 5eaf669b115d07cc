//! Splitting a dump into fixed-size chunk files.

use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use super::{ChunkFormat, ChunkOptions, DumpError, JsonDump};

impl JsonDump {
    /// Rewrite the dump as chunk files of `options.lines_per_chunk` entity
    /// lines each and return their paths in write order.
    ///
    /// Chunks are named `{base}-ichunk_{n}.{json|jsonl}` with `n` counting
    /// from zero, plus the compressor suffix when one is configured. A final
    /// partial batch is written as its own chunk. Once `max_chunks` files
    /// exist the remaining input is not read.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidChunkSize`] for a zero chunk size, and any
    /// read, write or compression failure.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8PathBuf;
    /// use wikigraph_data::dump::{ChunkOptions, JsonDump};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dir = tempfile::tempdir()?;
    /// let root = Utf8PathBuf::try_from(dir.path().to_path_buf())?;
    /// let path = root.join("wikidata-20240101-all.json");
    /// std::fs::write(&path, "[\n{\"id\":\"Q1\"},\n{\"id\":\"Q2\"},\n{\"id\":\"Q3\"}\n]\n")?;
    ///
    /// let chunks = JsonDump::new(path)?
    ///     .create_chunks(&ChunkOptions::new().with_lines_per_chunk(2))?;
    /// assert_eq!(chunks.len(), 2);
    /// assert!(chunks[1].as_str().ends_with("wikidata-20240101-all-ichunk_1.json"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_chunks(&self, options: &ChunkOptions) -> Result<Vec<Utf8PathBuf>, DumpError> {
        if options.lines_per_chunk == 0 {
            return Err(DumpError::InvalidChunkSize);
        }
        let max_chunks = options.max_chunks.unwrap_or(usize::MAX);
        let base = options.output_base.as_deref().unwrap_or(self.basename());
        let mut written = Vec::new();
        if max_chunks == 0 {
            return Ok(written);
        }

        let mut batch: Vec<String> = Vec::with_capacity(options.lines_per_chunk);
        for entry in self.lines()? {
            let line = entry?;
            let Some(text) = line.entity_text() else {
                continue;
            };
            batch.push(text.to_owned());
            if batch.len() >= options.lines_per_chunk {
                written.push(emit_chunk(base, written.len(), &batch, options)?);
                batch.clear();
                if written.len() >= max_chunks {
                    return Ok(written);
                }
            }
        }
        if !batch.is_empty() {
            written.push(emit_chunk(base, written.len(), &batch, options)?);
        }
        Ok(written)
    }
}

/// Path of chunk `index` under `base`, before compression.
#[must_use]
pub fn chunk_path(base: &Utf8Path, index: usize, format: ChunkFormat) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{base}-ichunk_{index}.{}", format.extension()))
}

fn emit_chunk(
    base: &Utf8Path,
    index: usize,
    lines: &[String],
    options: &ChunkOptions,
) -> Result<Utf8PathBuf, DumpError> {
    let path = chunk_path(base, index, options.format);
    debug!("writing {} lines to {path}", lines.len());
    write_lines(&path, lines, options.format)?;
    match &options.compressor {
        Some(compressor) => compressor.compress(&path),
        None => Ok(path),
    }
}

/// Write `lines` to `path` in `format`. The file is flushed and closed
/// before returning.
pub(crate) fn write_lines<S: AsRef<str>>(
    path: &Utf8Path,
    lines: &[S],
    format: ChunkFormat,
) -> Result<(), DumpError> {
    let file = wikigraph_fs::create_file(path).map_err(|source| DumpError::CreateChunk {
        path: path.to_owned(),
        source,
    })?;
    let mut out = BufWriter::new(file.into_std());
    write_body(&mut out, lines, format)
        .and_then(|()| out.into_inner().map_err(|err| err.into_error()))
        .and_then(|file| file.sync_all())
        .map_err(|source| DumpError::WriteChunk {
            path: path.to_owned(),
            source,
        })
}

fn write_body<W: Write, S: AsRef<str>>(
    out: &mut W,
    lines: &[S],
    format: ChunkFormat,
) -> std::io::Result<()> {
    match format {
        ChunkFormat::Json => {
            out.write_all(b"[\n")?;
            for (index, line) in lines.iter().enumerate() {
                if index > 0 {
                    out.write_all(b",\n")?;
                }
                out.write_all(line.as_ref().as_bytes())?;
            }
            out.write_all(b"\n]\n")
        }
        ChunkFormat::Jsonl => lines.iter().try_for_each(|line| {
            out.write_all(line.as_ref().as_bytes())?;
            out.write_all(b"\n")
        }),
    }
}
