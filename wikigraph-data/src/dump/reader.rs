//! Lazy, re-openable traversal of a JSON-array-per-line dump file.

use std::{
    fmt,
    io::{BufRead, BufReader},
};

use bzip2::read::MultiBzDecoder;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::MultiGzDecoder;
use serde_json::Value;
use wikigraph_core::Entity;

use super::{Compression, DumpError};

/// A Wikidata JSON dump file: one array element per line between bare `[`
/// and `]` lines, optionally bzip2 or gzip compressed.
///
/// Every traversal opens a fresh handle, so a `JsonDump` can be iterated any
/// number of times.
///
/// # Examples
/// ```
/// use wikigraph_data::dump::{Compression, JsonDump};
///
/// let dump = JsonDump::new("data/wikidata-20240101-all.json.gz")?;
/// assert_eq!(dump.compression(), Compression::Gzip);
/// assert_eq!(dump.basename(), "data/wikidata-20240101-all");
/// # Ok::<(), wikigraph_data::dump::DumpError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDump {
    path: Utf8PathBuf,
    compression: Compression,
    basename: Utf8PathBuf,
}

impl JsonDump {
    /// Describe the dump at `path`, choosing the decoder from its suffix.
    ///
    /// The file is not opened until it is traversed.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::UnsupportedFileName`] unless the name ends in
    /// `.json`, `.json.bz2` or `.json.gz`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, DumpError> {
        let path = path.into();
        let Some((compression, basename)) = Compression::split_file_name(path.as_str()) else {
            return Err(DumpError::UnsupportedFileName { path });
        };
        let basename = Utf8PathBuf::from(basename);
        Ok(Self {
            path,
            compression,
            basename,
        })
    }

    /// Path of the dump file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Compression detected from the file name.
    #[must_use]
    pub const fn compression(&self) -> Compression {
        self.compression
    }

    /// The path with its `.json[.bz2|.gz]` suffix removed.
    #[must_use]
    pub fn basename(&self) -> &Utf8Path {
        &self.basename
    }

    fn open(&self) -> Result<Box<dyn BufRead>, DumpError> {
        let file = wikigraph_fs::open_file(&self.path)
            .map_err(|source| DumpError::Open {
                path: self.path.clone(),
                source,
            })?
            .into_std();
        Ok(match self.compression {
            Compression::None => Box::new(BufReader::new(file)),
            Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(file))),
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        })
    }

    /// Every line of the decompressed file, including the `[` and `]` lines.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Open`] when the file cannot be opened. Read and
    /// UTF-8 failures are yielded by the iterator, which then stops.
    pub fn lines(&self) -> Result<DumpLines, DumpError> {
        Ok(DumpLines {
            path: self.path.clone(),
            reader: self.open()?,
            buffer: Vec::new(),
            number: 0,
            done: false,
        })
    }

    /// Every entity line decoded as a JSON value, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Open`] when the file cannot be opened. Read and
    /// parse failures are yielded by the iterator, which then stops.
    pub fn values(&self) -> Result<DumpValues, DumpError> {
        Ok(DumpValues {
            lines: self.lines()?,
        })
    }

    /// Every entity line decoded as a typed [`Entity`], in file order.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Open`] when the file cannot be opened. Read,
    /// parse and schema failures are yielded by the iterator, which then
    /// stops.
    pub fn entities(&self) -> Result<DumpEntities, DumpError> {
        Ok(DumpEntities {
            values: self.values()?,
        })
    }
}

impl fmt::Display for JsonDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WikidataJsonDump(filename={})", self.path)
    }
}

/// One decoded line of a dump file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    /// 1-based line number in the decompressed stream.
    pub number: usize,
    /// Line text without its trailing newline.
    pub text: String,
}

impl DumpLine {
    /// The entity JSON on this line, or `None` for the bracket lines and
    /// blank lines.
    #[must_use]
    pub fn entity_text(&self) -> Option<&str> {
        entity_text(&self.text)
    }
}

/// Strip the separator comma and whitespace from a dump line and skip the
/// lines that carry no entity.
pub(crate) fn entity_text(line: &str) -> Option<&str> {
    let trimmed = line.trim().trim_end_matches(',').trim_end();
    match trimmed {
        "" | "[" | "]" => None,
        entity => Some(entity),
    }
}

/// Iterator over the lines of a dump, created by [`JsonDump::lines`].
pub struct DumpLines {
    path: Utf8PathBuf,
    reader: Box<dyn BufRead>,
    buffer: Vec<u8>,
    number: usize,
    done: bool,
}

impl DumpLines {
    /// Path of the dump being read.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn fail(&mut self, err: DumpError) -> Option<Result<DumpLine, DumpError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl fmt::Debug for DumpLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpLines")
            .field("path", &self.path)
            .field("number", &self.number)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Iterator for DumpLines {
    type Item = Result<DumpLine, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buffer.clear();
        let line = self.number + 1;
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => self.number = line,
            Err(source) => {
                let path = self.path.clone();
                return self.fail(DumpError::ReadLine { path, line, source });
            }
        }
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        }
        match String::from_utf8(std::mem::take(&mut self.buffer)) {
            Ok(text) => Some(Ok(DumpLine { number: line, text })),
            Err(source) => {
                let path = self.path.clone();
                self.fail(DumpError::InvalidUtf8 { path, line, source })
            }
        }
    }
}

/// Iterator over the entity values of a dump, created by
/// [`JsonDump::values`].
#[derive(Debug)]
pub struct DumpValues {
    lines: DumpLines,
}

impl DumpValues {
    /// The next entity value with its line number.
    pub(crate) fn next_numbered(&mut self) -> Option<Result<(usize, Value), DumpError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let Some(text) = line.entity_text() else {
                continue;
            };
            let mut bytes = text.as_bytes().to_vec();
            return Some(match simd_json::from_slice::<Value>(bytes.as_mut_slice()) {
                Ok(value) => Ok((line.number, value)),
                Err(source) => {
                    self.lines.done = true;
                    Err(DumpError::ParseLine {
                        path: self.lines.path.clone(),
                        line: line.number,
                        source,
                    })
                }
            });
        }
    }
}

impl Iterator for DumpValues {
    type Item = Result<Value, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_numbered()
            .map(|result| result.map(|(_, value)| value))
    }
}

/// Iterator over the typed entities of a dump, created by
/// [`JsonDump::entities`].
#[derive(Debug)]
pub struct DumpEntities {
    values: DumpValues,
}

impl Iterator for DumpEntities {
    type Item = Result<Entity, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, value) = match self.values.next_numbered()? {
            Ok(numbered) => numbered,
            Err(err) => return Some(Err(err)),
        };
        Some(Entity::decode(value).map_err(|source| {
            self.values.lines.done = true;
            DumpError::Decode {
                path: self.values.lines.path.clone(),
                line,
                source,
            }
        }))
    }
}
