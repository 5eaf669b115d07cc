//! External compression of written chunk files.
//!
//! The compressor runs as a child process that writes to standard output.
//! Output lands in a `.partial` file that is renamed to its final name only
//! after the process exits successfully, so a failed run never leaves a file
//! with a compressed suffix behind.

use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use log::info;

use super::{Compression, DumpError};

/// A command-line compressor invoked as `{program} {args..} -c {chunk}`.
///
/// # Examples
/// ```
/// use wikigraph_data::dump::{Compression, Compressor};
///
/// let compressor = Compressor::bzip2().with_program("lbzip2").with_args(["-9"]);
/// assert_eq!(compressor.compression(), Compression::Bzip2);
/// assert_eq!(compressor.program(), "lbzip2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressor {
    compression: Compression,
    program: String,
    args: Vec<String>,
}

impl Compressor {
    /// Compress with `bzip2`, producing `.bz2` files.
    #[must_use]
    pub fn bzip2() -> Self {
        Self {
            compression: Compression::Bzip2,
            program: "bzip2".to_owned(),
            args: Vec::new(),
        }
    }

    /// Compress with `gzip`, producing `.gz` files.
    #[must_use]
    pub fn gzip() -> Self {
        Self {
            compression: Compression::Gzip,
            program: "gzip".to_owned(),
            args: Vec::new(),
        }
    }

    /// The default compressor for `compression`, or `None` for plain output.
    #[must_use]
    pub fn for_compression(compression: Compression) -> Option<Self> {
        match compression {
            Compression::None => None,
            Compression::Bzip2 => Some(Self::bzip2()),
            Compression::Gzip => Some(Self::gzip()),
        }
    }

    /// Run a different executable that accepts the same flags.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Pass extra arguments ahead of `-c`.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Compression produced by this compressor.
    #[must_use]
    pub const fn compression(&self) -> Compression {
        self.compression
    }

    /// Executable name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compress `path` into `{path}.{bz2|gz}`, remove `path` and return the
    /// compressed path.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::SpawnCompressor`] when the program cannot be
    /// started, [`DumpError::Compress`] when it exits unsuccessfully, and
    /// [`DumpError::CreateChunk`] or [`DumpError::WriteChunk`] when the
    /// output cannot be created or moved into place.
    pub fn compress(&self, path: &Utf8Path) -> Result<Utf8PathBuf, DumpError> {
        let extension = self.compression.extension().unwrap_or("compressed");
        let target = Utf8PathBuf::from(format!("{path}.{extension}"));
        let partial = Utf8PathBuf::from(format!("{target}.partial"));

        let sink = wikigraph_fs::create_file(&partial)
            .map_err(|source| DumpError::CreateChunk {
                path: partial.clone(),
                source,
            })?
            .into_std();
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg("-c")
            .arg(path.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::from(sink))
            .stderr(Stdio::piped())
            .output();
        let output = match result {
            Ok(output) => output,
            Err(source) => {
                discard(&partial);
                return Err(DumpError::SpawnCompressor {
                    program: self.program.clone(),
                    source,
                });
            }
        };
        if !output.status.success() {
            discard(&partial);
            return Err(DumpError::Compress {
                program: self.program.clone(),
                path: path.to_owned(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        wikigraph_fs::rename_file(&partial, &target).map_err(|source| DumpError::WriteChunk {
            path: target.clone(),
            source,
        })?;
        wikigraph_fs::remove_file(path).map_err(|source| DumpError::WriteChunk {
            path: path.to_owned(),
            source,
        })?;
        info!("compressed {path} to {target}");
        Ok(target)
    }
}

fn discard(partial: &Utf8Path) {
    if let Err(err) = wikigraph_fs::remove_file(partial) {
        log::warn!("failed to remove partial output {partial}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::MultiGzDecoder;
    use rstest::{fixture, rstest};
    use std::io::Read;
    use tempfile::TempDir;

    #[fixture]
    fn chunk() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let path = root.join("dump-ichunk_0.json");
        std::fs::write(&path, "[\n{\"id\":\"Q1\"}\n]\n").expect("write chunk");
        (dir, path)
    }

    #[rstest]
    fn gzip_replaces_chunk_with_compressed_copy(chunk: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = chunk;

        let target = Compressor::gzip().compress(&path).expect("gzip runs");

        assert_eq!(target.as_str(), format!("{path}.gz"));
        assert!(!path.exists());
        assert!(!Utf8PathBuf::from(format!("{target}.partial")).exists());
        let mut text = String::new();
        MultiGzDecoder::new(std::fs::File::open(&target).expect("open gz"))
            .read_to_string(&mut text)
            .expect("decode gz");
        assert_eq!(text, "[\n{\"id\":\"Q1\"}\n]\n");
    }

    #[rstest]
    fn failing_program_leaves_chunk_untouched(chunk: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = chunk;

        let err = Compressor::bzip2()
            .with_program("false")
            .compress(&path)
            .expect_err("false exits with 1");

        assert!(matches!(err, DumpError::Compress { ref program, .. } if program == "false"));
        assert!(path.exists());
        assert!(!Utf8PathBuf::from(format!("{path}.bz2")).exists());
        assert!(!Utf8PathBuf::from(format!("{path}.bz2.partial")).exists());
    }

    #[rstest]
    fn missing_program_is_a_spawn_error(chunk: (TempDir, Utf8PathBuf)) {
        let (_guard, path) = chunk;

        let err = Compressor::gzip()
            .with_program("wikigraph-no-such-compressor")
            .compress(&path)
            .expect_err("program is missing");

        assert!(matches!(err, DumpError::SpawnCompressor { .. }));
        assert!(path.exists());
    }

    #[rstest]
    fn plain_output_has_no_compressor() {
        assert_eq!(Compressor::for_compression(Compression::None), None);
        assert_eq!(
            Compressor::for_compression(Compression::Gzip).map(|c| c.compression()),
            Some(Compression::Gzip)
        );
    }
}
