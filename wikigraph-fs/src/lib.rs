//! Capability-scoped file access for dump files and chunk output.
//!
//! Every helper resolves the parent directory of a UTF-8 path with ambient
//! authority once and then performs the operation relative to that
//! directory handle, so callers never hold a raw `std::fs` path open.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::{Component, MAIN_SEPARATOR};

/// Open an existing file for reading.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create (or truncate) a file for writing, creating missing parent
/// directories first.
pub fn create_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    dir.create(name)
}

/// Rename `from` to `to`. Both paths must share a parent directory.
pub fn rename_file(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    let (dir, from_name) = parent_and_name(from)?;
    if from.parent() != to.parent() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot rename {from} across directories to {to}"),
        ));
    }
    let to_name = file_name(to)?;
    dir.rename(from_name, &dir, to_name)
}

/// Delete a regular file.
pub fn remove_file(path: &Utf8Path) -> io::Result<()> {
    let (dir, name) = parent_and_name(path)?;
    dir.remove_file(name)
}

/// Whether `path` names an existing regular file.
///
/// A missing file or missing parent directory reads as `false`; other IO
/// failures are returned.
pub fn is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match parent_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (anchor, relative) = anchor_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    anchor.create_dir_all(&relative)
}

fn file_name(path: &Utf8Path) -> io::Result<&str> {
    path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} does not name a file"),
        )
    })
}

fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = file_name(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into a directory handle for its root (or `.`) and the
/// remaining relative path.
fn anchor_and_relative(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let root = match dir.as_std_path().components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Some(Utf8PathBuf::from(format!("{prefix}{MAIN_SEPARATOR}")))
        }
        Some(Component::RootDir) => Some(Utf8PathBuf::from(MAIN_SEPARATOR.to_string())),
        _ => None,
    };
    let (anchor, relative) = match root {
        Some(root) => {
            let relative = dir
                .strip_prefix(&root)
                .map_err(|_| io::Error::other(format!("{dir} does not start with {root}")))?
                .to_owned();
            (root, relative)
        }
        None => (Utf8PathBuf::from("."), dir.to_owned()),
    };
    let handle = fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?;
    Ok((handle, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::{Read, Write};
    use tempfile::TempDir;

    #[fixture]
    fn scratch() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn create_then_open_round_trips(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let path = root.join("nested/deeper/chunk.json");

        let mut file = create_file(&path).expect("create");
        file.write_all(b"[\n]\n").expect("write");
        drop(file);

        let mut text = String::new();
        open_file(&path)
            .expect("open")
            .read_to_string(&mut text)
            .expect("read");
        assert_eq!(text, "[\n]\n");
        assert!(is_file(&path).expect("stat"));
    }

    #[rstest]
    fn rename_replaces_target(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let partial = root.join("chunk.json.bz2.partial");
        let done = root.join("chunk.json.bz2");
        create_file(&partial).expect("create partial");

        rename_file(&partial, &done).expect("rename");

        assert!(!is_file(&partial).expect("stat partial"));
        assert!(is_file(&done).expect("stat done"));
    }

    #[rstest]
    fn rename_refuses_cross_directory_moves(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let from = root.join("a.json");
        create_file(&from).expect("create");

        let err = rename_file(&from, &root.join("sub/a.json")).expect_err("cross-dir");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn remove_deletes_file(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        let path = root.join("gone.json");
        create_file(&path).expect("create");

        remove_file(&path).expect("remove");
        assert!(!is_file(&path).expect("stat"));
    }

    #[rstest]
    fn missing_paths_are_not_files(scratch: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = scratch;
        assert!(!is_file(&root.join("absent.json")).expect("stat"));
        assert!(!is_file(&root.join("absent/dir/file.json")).expect("stat"));
        assert!(!is_file(&root).expect("directory is not a file"));
    }

    #[rstest]
    fn ensure_parent_dir_accepts_bare_names() {
        ensure_parent_dir(Utf8Path::new("dump.json")).expect("no parent to create");
    }
}
