//! Writing a collection of entities as a single dump-shaped JSON file.

use camino::Utf8Path;
use wikigraph_core::EntityJson;

use super::{ChunkFormat, DumpError, chunk::write_lines};

/// Write the source JSON of every entity to `path` as one array with one
/// element per line, the layout [`JsonDump`](super::JsonDump) reads.
///
/// The mapping each entity was decoded from is written unchanged, with its
/// keys in their original order.
///
/// # Errors
///
/// Returns [`DumpError::CreateChunk`] when the file cannot be created and
/// [`DumpError::WriteChunk`] when serialising or writing fails.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use serde_json::json;
/// use wikigraph_data::dump::{JsonDump, write_entities};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = Utf8PathBuf::try_from(dir.path().join("selected.json"))?;
/// let entities = vec![json!({"id": "Q1"}), json!({"id": "Q2"})];
///
/// write_entities(&entities, &path)?;
/// assert_eq!(std::fs::read_to_string(&path)?, "[\n{\"id\":\"Q1\"},\n{\"id\":\"Q2\"}\n]\n");
/// assert_eq!(JsonDump::new(path)?.values()?.count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn write_entities<I>(entities: I, path: &Utf8Path) -> Result<(), DumpError>
where
    I: IntoIterator,
    I::Item: EntityJson,
{
    let lines = entities
        .into_iter()
        .map(|entity| serde_json::to_string(entity.as_json()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DumpError::WriteChunk {
            path: path.to_owned(),
            source: source.into(),
        })?;
    write_lines(path, &lines, ChunkFormat::Json)
}
