//! Unit tests for dump reading, chunking and writing.

use super::*;
use bzip2::{Compression as BzLevel, write::BzEncoder};
use camino::{Utf8Path, Utf8PathBuf};
use flate2::{Compression as GzLevel, write::GzEncoder};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::io::Write;
use tempfile::TempDir;
use wikigraph_core::{ClaimSource, Entity, EntityKind, test_support::item_json};

struct Scratch {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Scratch { _dir: dir, root }
}

fn dump_text(values: &[Value]) -> String {
    let lines: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[\n{}\n]\n", lines.join(",\n"))
}

fn items(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| item_json(&format!("Q{n}"), &format!("item {n}"), Vec::new()))
        .collect()
}

fn write_dump(path: &Utf8Path, text: &str) {
    let bytes = match Compression::split_file_name(path.as_str()).map(|(c, _)| c) {
        Some(Compression::Bzip2) => {
            let mut encoder = BzEncoder::new(Vec::new(), BzLevel::fast());
            encoder.write_all(text.as_bytes()).expect("bz2 encode");
            encoder.finish().expect("bz2 finish")
        }
        Some(Compression::Gzip) => {
            let mut encoder = GzEncoder::new(Vec::new(), GzLevel::fast());
            encoder.write_all(text.as_bytes()).expect("gz encode");
            encoder.finish().expect("gz finish")
        }
        _ => text.as_bytes().to_vec(),
    };
    std::fs::write(path, bytes).expect("write dump");
}

fn read_values(path: &Utf8Path) -> Vec<Value> {
    JsonDump::new(path)
        .expect("dump name")
        .values()
        .expect("open")
        .collect::<Result<_, _>>()
        .expect("values")
}

#[rstest]
#[case("dump.json")]
#[case("dump.json.bz2")]
#[case("dump.json.gz")]
fn values_decode_every_encoding(scratch: Scratch, #[case] name: &str) {
    let path = scratch.path(name);
    let expected = items(3);
    write_dump(&path, &dump_text(&expected));

    assert_eq!(read_values(&path), expected);
}

#[rstest]
fn traversal_can_be_repeated(scratch: Scratch) {
    let path = scratch.path("dump.json.gz");
    write_dump(&path, &dump_text(&items(4)));
    let dump = JsonDump::new(path).expect("dump");

    let first = dump.values().expect("open").count();
    let second = dump.values().expect("reopen").count();
    assert_eq!((first, second), (4, 4));
}

#[rstest]
fn lines_include_brackets_with_numbers(scratch: Scratch) {
    let path = scratch.path("dump.json");
    write_dump(&path, &dump_text(&items(2)));

    let lines: Vec<DumpLine> = JsonDump::new(path)
        .expect("dump")
        .lines()
        .expect("open")
        .collect::<Result<_, _>>()
        .expect("lines");

    assert_eq!(lines.len(), 4);
    assert_eq!(lines.first().map(|l| l.text.as_str()), Some("["));
    assert_eq!(lines.last().map(|l| (l.number, l.text.as_str())), Some((4, "]")));
    assert!(lines.iter().skip(1).take(2).all(|l| l.entity_text().is_some()));
}

#[rstest]
#[case("{\"id\":\"Q1\"},", Some("{\"id\":\"Q1\"}"))]
#[case("{\"id\":\"Q1\"}", Some("{\"id\":\"Q1\"}"))]
#[case("{\"id\":\"Q1\"},\r", Some("{\"id\":\"Q1\"}"))]
#[case("[", None)]
#[case(" ] ", None)]
#[case("", None)]
fn entity_text_strips_separators(#[case] line: &str, #[case] expected: Option<&str>) {
    assert_eq!(reader::entity_text(line), expected);
}

#[rstest]
#[case("dump.jsonl")]
#[case("dump.json.zst")]
#[case("dump.txt")]
fn unsupported_names_are_rejected(#[case] name: &str) {
    let err = JsonDump::new(name).expect_err("unsupported");
    assert!(matches!(err, DumpError::UnsupportedFileName { ref path } if path == name));
}

#[rstest]
fn missing_file_fails_on_open(scratch: Scratch) {
    let dump = JsonDump::new(scratch.path("absent.json")).expect("name is fine");
    assert!(matches!(dump.values(), Err(DumpError::Open { .. })));
}

#[rstest]
fn malformed_json_reports_its_line(scratch: Scratch) {
    let path = scratch.path("dump.json");
    write_dump(&path, "[\n{\"id\":\"Q1\"},\n{\"id\":\n]\n");

    let results: Vec<_> = JsonDump::new(path)
        .expect("dump")
        .values()
        .expect("open")
        .collect();

    assert_eq!(results.len(), 2);
    assert!(matches!(
        results.last(),
        Some(Err(DumpError::ParseLine { line: 3, .. }))
    ));
}

#[rstest]
fn invalid_utf8_reports_its_line(scratch: Scratch) {
    let path = scratch.path("dump.json");
    std::fs::write(&path, b"[\n{\"id\":\"Q1\xff\"}\n]\n").expect("write");

    let first = JsonDump::new(path)
        .expect("dump")
        .values()
        .expect("open")
        .next();

    assert!(matches!(first, Some(Err(DumpError::InvalidUtf8 { line: 2, .. }))));
}

#[rstest]
fn entities_decode_typed_records(scratch: Scratch) {
    let path = scratch.path("dump.json.bz2");
    let mut values = items(2);
    values.push(json!({
        "type": "property", "id": "P31", "datatype": "wikibase-item",
        "labels": {}, "descriptions": {}, "aliases": {}, "claims": {},
    }));
    write_dump(&path, &dump_text(&values));

    let entities: Vec<Entity> = JsonDump::new(path)
        .expect("dump")
        .entities()
        .expect("open")
        .collect::<Result<_, _>>()
        .expect("entities");

    let kinds: Vec<EntityKind> = entities.iter().map(Entity::kind).collect();
    assert_eq!(kinds, [EntityKind::Item, EntityKind::Item, EntityKind::Property]);
}

#[rstest]
fn schema_failures_report_their_line(scratch: Scratch) {
    let path = scratch.path("dump.json");
    write_dump(&path, &dump_text(&[json!({"type": "item", "id": "Q1"})]));

    let first = JsonDump::new(path)
        .expect("dump")
        .entities()
        .expect("open")
        .next();

    assert!(matches!(first, Some(Err(DumpError::Decode { line: 2, .. }))));
}

#[rstest]
fn chunks_split_into_full_and_partial_batches(scratch: Scratch) {
    let path = scratch.path("wikidata-20190401-all.json");
    write_dump(&path, &dump_text(&items(250)));

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(&ChunkOptions::new())
        .expect("chunks");

    let names: Vec<&str> = chunks.iter().filter_map(|c| c.file_name()).collect();
    assert_eq!(
        names,
        [
            "wikidata-20190401-all-ichunk_0.json",
            "wikidata-20190401-all-ichunk_1.json",
            "wikidata-20190401-all-ichunk_2.json",
        ]
    );
    let sizes: Vec<usize> = chunks.iter().map(|c| read_values(c).len()).collect();
    assert_eq!(sizes, [100, 100, 50]);
}

fn on_path(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--help")
        .output()
        .is_ok()
}

#[rstest]
#[case(Compressor::bzip2(), "bz2")]
#[case(Compressor::gzip(), "gz")]
fn compressed_chunks_replace_plain_files(
    scratch: Scratch,
    #[case] compressor: Compressor,
    #[case] extension: &str,
) {
    if !on_path(compressor.program()) {
        eprintln!("skipping: {} is not installed", compressor.program());
        return;
    }
    let path = scratch.path("wikidata-20190401-all.json");
    write_dump(&path, &dump_text(&items(250)));

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(&ChunkOptions::new().with_compressor(compressor))
        .expect("chunks");

    let names: Vec<&str> = chunks.iter().filter_map(|c| c.file_name()).collect();
    let expected: Vec<String> = (0..3)
        .map(|n| format!("wikidata-20190401-all-ichunk_{n}.json.{extension}"))
        .collect();
    assert_eq!(names, expected);
    let sizes: Vec<usize> = chunks.iter().map(|c| read_values(c).len()).collect();
    assert_eq!(sizes, [100, 100, 50]);

    let leftovers: Vec<String> = std::fs::read_dir(&scratch.root)
        .expect("list scratch dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains("-ichunk_"))
        .filter(|name| name.ends_with(".json") || name.ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty(), "uncompressed chunks left behind: {leftovers:?}");
}

#[rstest]
fn max_chunks_stops_early(scratch: Scratch) {
    let path = scratch.path("dump.json");
    write_dump(&path, &dump_text(&items(250)));

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(&ChunkOptions::new().with_max_chunks(2))
        .expect("chunks");

    assert_eq!(chunks.len(), 2);
    assert!(!scratch.path("dump-ichunk_2.json").exists());
}

#[rstest]
fn zero_max_chunks_writes_nothing(scratch: Scratch) {
    let path = scratch.path("dump.json");
    write_dump(&path, &dump_text(&items(3)));

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(&ChunkOptions::new().with_max_chunks(0))
        .expect("chunks");

    assert!(chunks.is_empty());
}

#[rstest]
fn zero_chunk_size_is_rejected(scratch: Scratch) {
    let dump = JsonDump::new(scratch.path("dump.json")).expect("dump");
    let err = dump
        .create_chunks(&ChunkOptions::new().with_lines_per_chunk(0))
        .expect_err("invalid size");
    assert!(matches!(err, DumpError::InvalidChunkSize));
}

#[rstest]
fn jsonl_chunks_hold_one_value_per_line(scratch: Scratch) {
    let path = scratch.path("dump.json.gz");
    let values = items(3);
    write_dump(&path, &dump_text(&values));

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(
            &ChunkOptions::new()
                .with_format(ChunkFormat::Jsonl)
                .with_output_base(scratch.path("out/part")),
        )
        .expect("chunks");

    let chunk = chunks.first().expect("one chunk");
    assert_eq!(chunk, &scratch.path("out/part-ichunk_0.jsonl"));
    let text = std::fs::read_to_string(chunk).expect("read chunk");
    let parsed: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(parsed, values);
}

#[rstest]
fn chunks_reproduce_source_lines(scratch: Scratch) {
    let path = scratch.path("dump.json");
    let text = "[\n{\"b\":1,\"a\":2},\n{\"id\":\"Q2\"}\n]\n";
    write_dump(&path, text);

    let chunks = JsonDump::new(path)
        .expect("dump")
        .create_chunks(&ChunkOptions::new())
        .expect("chunks");

    let chunk = chunks.first().expect("one chunk");
    assert_eq!(std::fs::read_to_string(chunk).expect("read"), text);
}

#[rstest]
fn chunk_names_follow_dump_convention() {
    assert_eq!(
        chunk_path(Utf8Path::new("d/wikidata-20190401-all"), 7, ChunkFormat::Jsonl),
        "d/wikidata-20190401-all-ichunk_7.jsonl"
    );
}

#[rstest]
fn filtered_selection_round_trips(scratch: Scratch) {
    let path = scratch.path("dump.json.bz2");
    let source = dump_text(&items(5));
    write_dump(&path, &source);

    let selected: Vec<Entity> = JsonDump::new(&path)
        .expect("dump")
        .entities()
        .expect("open")
        .filter_map(Result::ok)
        .filter(|entity| entity.entity_id().as_str() != "Q3")
        .collect();
    assert!(selected.iter().all(|e| e.claim_groups().is_ok()));
    let out = scratch.path("selected.json");
    write_entities(&selected, &out).expect("write");

    let expected: Vec<Value> = selected.into_iter().map(Entity::into_json).collect();
    assert_eq!(read_values(&out), expected);
}

#[rstest]
fn writing_nothing_yields_an_empty_array(scratch: Scratch) {
    let out = scratch.path("empty.json");
    write_entities(Vec::<Value>::new(), &out).expect("write");

    assert_eq!(std::fs::read_to_string(&out).expect("read"), "[\n\n]\n");
    assert!(read_values(&out).is_empty());
}
