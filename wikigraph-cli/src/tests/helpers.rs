//! Test helpers for building dump files on disk.

use bzip2::{Compression as BzLevel, write::BzEncoder};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::io::Write;
use tempfile::TempDir;
use wikigraph_core::test_support::{claim_json, item_json};

/// A temporary directory holding generated dumps.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `values` in dump layout, bzip2-compressed for `.bz2` names.
    pub(super) fn write_dump(&self, name: &str, values: &[Value]) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, &encode(&path, &dump_text(values)));
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

pub(super) fn dump_text(values: &[Value]) -> String {
    let lines: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[\n{}\n]\n", lines.join(",\n"))
}

fn encode(path: &Utf8Path, text: &str) -> Vec<u8> {
    if path.extension() == Some("bz2") {
        let mut encoder = BzEncoder::new(Vec::new(), BzLevel::fast());
        encoder.write_all(text.as_bytes()).expect("bz2 encode");
        encoder.finish().expect("bz2 finish")
    } else {
        text.as_bytes().to_vec()
    }
}

/// `count` unremarkable items `Q1..=Qcount`.
pub(super) fn plain_items(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| item_json(&format!("Q{n}"), &format!("item {n}"), Vec::new()))
        .collect()
}

/// Two politicians, one writer and one deprecated politician.
pub(super) fn occupations() -> Vec<Value> {
    vec![
        item_json(
            "Q1",
            "politician",
            vec![claim_json("Q1$a", "P106", "normal", "Q82955")],
        ),
        item_json("Q2", "writer", vec![claim_json("Q2$a", "P106", "normal", "Q36180")]),
        item_json(
            "Q3",
            "statesman",
            vec![
                claim_json("Q3$a", "P106", "preferred", "Q82955"),
                claim_json("Q3$b", "P106", "normal", "Q36180"),
            ],
        ),
        item_json(
            "Q4",
            "retired politician",
            vec![claim_json("Q4$a", "P106", "deprecated", "Q82955")],
        ),
    ]
}
