//! Reading and writing document batches as JSON / JSONL.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::document::Document;

/// One document per non-blank line.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: Document = serde_json::from_str(&line).with_context(|| format!("line {}", lineno + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

/// A JSON array of documents or a single document object. Any other JSON
/// value holds no documents.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Document>> {
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Document>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

/// Load a `.jsonl` file line by line, anything else as JSON.
pub fn load_file(path: &Path) -> Result<Vec<Document>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    let docs = if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        read_jsonl(reader)
    } else {
        read_json(reader)
    };
    docs.with_context(|| format!("parsing {}", path.display()))
}

pub fn write_jsonl<W: Write>(mut out: W, docs: &[Document]) -> Result<()> {
    for doc in docs {
        serde_json::to_writer(&mut out, doc)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
