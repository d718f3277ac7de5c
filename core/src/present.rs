use std::io::{self, Write};

use crate::cluster::ClusterMap;

/// Write one tab-separated line per document, `#` after each cluster:
///
/// ```text
/// <cluster_id>\t<author_handle>\t<created_at>\t<text>
/// ```
///
/// Newlines inside the text are flattened to spaces. Missing fields print
/// as empty columns.
pub fn write_clusters<W: Write>(out: &mut W, map: &ClusterMap) -> io::Result<()> {
    for cluster in map {
        for doc in cluster.documents() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                cluster.id,
                doc.author_handle.as_deref().unwrap_or(""),
                doc.created_at.as_deref().unwrap_or(""),
                doc.text.replace('\n', " "),
            )?;
        }
        writeln!(out, "#")?;
    }
    Ok(())
}

/// Pretty JSON array of cluster summaries.
pub fn write_clusters_json<W: Write>(out: &mut W, map: &ClusterMap) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &map.summaries())?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cluster_documents, Document};

    #[test]
    fn lines_and_delimiters() {
        let docs = vec![
            Document::new("cat dog").with_author("alice").with_created_at("Mon"),
            Document::new("dog\ncat").with_author("bob").with_created_at("Tue"),
            Document::new("fish boat"),
        ];
        let map = cluster_documents(&docs, 0.5).unwrap();
        let mut buf = Vec::new();
        write_clusters(&mut buf, &map).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "0\talice\tMon\tcat dog\n0\tbob\tTue\tdog cat\n#\n1\t\t\tfish boat\n#\n");
    }

    #[test]
    fn empty_map_writes_nothing() {
        let mut buf = Vec::new();
        write_clusters(&mut buf, &ClusterMap::new()).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn json_lists_members() {
        let map = cluster_documents(&[Document::new("x y")], 0.5).unwrap();
        let mut buf = Vec::new();
        write_clusters_json(&mut buf, &map).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v[0]["id"], 0);
        assert_eq!(v[0]["size"], 1);
        assert_eq!(v[0]["members"][0]["text"], "x y");
    }
}
