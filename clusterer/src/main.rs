use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cluster_core::input::{load_file, read_jsonl};
use cluster_core::present::{write_clusters, write_clusters_json};
use cluster_core::{ClusterConfig, Document, GreedyClusterer, DEFAULT_THRESHOLD};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "clusterer")]
#[command(about = "Group posts from JSON/JSONL files into clusters of similar text", long_about = None)]
struct Cli {
    /// Input path (file or directory). Reads JSONL from stdin when omitted or "-"
    #[arg(long)]
    input: Option<String>,
    /// Minimum cosine similarity (exclusive) to join an existing cluster
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tab-separated lines with a `#` after each cluster
    Text,
    /// JSON array of clusters
    Json,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let config = ClusterConfig::new(cli.threshold)?;

    let docs = match cli.input.as_deref() {
        None | Some("-") => read_jsonl(io::stdin().lock()).context("reading stdin")?,
        Some(input) => load_input(Path::new(input))?,
    };
    let clusterer = GreedyClusterer::new(config);
    tracing::info!(num_docs = docs.len(), threshold = clusterer.config().threshold, "loaded documents");

    let map = clusterer.cluster(&docs)?;
    tracing::info!(num_clusters = map.len(), "clustered documents");

    let mut out = BufWriter::new(io::stdout().lock());
    match cli.format {
        Format::Text => write_clusters(&mut out, &map)?,
        Format::Json => write_clusters_json(&mut out, &map)?,
    }
    out.flush()?;
    Ok(())
}

/// Files under a directory are read in sorted path order so the batch order,
/// and therefore the clustering, is reproducible.
fn load_input(input_path: &Path) -> Result<Vec<Document>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else {
        files.push(input_path.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        let batch = load_file(&file)?;
        tracing::debug!(file = %file.display(), num_docs = batch.len(), "read input file");
        docs.extend(batch);
    }
    Ok(docs)
}
