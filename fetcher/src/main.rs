use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use cluster_core::input::write_jsonl;
use cluster_core::present::{write_clusters, write_clusters_json};
use cluster_core::{ClusterConfig, GreedyClusterer, DEFAULT_THRESHOLD};
use fetcher::{basic_token, ApiConfig, SearchClient, DEFAULT_API_BASE};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Search posts and group the results into clusters of similar text")]
struct Cli {
    /// Search query
    #[arg(long, short = 'q')]
    query: String,
    /// API key; with --secret it is exchanged for a bearer token
    #[arg(long)]
    key: Option<String>,
    /// API secret
    #[arg(long)]
    secret: Option<String>,
    /// Bearer token to use directly (falls back to SEARCH_BEARER_TOKEN)
    #[arg(long)]
    bearer_token: Option<String>,
    /// API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent header
    #[arg(long, default_value = "post-clusterer/0.1")]
    user_agent: String,
    /// Minimum cosine similarity (exclusive) to join an existing cluster
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
    /// Also save the fetched documents to this JSONL file
    #[arg(long)]
    output: Option<String>,
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

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let args = Cli::parse();
    let config = ClusterConfig::new(args.threshold)?;

    let mut api = ApiConfig::new(&args.api_base)?;
    api.user_agent = args.user_agent.clone();
    api.timeout = Duration::from_secs(args.timeout_secs);
    let client = SearchClient::new(api)?;

    let bearer = if args.key.is_some() || args.secret.is_some() {
        let basic = basic_token(args.key.as_deref().unwrap_or(""), args.secret.as_deref().unwrap_or(""));
        client.bearer_token(&basic).await.context("exchanging key/secret for a bearer token")?
    } else {
        args.bearer_token
            .clone()
            .or_else(|| std::env::var("SEARCH_BEARER_TOKEN").ok())
            .ok_or_else(|| anyhow!("no credentials: pass --key/--secret, --bearer-token or set SEARCH_BEARER_TOKEN"))?
    };

    let docs = client.search(&bearer, &args.query).await?.into_documents();

    if let Some(path) = &args.output {
        if let Some(dir) = std::path::Path::new(path).parent() {
            fs::create_dir_all(dir).ok();
        }
        let f = File::create(path).with_context(|| format!("creating {path}"))?;
        write_jsonl(BufWriter::new(f), &docs)?;
        tracing::info!(path = %path, num_docs = docs.len(), "saved documents");
    }

    let clusterer = GreedyClusterer::new(config);
    let map = clusterer.cluster(&docs)?;
    tracing::info!(
        num_docs = docs.len(),
        num_clusters = map.len(),
        threshold = clusterer.config().threshold,
        "clustered search results"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    match args.format {
        Format::Text => write_clusters(&mut out, &map)?,
        Format::Json => write_clusters_json(&mut out, &map)?,
    }
    out.flush()?;
    Ok(())
}
