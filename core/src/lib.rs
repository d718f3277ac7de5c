pub mod cluster;
pub mod document;
pub mod error;
pub mod input;
pub mod present;
pub mod similarity;
pub mod tokenizer;
pub mod vocabulary;

pub use cluster::{cluster_documents, Cluster, ClusterConfig, ClusterMap, ClusterSummary, GreedyClusterer, Member, DEFAULT_THRESHOLD};
pub use document::Document;
pub use error::{ClusterError, Result};
pub use similarity::cosine_similarity;
pub use vocabulary::{DocumentVector, Vocabulary};
