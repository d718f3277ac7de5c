//! Greedy single-pass clustering over presence vectors.
//!
//! Documents are visited in batch order. Each one is compared against every
//! member of every existing cluster, clusters in id order and members in
//! insertion order, and joins the cluster of the first member whose cosine
//! similarity is strictly above the threshold. A document that matches
//! nothing opens the next cluster id.
//!
//! This is first-match, not best-match: the output depends on input order and
//! clusters are never rebalanced. Worst case is O(n² · |V|).

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{ClusterError, Result};
use crate::similarity::cosine_similarity;
use crate::vocabulary::{DocumentVector, Vocabulary};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

fn default_threshold() -> f64 { DEFAULT_THRESHOLD }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Minimum cosine similarity, exclusive, for joining an existing cluster.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self { Self { threshold: DEFAULT_THRESHOLD } }
}

impl ClusterConfig {
    pub fn new(threshold: f64) -> Result<Self> {
        let config = Self { threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_finite() && (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(ClusterError::InvalidThreshold(self.threshold))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub document: Document,
    pub vector: DocumentVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: usize,
    /// Members in the order they were assigned.
    pub members: Vec<Member>,
}

impl Cluster {
    pub fn len(&self) -> usize { self.members.len() }

    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.members.iter().map(|m| &m.document)
    }
}

/// Cluster id to members. Ids are dense and equal to the position in
/// creation order, so iteration is in ascending id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterMap {
    clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub size: usize,
    pub members: Vec<Document>,
}

impl ClusterMap {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.clusters.len() }

    pub fn is_empty(&self) -> bool { self.clusters.is_empty() }

    pub fn get(&self, id: usize) -> Option<&Cluster> { self.clusters.get(id) }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> { self.clusters.iter() }

    /// Total number of documents across all clusters.
    pub fn num_documents(&self) -> usize { self.clusters.iter().map(Cluster::len).sum() }

    /// Id of the first cluster holding a member with similarity above
    /// `threshold`, scanning clusters and members in order.
    pub fn find_match(&self, vector: &DocumentVector, threshold: f64) -> Result<Option<usize>> {
        for cluster in &self.clusters {
            for member in &cluster.members {
                if cosine_similarity(&member.vector, vector)? > threshold {
                    return Ok(Some(cluster.id));
                }
            }
        }
        Ok(None)
    }

    fn open(&mut self, member: Member) -> usize {
        let id = self.clusters.len();
        self.clusters.push(Cluster { id, members: vec![member] });
        id
    }

    fn append(&mut self, id: usize, member: Member) {
        self.clusters[id].members.push(member);
    }

    pub fn summaries(&self) -> Vec<ClusterSummary> {
        self.clusters
            .iter()
            .map(|c| ClusterSummary { id: c.id, size: c.len(), members: c.documents().cloned().collect() })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ClusterMap {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter { self.clusters.iter() }
}

/// Runs the greedy assignment for one batch. Holds only configuration; every
/// call builds its own vocabulary and result, so runs never see each other.
#[derive(Debug, Clone, Default)]
pub struct GreedyClusterer {
    config: ClusterConfig,
}

impl GreedyClusterer {
    pub fn new(config: ClusterConfig) -> Self { Self { config } }

    pub fn config(&self) -> &ClusterConfig { &self.config }

    pub fn cluster(&self, docs: &[Document]) -> Result<ClusterMap> {
        self.config.validate()?;
        let vocab = Vocabulary::build(docs);
        let mut map = ClusterMap::new();
        for (idx, doc) in docs.iter().enumerate() {
            let vector = vocab.vectorize(doc);
            let member = Member { document: doc.clone(), vector };
            match map.find_match(&member.vector, self.config.threshold)? {
                Some(id) => {
                    tracing::trace!(doc = idx, cluster = id, "joined cluster");
                    map.append(id, member);
                }
                None => {
                    let id = map.open(member);
                    tracing::trace!(doc = idx, cluster = id, "opened cluster");
                }
            }
        }
        tracing::debug!(
            num_docs = docs.len(),
            num_terms = vocab.len(),
            num_clusters = map.len(),
            threshold = self.config.threshold,
            "clustering complete"
        );
        Ok(map)
    }
}

/// Cluster `docs` with the given threshold.
pub fn cluster_documents(docs: &[Document], threshold: f64) -> Result<ClusterMap> {
    GreedyClusterer::new(ClusterConfig::new(threshold)?).cluster(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().map(|t| Document::new(*t)).collect()
    }

    fn texts(map: &ClusterMap) -> Vec<Vec<String>> {
        map.iter().map(|c| c.documents().map(|d| d.text.clone()).collect()).collect()
    }

    #[test]
    fn match_in_later_cluster_joins_that_cluster() {
        // "b x" matches member 0 of cluster 1 and must land in cluster 1
        let map = cluster_documents(&docs(&["a", "b", "b x"]), 0.5).unwrap();
        assert_eq!(texts(&map), vec![vec!["a"], vec!["b", "b x"]]);
    }

    #[test]
    fn first_match_wins_over_better_match() {
        // "a c d" scores 0.408 against "a b" but 0.816 against "c d"
        let map = cluster_documents(&docs(&["a b", "c d", "a c d"]), 0.4).unwrap();
        assert_eq!(texts(&map), vec![vec!["a b", "a c d"], vec!["c d"]]);
    }

    #[test]
    fn threshold_is_strict() {
        // cosine("a b", "b c") == 0.5 exactly
        let at = cluster_documents(&docs(&["a b", "b c"]), 0.5).unwrap();
        assert_eq!(at.len(), 2);
        let below = cluster_documents(&docs(&["a b", "b c"]), 0.49).unwrap();
        assert_eq!(below.len(), 1);
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        assert!(matches!(ClusterConfig::new(f64::NAN), Err(ClusterError::InvalidThreshold(_))));
        assert!(matches!(ClusterConfig::new(1.5), Err(ClusterError::InvalidThreshold(_))));
        assert!(matches!(ClusterConfig::new(-0.1), Err(ClusterError::InvalidThreshold(_))));
        assert!(ClusterConfig::new(0.0).is_ok());
        assert!(ClusterConfig::new(1.0).is_ok());
    }

    #[test]
    fn config_deserializes_with_default_threshold() {
        let cfg: ClusterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ClusterConfig::default());
        let cfg: ClusterConfig = serde_json::from_str(r#"{"threshold":0.8}"#).unwrap();
        assert_eq!(cfg.threshold, 0.8);
    }

    #[test]
    fn foreign_vector_aborts_lookup() {
        let map = cluster_documents(&docs(&["a b"]), 0.5).unwrap();
        let wider = Vocabulary::build(&docs(&["a b c"]));
        let v = wider.vectorize(&Document::new("a b"));
        assert_eq!(map.find_match(&v, 0.5), Err(ClusterError::DimensionMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn clusterer_keeps_its_config() {
        let clusterer = GreedyClusterer::new(ClusterConfig::new(0.8).unwrap());
        assert_eq!(clusterer.config().threshold, 0.8);
        assert_eq!(GreedyClusterer::default().config(), &ClusterConfig::default());
    }

    #[test]
    fn find_match_on_empty_map_is_none() {
        let vocab = Vocabulary::build(&docs(&["a"]));
        let v = vocab.vectorize(&Document::new("a"));
        assert_eq!(ClusterMap::new().find_match(&v, 0.5).unwrap(), None);
    }
}
