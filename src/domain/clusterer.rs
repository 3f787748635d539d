use crate::cluster::KMeans;
use crate::config::{ClusteringConfig, VectorizerConfig};
use crate::error::{DomainMeshError, Result};
use crate::text::TfidfVectorizer;

use super::BusinessContext;

/// Groups business contexts into at most `max_clusters` clusters by TF-IDF
/// similarity of their feature text.
#[derive(Debug, Clone)]
pub struct DomainClusterer {
    vectorizer: TfidfVectorizer,
    clustering: ClusteringConfig,
}

impl DomainClusterer {
    pub fn new(vectorizer: &VectorizerConfig, clustering: &ClusteringConfig) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(vectorizer, true),
            clustering: clustering.clone(),
        }
    }

    /// Same clusterer with a different k-means seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.clustering.seed = seed;
        self
    }

    /// Assign every context a cluster label.
    ///
    /// Returns one label per context, in input order. Labels are renumbered
    /// by first appearance, so they are dense: every label in
    /// `0..=max(labels)` has at least one member.
    pub fn cluster(&self, contexts: &[BusinessContext]) -> Result<Vec<usize>> {
        if contexts.is_empty() {
            return Err(DomainMeshError::InvalidInput(
                "cannot cluster an empty set of contexts".to_string(),
            ));
        }

        let features: Vec<String> = contexts.iter().map(BusinessContext::feature_text).collect();
        let matrix = self.vectorizer.fit_transform(&features);
        if matrix.is_vocabulary_empty() {
            return Err(DomainMeshError::InvalidInput(
                "empty vocabulary: every context consists only of stop words".to_string(),
            ));
        }

        let k = contexts.len().min(self.clustering.max_clusters.max(1));
        log::info!(
            "Clustering {} contexts into {} clusters (seed {})",
            contexts.len(),
            k,
            self.clustering.seed
        );

        let raw = KMeans::from_config(&self.clustering, k).fit_predict(&matrix.rows)?;
        Ok(renumber_by_first_appearance(&raw))
    }
}

fn renumber_by_first_appearance(labels: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<(usize, usize)> = Vec::new();
    labels
        .iter()
        .map(|&label| match mapping.iter().find(|(raw, _)| *raw == label) {
            Some(&(_, dense)) => dense,
            None => {
                let dense = mapping.len();
                mapping.push((label, dense));
                dense
            }
        })
        .collect()
}
