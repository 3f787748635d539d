//! TF-IDF vectorization over word n-grams.

use std::collections::{BTreeMap, HashMap};

use super::tokenizer::word_ngrams;
use crate::config::VectorizerConfig;

/// Vectorizer settings. Rows produced by [`TfidfVectorizer::fit_transform`] are
/// L2-normalized, so the dot product of two rows is their cosine similarity.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    pub ngram_max: usize,
    pub max_features: usize,
    pub remove_stop_words: bool,
}

/// Dense document-term matrix with its (sorted) vocabulary
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    pub fn new(config: &VectorizerConfig, remove_stop_words: bool) -> Self {
        Self {
            ngram_max: config.ngram_max,
            max_features: config.max_features,
            remove_stop_words,
        }
    }

    /// Learn the vocabulary and idf weights from `documents` and return their
    /// weighted, L2-normalized vectors (one row per document, in input order).
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| word_ngrams(doc.as_ref(), self.ngram_max, self.remove_stop_words))
            .collect();

        // Per-document term counts and corpus totals
        let mut doc_counts: Vec<HashMap<&str, usize>> = Vec::with_capacity(analyzed.len());
        let mut corpus_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for grams in &analyzed {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for gram in grams {
                *counts.entry(gram.as_str()).or_insert(0) += 1;
                *corpus_counts.entry(gram.as_str()).or_insert(0) += 1;
            }
            doc_counts.push(counts);
        }

        let vocabulary = self.select_vocabulary(&corpus_counts);
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let n_docs = documents.len() as f64;
        let mut doc_freq = vec![0usize; vocabulary.len()];
        for counts in &doc_counts {
            for term in counts.keys() {
                if let Some(&col) = index.get(term) {
                    doc_freq[col] += 1;
                }
            }
        }
        // Smoothed idf: as if one extra document contained every term once
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = doc_counts
            .iter()
            .map(|counts| {
                let mut row = vec![0.0; vocabulary.len()];
                for (term, &count) in counts {
                    if let Some(&col) = index.get(term) {
                        row[col] = count as f64 * idf[col];
                    }
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        log::debug!(
            "TF-IDF: {} documents, {} terms (from {} candidates)",
            documents.len(),
            vocabulary.len(),
            corpus_counts.len()
        );

        TfidfMatrix { vocabulary, rows }
    }

    /// Keep the `max_features` most frequent terms (ties by term order), returned sorted.
    fn select_vocabulary(&self, corpus_counts: &BTreeMap<&str, usize>) -> Vec<String> {
        let mut terms: Vec<(&str, usize)> = corpus_counts.iter().map(|(t, c)| (*t, *c)).collect();
        if terms.len() > self.max_features {
            // BTreeMap iteration is already term-ordered and the sort is stable
            terms.sort_by(|a, b| b.1.cmp(&a.1));
            terms.truncate(self.max_features);
            terms.sort_by(|a, b| a.0.cmp(b.0));
        }
        terms.into_iter().map(|(t, _)| t.to_string()).collect()
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

impl TfidfMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_vocabulary_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Dot product of two rows
    pub fn dot(&self, i: usize, j: usize) -> f64 {
        self.rows[i]
            .iter()
            .zip(self.rows[j].iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// All pairwise row dot products
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.n_rows();
        let mut sim = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let s = self.dot(i, j);
                sim[i][j] = s;
                sim[j][i] = s;
            }
        }
        sim
    }
}
