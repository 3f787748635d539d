use std::collections::HashMap;

use crate::config::{ConsolidationConfig, VectorizerConfig};
use crate::text::TfidfVectorizer;

use super::{mode_first_seen, with_management_suffix, DomainRecord};

/// Merges domains whose aggregate text profiles are too similar to stay apart.
#[derive(Debug, Clone)]
pub struct DomainConsolidator {
    vectorizer: TfidfVectorizer,
    threshold: f64,
}

impl DomainConsolidator {
    pub fn new(vectorizer: &VectorizerConfig, consolidation: &ConsolidationConfig) -> Self {
        Self {
            // Stop words stay in: profiles are compared on their full wording
            vectorizer: TfidfVectorizer::new(vectorizer, false),
            threshold: consolidation.similarity_threshold,
        }
    }

    /// Rename the records of merged domains to their group's canonical name.
    ///
    /// Row count, row order and triple fields are preserved; only
    /// `domain_name` may change.
    ///
    /// This is a single greedy pass, not a fixpoint. A merged domain's
    /// combined profile can clear the threshold against another domain, so
    /// calling `consolidate` again on the output may merge further.
    pub fn consolidate(&self, mut records: Vec<DomainRecord>) -> Vec<DomainRecord> {
        let domains = distinct_domains(&records);
        if domains.len() < 2 {
            return records;
        }

        let profiles: Vec<String> = domains
            .iter()
            .map(|domain| domain_profile(&records, domain))
            .collect();
        let similarity = self.vectorizer.fit_transform(&profiles).similarity_matrix();
        let groups = group_similar_domains(&similarity, self.threshold);

        let mut mapping: HashMap<&str, String> = HashMap::new();
        for group in &groups {
            let members: Vec<&str> = group.iter().map(|&i| domains[i]).collect();
            if members.len() == 1 {
                mapping.insert(members[0], members[0].to_string());
                continue;
            }

            let canonical = canonical_name(&records, &members);
            log::info!("Merging domains {:?} into '{}'", members, canonical);
            for member in members {
                mapping.insert(member, canonical.clone());
            }
        }

        let domain_count = domains.len();
        let renamed: Vec<String> = records
            .iter()
            .map(|r| {
                mapping
                    .get(r.domain_name.as_str())
                    .cloned()
                    .unwrap_or_else(|| r.domain_name.clone())
            })
            .collect();
        for (record, name) in records.iter_mut().zip(renamed) {
            record.domain_name = name;
        }

        log::info!(
            "Consolidated {} domains into {}",
            domain_count,
            distinct_domains(&records).len()
        );
        records
    }
}

/// Domain names in order of first appearance
fn distinct_domains(records: &[DomainRecord]) -> Vec<&str> {
    let mut domains: Vec<&str> = Vec::new();
    for record in records {
        if !domains.contains(&record.domain_name.as_str()) {
            domains.push(record.domain_name.as_str());
        }
    }
    domains
}

/// All triples of a domain rendered as text, in row order
fn domain_profile(records: &[DomainRecord], domain: &str) -> String {
    records
        .iter()
        .filter(|r| r.domain_name == domain)
        .map(|r| r.triple.render())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Most frequent `Entity B` across the grouped domains, suffixed with " Management"
fn canonical_name(records: &[DomainRecord], members: &[&str]) -> String {
    let entity_bs = records
        .iter()
        .filter(|r| members.contains(&r.domain_name.as_str()))
        .map(|r| r.triple.entity_b.trim());
    match mode_first_seen(entity_bs) {
        Some(entity_b) => with_management_suffix(entity_b),
        None => members[0].to_string(),
    }
}

/// Single greedy pass over domains in order: each unclaimed domain claims
/// every later unclaimed domain whose similarity with it exceeds
/// `threshold`. A claimed domain is never compared again, so grouping is not
/// transitive.
pub fn group_similar_domains(similarity: &[Vec<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let n = similarity.len();
    let mut processed = vec![false; n];
    let mut groups = Vec::new();

    for i in 0..n {
        if processed[i] {
            continue;
        }
        let mut group = vec![i];
        for j in 0..n {
            if i != j && !processed[j] && similarity[i][j] > threshold {
                group.push(j);
            }
        }
        for &member in &group {
            processed[member] = true;
        }
        groups.push(group);
    }

    groups
}
