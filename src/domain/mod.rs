//! Business domain identification: context extraction, clustering, naming,
//! and consolidation of near-duplicate domains.

pub mod clusterer;
pub mod consolidator;
pub mod context;
pub mod namer;
pub mod pipeline;

pub use clusterer::DomainClusterer;
pub use consolidator::{group_similar_domains, DomainConsolidator};
pub use context::{extract_context, BusinessContext};
pub use namer::{name_domain, title_case, GENERAL_DOMAIN};
pub use pipeline::{identify_domains, PipelineSettings};

use crate::triples::Triple;

/// A triple annotated with the domain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub domain_name: String,
    pub triple: Triple,
}

impl DomainRecord {
    pub fn new(domain_name: impl Into<String>, triple: Triple) -> Self {
        Self {
            domain_name: domain_name.into(),
            triple,
        }
    }
}

/// Suffix every domain name carries
pub const MANAGEMENT: &str = "Management";

/// Append " Management" unless the name already contains it
pub(crate) fn with_management_suffix(name: &str) -> String {
    if name.contains(MANAGEMENT) {
        name.to_string()
    } else {
        format!("{} {}", name, MANAGEMENT)
    }
}

/// Most frequent value, ties broken by first appearance.
pub(crate) fn mode_first_seen<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    ranked_by_frequency(values).into_iter().next().map(|(v, _)| v)
}

/// Distinct values with their counts, most frequent first; equal counts
/// keep first-appearance order.
pub(crate) fn ranked_by_frequency<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, c)) => *c += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
