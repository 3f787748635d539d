//! Domain graph: domains linked by the entities they share.

use std::collections::{BTreeSet, HashMap};

use crate::domain::DomainRecord;

/// Two domains that share at least one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEdge {
    pub a: String,
    pub b: String,
    /// Shared entities, sorted
    pub shared: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DomainGraph {
    /// Domains in order of first appearance
    domains: Vec<String>,
    /// Edges sorted by (a, b)
    edges: Vec<DomainEdge>,
}

impl DomainGraph {
    /// Collect every domain's entities (Entity A and Entity B) and link each
    /// pair of domains whose entity sets intersect.
    pub fn from_records(records: &[DomainRecord]) -> Self {
        let mut domains: Vec<String> = Vec::new();
        let mut entities: HashMap<&str, BTreeSet<&str>> = HashMap::new();

        for record in records {
            let domain = record.domain_name.as_str();
            if !entities.contains_key(domain) {
                domains.push(domain.to_string());
            }
            let set = entities.entry(domain).or_default();
            set.insert(record.triple.entity_a.as_str());
            set.insert(record.triple.entity_b.as_str());
        }

        let mut edges = Vec::new();
        for (i, a) in domains.iter().enumerate() {
            for b in &domains[i + 1..] {
                let shared: Vec<String> = entities[a.as_str()]
                    .intersection(&entities[b.as_str()])
                    .map(|e| e.to_string())
                    .collect();
                if !shared.is_empty() {
                    edges.push(DomainEdge {
                        a: a.clone(),
                        b: b.clone(),
                        shared,
                    });
                }
            }
        }
        edges.sort_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)));

        log::info!("Domain graph: {} domains, {} edges", domains.len(), edges.len());
        Self { domains, edges }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn edges(&self) -> &[DomainEdge] {
        &self.edges
    }

    /// Plain-text report listing domains and the entities each linked pair shares
    pub fn report(&self) -> String {
        let mut out = String::from("Domain Relationships Analysis\n");
        out.push_str(&"=".repeat(30));
        out.push_str("\n\nDomains:\n");

        let mut sorted: Vec<&String> = self.domains.iter().collect();
        sorted.sort();
        for domain in sorted {
            out.push_str(&format!("- {}\n", domain));
        }

        out.push_str("\nRelationships (Shared Entities):\n");
        for edge in &self.edges {
            out.push_str(&format!("\n{} <-> {}:\n", edge.a, edge.b));
            for entity in &edge.shared {
                out.push_str(&format!("  - {}\n", entity));
            }
        }
        out
    }

    /// Mermaid `graph LR` diagram; edge labels list the shared entities
    pub fn mermaid(&self) -> String {
        let ids: HashMap<&str, String> = self
            .domains
            .iter()
            .enumerate()
            .map(|(i, d)| (d.as_str(), format!("d{}", i)))
            .collect();

        let mut lines = vec!["graph LR".to_string()];
        for domain in &self.domains {
            lines.push(format!("    {}[\"{}\"]", ids[domain.as_str()], domain.replace('"', "#quot;")));
        }
        for edge in &self.edges {
            lines.push(format!(
                "    {} ---|\"{}\"| {}",
                ids[edge.a.as_str()],
                edge.shared.join("<br/>").replace('"', "#quot;"),
                ids[edge.b.as_str()]
            ));
        }
        lines.join("\n")
    }
}
