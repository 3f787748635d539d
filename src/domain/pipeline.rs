//! End-to-end domain identification over an in-memory triple set.

use crate::config::{ClusteringConfig, Config, ConsolidationConfig, VectorizerConfig};
use crate::error::{DomainMeshError, Result};
use crate::triples::{validate_triples, Triple};

use super::{extract_context, name_domain, BusinessContext, DomainClusterer, DomainConsolidator, DomainRecord};

/// Settings for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub vectorizer: VectorizerConfig,
    pub clustering: ClusteringConfig,
    pub consolidation: ConsolidationConfig,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            vectorizer: config.vectorizer.clone(),
            clustering: config.clustering.clone(),
            consolidation: config.consolidation.clone(),
        }
    }
}

/// Group `triples` into named business domains.
///
/// Validates the input, clusters the triples' contexts, names each cluster,
/// then merges near-duplicate domains. The result has exactly one record
/// per input triple, grouped by cluster (clusters in label order, triples in
/// input order within a cluster). Any error aborts the whole run.
pub fn identify_domains(triples: &[Triple], settings: &PipelineSettings) -> Result<Vec<DomainRecord>> {
    validate_triples(triples)?;
    log::info!("Identifying domains for {} triples", triples.len());

    let contexts: Vec<BusinessContext> = triples.iter().map(extract_context).collect();

    let clusterer = DomainClusterer::new(&settings.vectorizer, &settings.clustering);
    let labels = clusterer.cluster(&contexts)?;

    let records = name_clusters(triples, &contexts, &labels)?;

    let consolidator = DomainConsolidator::new(&settings.vectorizer, &settings.consolidation);
    let records = consolidator.consolidate(records);

    debug_assert_eq!(
        records.len(),
        triples.len(),
        "consolidation must keep one record per triple"
    );
    Ok(records)
}

/// Name every cluster and emit one record per triple, cluster by cluster.
fn name_clusters(
    triples: &[Triple],
    contexts: &[BusinessContext],
    labels: &[usize],
) -> Result<Vec<DomainRecord>> {
    let n_clusters = labels.iter().max().map_or(0, |m| m + 1);
    let mut records = Vec::with_capacity(triples.len());

    for cluster_id in 0..n_clusters {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == cluster_id)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            return Err(DomainMeshError::DegenerateCluster(cluster_id));
        }

        let cluster_contexts: Vec<&BusinessContext> = members.iter().map(|&i| &contexts[i]).collect();
        let domain_name = name_domain(&cluster_contexts);
        log::info!("Cluster {}: '{}' ({} triples)", cluster_id, domain_name, members.len());

        for &i in &members {
            records.push(DomainRecord::new(domain_name.clone(), triples[i].clone()));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triples::{read_domain_table, read_triples, write_domains};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn triples(rows: &[(&str, &str, &str)]) -> Vec<Triple> {
        rows.iter().map(|(a, r, b)| Triple::new(*a, *r, *b)).collect()
    }

    fn domain_of<'a>(records: &'a [DomainRecord], entity_a: &str) -> &'a str {
        records
            .iter()
            .find(|r| r.triple.entity_a == entity_a)
            .map(|r| r.domain_name.as_str())
            .unwrap()
    }

    fn sample() -> Vec<Triple> {
        triples(&[
            ("Sales Team", "manages", "Invoices"),
            ("Finance Team", "tracks", "Invoices"),
            ("Billing Team", "issues", "Invoices"),
            ("HR Team", "manages", "Payroll"),
            ("HR Team", "approves", "Payroll"),
            ("Admin", "archives", "Logs"),
            ("Security Team", "audits", "Logs"),
            ("Warehouse", "stores", "Inventory"),
            ("Procurement", "orders", "Inventory"),
            ("Marketing", "runs", "Campaigns"),
            ("Legal", "reviews", "Contracts"),
            ("Data Office", "governs", "Data"),
        ])
    }

    #[test]
    fn test_invoices_and_payroll_domains() {
        let input = triples(&[
            ("Sales Team", "manages", "Invoices"),
            ("Finance Team", "tracks", "Invoices"),
            ("HR Team", "manages", "Payroll"),
        ]);
        let records = identify_domains(&input, &PipelineSettings::default()).unwrap();
        assert_eq!(records.len(), 3);

        let sales = domain_of(&records, "Sales Team");
        let finance = domain_of(&records, "Finance Team");
        let hr = domain_of(&records, "HR Team");
        assert_eq!(sales, finance);
        assert!(sales.contains("Invoice") && sales.contains("Management"));
        assert!(hr.contains("Payroll") && hr.contains("Management"));
        assert_ne!(sales, hr);
    }

    #[test]
    fn test_single_triple() {
        let input = triples(&[("Admin", "archives", "Logs")]);
        let records = identify_domains(&input, &PipelineSettings::default()).unwrap();
        assert_eq!(records, vec![DomainRecord::new("Logs Management", input[0].clone())]);
    }

    #[test]
    fn test_record_count_matches_input() {
        let input = sample();
        let records = identify_domains(&input, &PipelineSettings::default()).unwrap();
        assert_eq!(records.len(), input.len());

        // Same multiset of triples, only annotated
        let mut got: Vec<Triple> = records.iter().map(|r| r.triple.clone()).collect();
        let mut want = input.clone();
        got.sort_by(|a, b| a.render().cmp(&b.render()));
        want.sort_by(|a, b| a.render().cmp(&b.render()));
        assert_eq!(got, want);

        let domains: HashSet<&str> = records.iter().map(|r| r.domain_name.as_str()).collect();
        assert!(domains.len() <= 5);
    }

    #[test]
    fn test_deterministic_runs() {
        let input = sample();
        let a = identify_domains(&input, &PipelineSettings::default()).unwrap();
        let b = identify_domains(&input, &PipelineSettings::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_name_has_management_once() {
        let records = identify_domains(&sample(), &PipelineSettings::default()).unwrap();
        for record in &records {
            assert_eq!(
                record.domain_name.matches("Management").count(),
                1,
                "bad name {}",
                record.domain_name
            );
            assert!(record.domain_name.ends_with("Management"));
        }
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = identify_domains(&[], &PipelineSettings::default()).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_blank_entity_b() {
        let input = triples(&[("Admin", "archives", "Logs"), ("Admin", "deletes", "")]);
        let err = identify_domains(&input, &PipelineSettings::default()).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
    }

    #[test]
    fn test_name_clusters_degenerate_cluster() {
        let input = triples(&[("Admin", "archives", "Logs"), ("HR Team", "manages", "Payroll")]);
        let contexts: Vec<BusinessContext> = input.iter().map(extract_context).collect();
        let err = name_clusters(&input, &contexts, &[0, 2]).unwrap_err();
        assert!(matches!(err, DomainMeshError::DegenerateCluster(1)));
    }

    #[test]
    fn test_name_clusters_groups_by_label() {
        let input = triples(&[
            ("Admin", "archives", "Logs"),
            ("HR Team", "manages", "Payroll"),
            ("Security", "audits", "Logs"),
        ]);
        let contexts: Vec<BusinessContext> = input.iter().map(extract_context).collect();
        let records = name_clusters(&input, &contexts, &[0, 1, 0]).unwrap();
        let order: Vec<&str> = records.iter().map(|r| r.triple.entity_a.as_str()).collect();
        assert_eq!(order, vec!["Admin", "Security", "HR Team"]);
        assert_eq!(records[0].domain_name, "Logs Management");
        assert_eq!(records[2].domain_name, "Payroll Management");
    }

    #[test]
    fn test_csv_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("triples.csv");
        std::fs::write(
            &input_path,
            "Entity A,Relationship,Entity B\n\
             Sales Team,manages,Invoices\n\
             Finance Team,tracks,Invoices\n\
             HR Team,manages,Payroll\n",
        )
        .unwrap();

        let input = read_triples(&input_path).unwrap();
        let records = identify_domains(&input, &PipelineSettings::default()).unwrap();
        let output_path = temp_dir.path().join("out").join("domains.csv");
        write_domains(&output_path, &records).unwrap();

        assert_eq!(read_domain_table(&output_path).unwrap(), records);
    }
}
