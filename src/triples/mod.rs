//! Entity-relationship triples: the record type, validation, and table I/O.

pub mod relationships;
pub mod table;

pub use relationships::{parse_relationship_line, parse_relationship_lines, RelationshipLine};
pub use table::{
    parse_domain_table, parse_triples, read_domain_table, read_triples, write_domains,
    write_triples,
};

use crate::error::{DomainMeshError, Result};

pub const DOMAIN_NAME: &str = "Domain name";
/// Header used by some downstream consumers instead of `Domain name`
pub const DOMAIN: &str = "Domain";
pub const ENTITY_A: &str = "Entity A";
pub const RELATIONSHIP: &str = "Relationship";
pub const ENTITY_B: &str = "Entity B";

/// One business fact: `entity_a --relationship--> entity_b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub entity_a: String,
    pub relationship: String,
    pub entity_b: String,
}

impl Triple {
    pub fn new(
        entity_a: impl Into<String>,
        relationship: impl Into<String>,
        entity_b: impl Into<String>,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            relationship: relationship.into(),
            entity_b: entity_b.into(),
        }
    }

    /// The triple as plain text: "A Relationship B"
    pub fn render(&self) -> String {
        format!("{} {} {}", self.entity_a, self.relationship, self.entity_b)
    }
}

/// Reject inputs the domain pipeline cannot index: an empty set, or any
/// triple whose `Entity B` is blank.
pub fn validate_triples(triples: &[Triple]) -> Result<()> {
    if triples.is_empty() {
        return Err(DomainMeshError::InvalidInput(
            "triple set is empty".to_string(),
        ));
    }

    for (idx, triple) in triples.iter().enumerate() {
        if triple.entity_b.trim().is_empty() {
            return Err(DomainMeshError::InvalidInput(format!(
                "row {}: '{}' is empty ({} {} ?)",
                idx + 1,
                ENTITY_B,
                triple.entity_a,
                triple.relationship
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let t = Triple::new("Sales Team", "manages", "Invoices");
        assert_eq!(t.render(), "Sales Team manages Invoices");
    }

    #[test]
    fn test_validate_ok() {
        let triples = vec![Triple::new("Admin", "archives", "Logs")];
        assert!(validate_triples(&triples).is_ok());
    }

    #[test]
    fn test_validate_empty_set() {
        let err = validate_triples(&[]).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_blank_entity_b() {
        let triples = vec![
            Triple::new("Admin", "archives", "Logs"),
            Triple::new("Admin", "deletes", "   "),
        ];
        let err = validate_triples(&triples).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
