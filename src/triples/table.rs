//! CSV reading and writing for triple and domain tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};

use super::{Triple, DOMAIN, DOMAIN_NAME, ENTITY_A, ENTITY_B, RELATIONSHIP};
use crate::domain::DomainRecord;
use crate::error::{DomainMeshError, Result};

fn column(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim_start_matches('\u{feff}')))
        .ok_or_else(|| {
            DomainMeshError::InvalidInput(format!("missing required column '{}'", names[0]))
        })
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Read a triple table (`Entity A`, `Relationship`, `Entity B`) from a CSV file
pub fn read_triples(path: &Path) -> Result<Vec<Triple>> {
    let file = File::open(path)?;
    let triples = parse_triples(file)?;
    log::info!("Read {} triples from {}", triples.len(), path.display());
    Ok(triples)
}

/// Parse a triple table from any reader. Extra columns are ignored.
pub fn parse_triples<R: Read>(reader: R) -> Result<Vec<Triple>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let a = column(&headers, &[ENTITY_A])?;
    let r = column(&headers, &[RELATIONSHIP])?;
    let b = column(&headers, &[ENTITY_B])?;

    let mut triples = Vec::new();
    for record in rdr.records() {
        let record = record?;
        triples.push(Triple::new(field(&record, a), field(&record, r), field(&record, b)));
    }
    Ok(triples)
}

/// Read a domain table written by [`write_domains`] (or one using a `Domain` column)
pub fn read_domain_table(path: &Path) -> Result<Vec<DomainRecord>> {
    let file = File::open(path)?;
    parse_domain_table(file)
}

pub fn parse_domain_table<R: Read>(reader: R) -> Result<Vec<DomainRecord>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let d = column(&headers, &[DOMAIN_NAME, DOMAIN])?;
    let a = column(&headers, &[ENTITY_A])?;
    let r = column(&headers, &[RELATIONSHIP])?;
    let b = column(&headers, &[ENTITY_B])?;

    let mut records = Vec::new();
    for record in rdr.records() {
        let record = record?;
        records.push(DomainRecord::new(
            field(&record, d),
            Triple::new(field(&record, a), field(&record, r), field(&record, b)),
        ));
    }
    Ok(records)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the final domain table, creating parent directories as needed
pub fn write_domains(path: &Path, records: &[DomainRecord]) -> Result<()> {
    create_parent_dir(path)?;
    let mut writer = Writer::from_path(path)?;
    writer.write_record([DOMAIN_NAME, ENTITY_A, RELATIONSHIP, ENTITY_B])?;
    for record in records {
        writer.write_record([
            record.domain_name.as_str(),
            record.triple.entity_a.as_str(),
            record.triple.relationship.as_str(),
            record.triple.entity_b.as_str(),
        ])?;
    }
    writer.flush()?;
    log::info!("Data domains have been saved to {}", path.display());
    Ok(())
}

/// Write a triple table, creating parent directories as needed
pub fn write_triples(path: &Path, triples: &[Triple]) -> Result<()> {
    create_parent_dir(path)?;
    let mut writer = Writer::from_path(path)?;
    writer.write_record([ENTITY_A, RELATIONSHIP, ENTITY_B])?;
    for t in triples {
        writer.write_record([
            t.entity_a.as_str(),
            t.relationship.as_str(),
            t.entity_b.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_triples_with_quotes_and_extra_columns() {
        let csv = "Source,Entity A,Relationship,Entity B\n\
                   crm,\"Sales, EMEA\",manages,Invoices\n\
                   erp, HR Team ,tracks,\"Payroll \"\"Run\"\"\"\n";
        let triples = parse_triples(csv.as_bytes()).unwrap();
        assert_eq!(
            triples,
            vec![
                Triple::new("Sales, EMEA", "manages", "Invoices"),
                Triple::new("HR Team", "tracks", "Payroll \"Run\""),
            ]
        );
    }

    #[test]
    fn test_parse_triples_missing_column() {
        let csv = "Entity A,Relationship\nAdmin,archives\n";
        let err = parse_triples(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DomainMeshError::InvalidInput(_)));
        assert!(err.to_string().contains("Entity B"));
    }

    #[test]
    fn test_parse_triples_short_row_yields_blank_field() {
        let csv = "Entity A,Relationship,Entity B\nAdmin,archives\n";
        let triples = parse_triples(csv.as_bytes()).unwrap();
        assert_eq!(triples[0].entity_b, "");
    }

    #[test]
    fn test_parse_domain_table_accepts_domain_header() {
        let csv = "Domain,Entity A,Relationship,Entity B\nLogs Management,Admin,archives,Logs\n";
        let records = parse_domain_table(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].domain_name, "Logs Management");
        assert_eq!(records[0].triple.entity_b, "Logs");
    }

    #[test]
    fn test_write_then_read_domains() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("domains.csv");
        let records = vec![
            DomainRecord::new("Invoices Management", Triple::new("Sales Team", "manages", "Invoices")),
            DomainRecord::new("Payroll Management", Triple::new("HR, Ops", "manages", "Payroll")),
        ];
        write_domains(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Domain name,Entity A,Relationship,Entity B"));

        let read_back = read_domain_table(&path).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn test_write_triples_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("triples.csv");
        let triples = vec![Triple::new("Admin", "archives", "Logs")];
        write_triples(&path, &triples).unwrap();
        assert_eq!(read_triples(&path).unwrap(), triples);
    }
}
