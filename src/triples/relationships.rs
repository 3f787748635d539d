//! Parser for `Entity A --Relationship--> Entity B` lines.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::Triple;

/// One parsed relationship line, fields trimmed but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipLine {
    pub source: String,
    pub relationship: String,
    pub target: String,
}

fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[-*•]|\d+[.)])\s+").expect("Invalid list marker regex"))
}

/// Split a line of the form `source --relationship--> target`.
///
/// The source ends at the first `--`, the relationship runs up to the next
/// `-->`, and the target is the text after it. Returns `None` for lines
/// without both markers.
pub fn parse_relationship_line(line: &str) -> Option<RelationshipLine> {
    let line = line.trim();
    let (source, rest) = line.split_once("--")?;
    let (relationship, target) = rest.split_once("-->")?;
    // Drop anything after a second arrow on the same line
    let target = target.split("-->").next().unwrap_or("");

    Some(RelationshipLine {
        source: source.trim().to_string(),
        relationship: relationship.trim().to_string(),
        target: target.trim().to_string(),
    })
}

fn clean_entity(text: &str) -> String {
    let text = text.trim().trim_start_matches('>').trim();
    list_marker_regex().replace(text, "").trim().to_string()
}

/// Parse relationship text (one relationship per line) into triples.
///
/// List markers (`-`, `*`, `1.`) and leading `>` are stripped, lines without
/// a complete triple are skipped, and repeated triples are kept once in
/// first-seen order.
pub fn parse_relationship_lines(text: &str) -> Vec<Triple> {
    let mut seen = HashSet::new();
    let mut triples = Vec::new();

    for line in text.lines() {
        let Some(parsed) = parse_relationship_line(line) else {
            continue;
        };
        let triple = Triple::new(
            clean_entity(&parsed.source),
            parsed.relationship.trim(),
            clean_entity(&parsed.target),
        );
        if triple.entity_a.is_empty() || triple.relationship.is_empty() || triple.entity_b.is_empty() {
            log::debug!("Skipping incomplete relationship line: '{}'", line.trim());
            continue;
        }
        if seen.insert(triple.clone()) {
            triples.push(triple);
        }
    }

    triples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let parsed = parse_relationship_line("  Finance Team --tracks--> Invoices ").unwrap();
        assert_eq!(parsed.source, "Finance Team");
        assert_eq!(parsed.relationship, "tracks");
        assert_eq!(parsed.target, "Invoices");
    }

    #[test]
    fn test_parse_line_hyphenated_entities() {
        let parsed = parse_relationship_line("E-Commerce Team --re-issues--> Gift-Cards").unwrap();
        assert_eq!(parsed.source, "E-Commerce Team");
        assert_eq!(parsed.relationship, "re-issues");
        assert_eq!(parsed.target, "Gift-Cards");
    }

    #[test]
    fn test_parse_line_rejects_plain_text() {
        assert!(parse_relationship_line("Data Owner: Finance").is_none());
        assert!(parse_relationship_line("A -- B").is_none());
    }

    #[test]
    fn test_parse_lines_strips_markers_and_dedupes() {
        let text = "Relationships:\n\
                    1. Finance Team --tracks--> Invoices\n\
                    - Finance Team --tracks--> Invoices\n\
                    > HR Team --manages--> Payroll\n\
                    Broken --> line\n";
        let triples = parse_relationship_lines(text);
        assert_eq!(
            triples,
            vec![
                Triple::new("Finance Team", "tracks", "Invoices"),
                Triple::new("HR Team", "manages", "Payroll"),
            ]
        );
    }
}
