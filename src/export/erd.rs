//! Mermaid entity-relationship diagram from relationship text.

use std::collections::BTreeSet;

use crate::triples::parse_relationship_line;

const HEADER: &[&str] = &[
    "graph TD",
    "    %% Styles",
    "    classDef default fill:#f9f9f9,stroke:#333,stroke-width:2px;",
    "",
];

/// Trim the text and drop any leading `>` quote markers
pub fn sanitize_node_text(text: &str) -> String {
    text.trim().trim_start_matches('>').trim().to_string()
}

/// Mermaid-safe node id: every non-alphanumeric character becomes `_`
pub fn node_id(text: &str) -> String {
    sanitize_node_text(text)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Build a `graph TD` diagram with one node per distinct entity and one
/// labelled edge per distinct relationship.
///
/// Nodes and edges are emitted in sorted order so the output is stable.
/// Lines that are not `A --rel--> B` are ignored.
pub fn mermaid_from_relationships(text: &str) -> String {
    let mut nodes = BTreeSet::new();
    let mut edges = BTreeSet::new();

    for line in text.lines() {
        let Some(rel) = parse_relationship_line(line) else {
            continue;
        };
        if edges.insert((rel.source.clone(), rel.relationship.clone(), rel.target.clone())) {
            nodes.insert(rel.source);
            nodes.insert(rel.target);
        } else {
            log::debug!("Skipping duplicate relationship: {}", line.trim());
        }
    }
    log::info!("ERD: {} nodes, {} relationships", nodes.len(), edges.len());

    let mut lines: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
    for node in &nodes {
        lines.push(format!(
            "    {}[\"{}\"]",
            node_id(node),
            sanitize_node_text(node).replace('"', "#quot;")
        ));
    }
    lines.push(String::new());
    for (source, relationship, target) in &edges {
        lines.push(format!(
            "    {} -->|{}| {}",
            node_id(source),
            relationship,
            node_id(target)
        ));
    }

    lines.join("\n")
}
