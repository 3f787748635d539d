//! Diagram and report exports for relationship text and domain tables.

pub mod erd;
pub mod graph;

pub use erd::{mermaid_from_relationships, node_id, sanitize_node_text};
pub use graph::{DomainEdge, DomainGraph};
