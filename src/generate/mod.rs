//! Upstream triple generation: source catalog, prompt, and LLM client.

pub mod catalog;
pub mod client;

pub use catalog::{build_prompt, read_source_catalog, SourceRecord};
pub use client::{parse_completion, RelationshipGenerator};
