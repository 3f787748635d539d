pub mod config;
pub mod error;
pub mod text;
pub mod cluster;
pub mod triples;
pub mod domain;
pub mod generate;
pub mod export;

pub use config::Config;
pub use error::{DomainMeshError, Result};
pub use domain::{identify_domains, DomainRecord, PipelineSettings};
pub use triples::Triple;
