use thiserror::Error;

/// Main error type for DomainMesh
#[derive(Error, Debug)]
pub enum DomainMeshError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (missing column, empty triple set, blank entity)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A cluster label with no members reached the naming stage
    #[error("Degenerate cluster: cluster {0} has no members")]
    DegenerateCluster(usize),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Relationship generation (LLM API) errors
    #[error("Generation error: {0}")]
    Generation(String),
}

/// Convenient Result type using DomainMeshError
pub type Result<T> = std::result::Result<T, DomainMeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainMeshError::InvalidInput("Entity B is empty".to_string());
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("Entity B is empty"));
    }

    #[test]
    fn test_degenerate_cluster_display() {
        let err = DomainMeshError::DegenerateCluster(3);
        assert_eq!(err.to_string(), "Degenerate cluster: cluster 3 has no members");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DomainMeshError = io_err.into();
        assert!(matches!(err, DomainMeshError::Io(_)));
    }
}
