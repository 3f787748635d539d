use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub consolidation: ConsolidationConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Triple table produced by the relationship generator.
    #[serde(default = "default_triples_csv")]
    pub triples_csv: PathBuf,
    /// Directory receiving the domain table and graph exports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_domains_file")]
    pub domains_file: String,
    /// Raw `A --Relationship--> B` text returned by the LLM.
    #[serde(default = "default_relationships_txt")]
    pub relationships_txt: PathBuf,
    #[serde(default = "default_erd_dir")]
    pub erd_dir: PathBuf,
    #[serde(default = "default_catalog_xml")]
    pub catalog_xml: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            triples_csv: default_triples_csv(),
            output_dir: default_output_dir(),
            domains_file: default_domains_file(),
            relationships_txt: default_relationships_txt(),
            erd_dir: default_erd_dir(),
            catalog_xml: default_catalog_xml(),
        }
    }
}

fn default_triples_csv() -> PathBuf {
    PathBuf::from("results/entity_relationship/merged_knowledge.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results/datamesh")
}

fn default_domains_file() -> String {
    "domains.csv".to_string()
}

fn default_relationships_txt() -> PathBuf {
    PathBuf::from("results/entity_relationship/merged_knowledge.txt")
}

fn default_erd_dir() -> PathBuf {
    PathBuf::from("results/erd")
}

fn default_catalog_xml() -> PathBuf {
    PathBuf::from("data/knowledge/merged.xml")
}

/// k-means settings for the domain clusterer
#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringConfig {
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,
    #[serde(default = "default_n_init")]
    pub n_init: usize,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_clusters: default_max_clusters(),
            n_init: default_n_init(),
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
            seed: default_seed(),
        }
    }
}

fn default_max_clusters() -> usize {
    5
}

fn default_n_init() -> usize {
    10
}

fn default_max_iter() -> usize {
    300
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_seed() -> u64 {
    42
}

/// TF-IDF settings shared by clustering and consolidation
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerConfig {
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            ngram_max: default_ngram_max(),
        }
    }
}

fn default_max_features() -> usize {
    1000
}

fn default_ngram_max() -> usize {
    3
}

/// Domain consolidation settings
#[derive(Debug, Clone, Deserialize)]
pub struct ConsolidationConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.3
}

/// LLM relationship generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in DOMAINMESH_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (built-in defaults when absent)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("DOMAINMESH_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No config.toml found, using built-in defaults");
                    Config::default()
                }
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML config file without consulting the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.clustering.max_clusters == 0 {
            anyhow::bail!("clustering.max_clusters must be greater than 0");
        }

        if self.clustering.n_init == 0 {
            anyhow::bail!("clustering.n_init must be greater than 0");
        }

        if self.clustering.max_iter == 0 {
            anyhow::bail!("clustering.max_iter must be greater than 0");
        }

        if self.vectorizer.max_features == 0 {
            anyhow::bail!("vectorizer.max_features must be greater than 0");
        }

        if self.vectorizer.ngram_max == 0 {
            anyhow::bail!("vectorizer.ngram_max must be greater than 0");
        }

        let threshold = self.consolidation.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("consolidation.similarity_threshold must be between 0.0 and 1.0");
        }

        Ok(())
    }

    /// Full path of the domain table written by the pipeline
    pub fn domains_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.paths.domains_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("DOMAINMESH_CONFIG").ok();
        std::env::set_var("DOMAINMESH_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("DOMAINMESH_CONFIG");
        if let Some(val) = original {
            std::env::set_var("DOMAINMESH_CONFIG", val);
        }
    }

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.clustering.max_clusters, 5);
        assert_eq!(config.clustering.n_init, 10);
        assert_eq!(config.clustering.seed, 42);
        assert_eq!(config.vectorizer.max_features, 1000);
        assert_eq!(config.vectorizer.ngram_max, 3);
        assert!((config.consolidation.similarity_threshold - 0.3).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_partial_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[paths]
output_dir = "out"

[clustering]
seed = 7
"#,
        )
        .unwrap();

        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.clustering.seed, 7);
            assert_eq!(config.clustering.max_clusters, 5);
            assert_eq!(config.domains_path(), PathBuf::from("out").join("domains.csv"));
        });
    }

    #[test]
    fn test_config_rejects_bad_threshold() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[consolidation]\nsimilarity_threshold = 1.5\n").unwrap();

        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("similarity_threshold"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Path::new("nonexistent.toml"), || {
            assert!(Config::load().is_err());
        });
    }
}
