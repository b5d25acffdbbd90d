//! Configuration for the section indexer

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main indexer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Section splitting configuration
    #[serde(default)]
    pub sectioning: SectioningConfig,
    /// Batch submission configuration
    #[serde(default)]
    pub batching: BatchConfig,
    /// Document analysis service (required for raw file uploads)
    #[serde(default)]
    pub analysis: Option<AnalysisConfig>,
    /// Search index sink (an in-memory sink is used when absent)
    #[serde(default)]
    pub search: Option<SearchConfig>,
}

impl IndexerConfig {
    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: IndexerConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Load configuration from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override endpoints and secrets from the environment
    ///
    /// The lookup is injected so tests do not touch process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("FORMRECOGNIZER_ENDPOINT") {
            self.analysis.get_or_insert_with(AnalysisConfig::default).endpoint = endpoint;
        }
        if let Some(key) = lookup("FORMRECOGNIZER_KEY") {
            self.analysis.get_or_insert_with(AnalysisConfig::default).api_key = key;
        }
        if let Some(endpoint) = lookup("SEARCH_ENDPOINT") {
            self.search.get_or_insert_with(SearchConfig::default).endpoint = endpoint;
        }
        if let Some(index) = lookup("SEARCH_INDEX") {
            self.search.get_or_insert_with(SearchConfig::default).index_name = index;
        }
        if let Some(key) = lookup("SEARCH_KEY") {
            self.search.get_or_insert_with(SearchConfig::default).api_key = key;
        }
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        self.sectioning.validate()?;
        self.batching.validate()?;
        if let Some(ref analysis) = self.analysis {
            if analysis.endpoint.is_empty() {
                return Err(Error::config("analysis.endpoint must be set"));
            }
        }
        if let Some(ref search) = self.search {
            if search.endpoint.is_empty() || search.index_name.is_empty() {
                return Err(Error::config(
                    "search.endpoint and search.index_name must be set",
                ));
            }
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Section splitting configuration, all lengths in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectioningConfig {
    /// Target section length before boundary search
    pub max_section_length: usize,
    /// How far past the target to look for a sentence end
    pub sentence_search_limit: usize,
    /// Characters shared between consecutive sections
    pub section_overlap: usize,
}

impl Default for SectioningConfig {
    fn default() -> Self {
        Self {
            max_section_length: 1000,
            sentence_search_limit: 100,
            section_overlap: 100,
        }
    }
}

impl SectioningConfig {
    /// Check the values can drive a terminating split
    pub fn validate(&self) -> Result<()> {
        if self.max_section_length == 0 {
            return Err(Error::config("sectioning.max_section_length must be > 0"));
        }
        if self.sentence_search_limit == 0 {
            return Err(Error::config("sectioning.sentence_search_limit must be > 0"));
        }
        if self.section_overlap == 0 {
            return Err(Error::config("sectioning.section_overlap must be > 0"));
        }
        if self.section_overlap >= self.max_section_length {
            return Err(Error::config(format!(
                "sectioning.section_overlap ({}) must be smaller than max_section_length ({})",
                self.section_overlap, self.max_section_length
            )));
        }
        Ok(())
    }
}

/// Batch submission configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Records per sink call
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::config("batching.batch_size must be > 0"));
        }
        Ok(())
    }
}

/// Form Recognizer (document analysis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Service endpoint, e.g. "https://my-resource.cognitiveservices.azure.com"
    pub endpoint: String,
    /// Subscription key
    #[serde(default)]
    pub api_key: String,
    /// Analysis model (default: "prebuilt-layout")
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// REST API version
    #[serde(default = "default_analysis_api_version")]
    pub api_version: String,
    /// Delay between result polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up after this many polls
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_model_id() -> String {
    "prebuilt-layout".to_string()
}

fn default_analysis_api_version() -> String {
    "2023-07-31".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    300
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_id: default_model_id(),
            api_version: default_analysis_api_version(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

/// Cognitive Search index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Service endpoint, e.g. "https://my-search.search.windows.net"
    pub endpoint: String,
    /// Target index name
    pub index_name: String,
    /// Admin key
    #[serde(default)]
    pub api_key: String,
    /// REST API version
    #[serde(default = "default_search_api_version")]
    pub api_version: String,
}

fn default_search_api_version() -> String {
    "2023-11-01".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            index_name: String::new(),
            api_key: String::new(),
            api_version: default_search_api_version(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = IndexerConfig::default();
        assert_eq!(config.sectioning.max_section_length, 1000);
        assert_eq!(config.sectioning.sentence_search_limit, 100);
        assert_eq!(config.sectioning.section_overlap, 100);
        assert_eq!(config.batching.batch_size, 1000);
        assert!(config.analysis.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let raw = r#"
            [sectioning]
            max_section_length = 500
            sentence_search_limit = 50
            section_overlap = 40

            [search]
            endpoint = "https://example.search.windows.net"
            index_name = "docs"
        "#;
        let config: IndexerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.sectioning.max_section_length, 500);
        assert_eq!(config.batching.batch_size, 1000);
        let search = config.search.unwrap();
        assert_eq!(search.index_name, "docs");
        assert_eq!(search.api_version, "2023-11-01");
    }

    #[test]
    fn test_overlap_must_be_smaller_than_section() {
        let config = SectioningConfig {
            max_section_length: 100,
            sentence_search_limit: 10,
            section_overlap: 100,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_sectioning_values_rejected() {
        let defaults = SectioningConfig::default();
        for config in [
            SectioningConfig { max_section_length: 0, ..defaults },
            SectioningConfig { sentence_search_limit: 0, ..defaults },
            SectioningConfig { section_overlap: 0, ..defaults },
        ] {
            assert!(matches!(config.validate(), Err(Error::Config(_))));
        }
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(BatchConfig { batch_size: 0 }.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SEARCH_ENDPOINT", "https://s.search.windows.net"),
            ("SEARCH_INDEX", "gptkbindex"),
            ("SEARCH_KEY", "secret"),
            ("FORMRECOGNIZER_ENDPOINT", "https://fr.cognitiveservices.azure.com"),
        ]
        .into_iter()
        .collect();

        let mut config = IndexerConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        let search = config.search.as_ref().unwrap();
        assert_eq!(search.index_name, "gptkbindex");
        assert_eq!(search.api_key, "secret");
        let analysis = config.analysis.as_ref().unwrap();
        assert_eq!(analysis.model_id, "prebuilt-layout");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config: IndexerConfig = toml::from_str(include_str!("../indexer.example.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.batching.batch_size, 1000);
        assert_eq!(config.analysis.unwrap().model_id, "prebuilt-layout");
        assert_eq!(config.search.unwrap().index_name, "sections");
    }
}
