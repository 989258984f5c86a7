//! Configuration management for docindex.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index::loader::{LoadPolicy, Loader};
use crate::search::{ResultOrder, SearchMode, TokenizerOptions};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "docindex";

/// Environment variable prefix.
const ENV_PREFIX: &str = "DOCINDEX_";

/// Smallest snippet width that still shows useful context.
const MIN_SNIPPET_CHARS: usize = 16;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DOCINDEX_`, `__` between sections)
/// 2. TOML config file at `~/.config/docindex/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Index loading configuration.
    pub index: IndexConfig,
    /// Search configuration.
    pub search: SearchConfig,
}

/// Index loading configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index file, or a build directory containing one.
    pub path: Option<PathBuf>,
    /// What to do with malformed records.
    pub policy: LoadPolicy,
    /// Regex patterns; records whose location matches are dropped on load.
    pub exclude_locations: Vec<String>,
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default matching mode.
    pub mode: SearchMode,
    /// Default result ordering.
    pub order: ResultOrder,
    /// Default maximum number of hits; 0 for unlimited.
    pub limit: usize,
    /// Drop tokens shorter than this many characters.
    pub min_token_length: usize,
    /// Match case exactly.
    pub case_sensitive: bool,
    /// Score per query term found in a title.
    pub title_weight: u64,
    /// Score per occurrence in body text.
    pub text_weight: u64,
    /// Extra score for a page whose title equals the query.
    pub page_bonus: u64,
    /// Width of result snippets in characters.
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Token,
            order: ResultOrder::Relevance,
            limit: 20,
            min_token_length: 1,
            case_sensitive: false,
            title_weight: 10,
            text_weight: 1,
            page_bonus: 1,
            snippet_chars: 80,
        }
    }
}

impl SearchConfig {
    /// Tokenizer options derived from this configuration.
    #[must_use]
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            case_sensitive: self.case_sensitive,
            min_token_length: self.min_token_length,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `DOCINDEX_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(&config_file))
    }

    /// Build the layered provider for a config file path.
    #[must_use]
    pub fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate configuration from a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;

        if search.text_weight == 0 {
            return Err(Error::ConfigValidation {
                message: "text_weight must be greater than 0".to_string(),
            });
        }

        if search.title_weight < search.text_weight {
            return Err(Error::ConfigValidation {
                message: format!(
                    "title_weight ({}) cannot be less than text_weight ({})",
                    search.title_weight, search.text_weight
                ),
            });
        }

        if search.min_token_length == 0 {
            return Err(Error::ConfigValidation {
                message: "min_token_length must be greater than 0".to_string(),
            });
        }

        if search.snippet_chars < MIN_SNIPPET_CHARS {
            return Err(Error::ConfigValidation {
                message: format!("snippet_chars must be at least {MIN_SNIPPET_CHARS}"),
            });
        }

        // Validate regex patterns
        for pattern in &self.index.exclude_locations {
            if regex::Regex::new(pattern).is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("invalid regex pattern: {pattern}"),
                });
            }
        }

        Ok(())
    }

    /// Resolve the index path, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoIndexPath`] if neither the override nor the
    /// configuration names an index.
    pub fn index_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        override_path
            .or_else(|| self.index.path.clone())
            .ok_or(Error::NoIndexPath)
    }

    /// Build a loader from the index configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern is invalid.
    pub fn loader(&self) -> Result<Loader> {
        Loader::new(self.index.policy).with_exclusions(&self.index.exclude_locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.index.path.is_none());
        assert_eq!(config.index.policy, LoadPolicy::Strict);
        assert!(config.index.exclude_locations.is_empty());
        assert_eq!(config.search.mode, SearchMode::Token);
        assert_eq!(config.search.order, ResultOrder::Relevance);
    }

    #[test]
    fn test_default_search_config() {
        let search = SearchConfig::default();

        assert_eq!(search.limit, 20);
        assert_eq!(search.min_token_length, 1);
        assert!(!search.case_sensitive);
        assert_eq!(search.title_weight, 10);
        assert_eq!(search.text_weight, 1);
        assert_eq!(search.page_bonus, 1);
        assert_eq!(search.snippet_chars, 80);
    }

    #[test]
    fn test_tokenizer_options() {
        let search = SearchConfig {
            case_sensitive: true,
            min_token_length: 3,
            ..SearchConfig::default()
        };
        let opts = search.tokenizer_options();
        assert!(opts.case_sensitive);
        assert_eq!(opts.min_token_length, 3);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_weights() {
        let mut config = Config::default();
        config.search.title_weight = 1;
        config.search.text_weight = 5;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("title_weight"));

        let mut config = Config::default();
        config.search.text_weight = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("text_weight"));
    }

    #[test]
    fn test_validate_min_token_length() {
        let mut config = Config::default();
        config.search.min_token_length = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("min_token_length"));
    }

    #[test]
    fn test_validate_snippet_chars() {
        let mut config = Config::default();
        config.search.snippet_chars = 4;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("snippet_chars"));
    }

    #[test]
    fn test_validate_invalid_regex() {
        let mut config = Config::default();
        config.index.exclude_locations = vec!["[invalid".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid regex"));
    }

    #[test]
    fn test_index_path_resolution() {
        let mut config = Config::default();
        assert!(matches!(config.index_path(None), Err(Error::NoIndexPath)));

        config.index.path = Some(PathBuf::from("docs/build"));
        assert_eq!(config.index_path(None).unwrap(), PathBuf::from("docs/build"));
        assert_eq!(
            config
                .index_path(Some(PathBuf::from("other/search_index.js")))
                .unwrap(),
            PathBuf::from("other/search_index.js")
        );
    }

    #[test]
    fn test_loader_from_config() {
        let mut config = Config::default();
        config.index.policy = LoadPolicy::Skip;
        config.index.exclude_locations = vec!["^reference/".to_string()];
        let loader = config.loader().unwrap();
        assert_eq!(loader.policy(), LoadPolicy::Skip);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("docindex"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [index]
                path = "docs/build/v1.2.0"
                policy = "skip"

                [search]
                mode = "substring"
                limit = 5
                "#,
            )?;
            jail.set_env("DOCINDEX_SEARCH__LIMIT", "7");
            jail.set_env("DOCINDEX_SEARCH__ORDER", "sequence");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.index.path, Some(PathBuf::from("docs/build/v1.2.0")));
            assert_eq!(config.index.policy, LoadPolicy::Skip);
            assert_eq!(config.search.mode, SearchMode::Substring);
            assert_eq!(config.search.limit, 7);
            assert_eq!(config.search.order, ResultOrder::Sequence);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[search]\nmin_token_length = 0\n")?;
            let result = Config::load_from(Some(PathBuf::from("config.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_search_config_deserialize() {
        let json = r#"{"mode": "regex", "limit": 0}"#;
        let search: SearchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(search.mode, SearchMode::Regex);
        assert_eq!(search.limit, 0);
        assert_eq!(search.title_weight, 10);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("exclude_locations"));
        assert!(json.contains("snippet_chars"));
    }
}
