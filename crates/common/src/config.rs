//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Poll registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Poll registry limits.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Maximum length of a poll question, in characters.
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,
    /// Maximum number of candidates per poll.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Maximum length of a candidate label, in characters.
    #[serde(default = "default_max_candidate_length")]
    pub max_candidate_length: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_question_length: default_max_question_length(),
            max_candidates: default_max_candidates(),
            max_candidate_length: default_max_candidate_length(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_question_length() -> usize {
    500
}

const fn default_max_candidates() -> usize {
    32
}

const fn default_max_candidate_length() -> usize {
    100
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `VOTEBOARD_ENV`)
    /// 3. Environment variables with `VOTEBOARD_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("VOTEBOARD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VOTEBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("VOTEBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = RegistryConfig::default();
        assert_eq!(registry.max_question_length, 500);
        assert_eq!(registry.max_candidates, 32);
        assert_eq!(registry.max_candidate_length, 100);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nurl = \"https://example.com\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.registry.max_candidates, 32);
    }
}
