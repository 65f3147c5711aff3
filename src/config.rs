use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::query_generator::{MatchSettings, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_MATCHES};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Path to the field mapping CSV file
    #[validate(length(min = 1, message = "CSV path cannot be empty"))]
    pub csv_path: String,

    /// Minimum match score (0-100) for a field to be used
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "Match threshold must be between 0 and 100"
    ))]
    pub match_threshold: f64,

    /// Maximum number of matched fields per query
    #[validate(range(
        min = 1,
        max = 1000,
        message = "Max matches must be between 1 and 1000"
    ))]
    pub max_matches: usize,

    /// Expand keywords with near-spellings from field descriptions
    pub fuzzy_matching: bool,

    /// Per-request timeout applied by the HTTP layer
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Request timeout must be between 1 and 3600 seconds"
    ))]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            csv_path: "field_mappings.csv".to_string(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_matches: DEFAULT_MAX_MATCHES,
            fuzzy_matching: false,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("FIELDSQL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("FIELDSQL_PORT", "8080")?,
            csv_path: env::var("CSV_PATH").unwrap_or_else(|_| "field_mappings.csv".to_string()),
            match_threshold: parse_env_var("MATCH_THRESHOLD", "30.0")?,
            max_matches: parse_env_var("MAX_MATCHES", "10")?,
            fuzzy_matching: parse_env_var("FIELDSQL_FUZZY_MATCHING", "false")?,
            request_timeout_secs: parse_env_var("FIELDSQL_REQUEST_TIMEOUT_SECS", "30")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from the YAML file named on the command line, or
    /// from environment variables, then apply the remaining CLI overrides
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = match &cli.config_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::from_env()?,
        };
        config.apply_cli(cli);

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file. Missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides (only the options that were actually given)
    pub fn apply_cli(&mut self, cli: CliConfig) {
        if let Some(host) = cli.http_host {
            self.http_host = host;
        }
        if let Some(port) = cli.http_port {
            self.http_port = port;
        }
        if let Some(csv_path) = cli.csv_path {
            self.csv_path = csv_path;
        }
        if let Some(threshold) = cli.match_threshold {
            self.match_threshold = threshold;
        }
        if let Some(max_matches) = cli.max_matches {
            self.max_matches = max_matches;
        }
        if cli.fuzzy_matching {
            self.fuzzy_matching = true;
        }
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            threshold: self.match_threshold,
            max_matches: self.max_matches,
            fuzzy: self.fuzzy_matching,
        }
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub config_file: Option<String>,
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub csv_path: Option<String>,
    pub match_threshold: Option<f64>,
    pub max_matches: Option<usize>,
    pub fuzzy_matching: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const ENV_KEYS: [&str; 7] = [
        "FIELDSQL_HOST",
        "FIELDSQL_PORT",
        "CSV_PATH",
        "MATCH_THRESHOLD",
        "MAX_MATCHES",
        "FIELDSQL_FUZZY_MATCHING",
        "FIELDSQL_REQUEST_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.match_threshold, 30.0);
        assert_eq!(config.max_matches, 10);
        assert!(!config.fuzzy_matching);
    }

    #[test]
    fn test_invalid_threshold() {
        let config = ServerConfig {
            match_threshold: 100.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_matches() {
        let config = ServerConfig {
            max_matches: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_csv_path() {
        let config = ServerConfig {
            csv_path: "".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.csv_path, "field_mappings.csv");
        assert_eq!(config.match_threshold, 30.0);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("CSV_PATH", "/data/mappings.csv");
        env::set_var("MATCH_THRESHOLD", "45.5");
        env::set_var("MAX_MATCHES", "3");

        let config = ServerConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.csv_path, "/data/mappings.csv");
        assert_eq!(config.match_threshold, 45.5);
        assert_eq!(config.max_matches, 3);
    }

    #[test]
    #[serial]
    fn test_from_env_parse_error() {
        clear_env();
        env::set_var("MAX_MATCHES", "lots");

        let err = ServerConfig::from_env().unwrap_err();
        clear_env();

        assert!(matches!(err, ConfigError::Parse { ref field, .. } if field == "MAX_MATCHES"));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        clear_env();
        env::set_var("CSV_PATH", "/from/env.csv");

        let config = ServerConfig::from_cli(CliConfig {
            csv_path: Some("/from/cli.csv".to_string()),
            http_port: Some(9090),
            fuzzy_matching: true,
            ..Default::default()
        })
        .unwrap();
        clear_env();

        assert_eq!(config.csv_path, "/from/cli.csv");
        assert_eq!(config.http_port, 9090);
        assert!(config.fuzzy_matching);
        assert_eq!(config.http_host, "0.0.0.0");
    }

    #[test]
    fn test_from_yaml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "csv_path: /srv/fields.csv\nmatch_threshold: 50.0").unwrap();

        let config = ServerConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.csv_path, "/srv/fields.csv");
        assert_eq!(config.match_threshold, 50.0);
        assert_eq!(config.max_matches, 10);
        assert_eq!(config.match_settings().threshold, 50.0);
    }

    #[test]
    fn test_from_yaml_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_matches: 0").unwrap();
        assert!(matches!(
            ServerConfig::from_yaml_file(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
