//! Configuration for the nlsql server
//!
//! Operational settings come from `config.yaml`; the model credential comes
//! only from the environment (see `nlsql_core::llm`). Environment variables
//! override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Model-call settings. The credential itself is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Seconds before an in-flight model call is abandoned.
    pub timeout_secs: u64,

    /// Body rows shown in the Markdown summary.
    pub display_rows: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            display_rows: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or module-specific directives (RUST_LOG syntax)
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from a YAML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus environment overrides, for when no config file exists.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NLSQL_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NLSQL_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(secs) = std::env::var("NLSQL_MODEL_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.model.timeout_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.timeout_secs, 60);
        assert_eq!(config.model.display_rows, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_with_env_override() {
        let config_yaml = r#"
server:
  host: "0.0.0.0"
  port: 3000
model:
  timeout_secs: 30
  display_rows: 10
"#;
        let temp_file = std::env::temp_dir().join("nlsql_test_config.yaml");
        std::fs::write(&temp_file, config_yaml).unwrap();

        std::env::set_var("NLSQL_SERVER_PORT", "9090");
        let config = Config::load(&temp_file).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090); // overridden
        assert_eq!(config.model.timeout_secs, 30);
        assert_eq!(config.model.display_rows, 10);

        std::env::remove_var("NLSQL_SERVER_PORT");
        std::fs::remove_file(temp_file).ok();
    }
}
