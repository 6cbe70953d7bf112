//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ConnectConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ConnectConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ConnectConfig, ConfigError> {
    let config: ConnectConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path` when given, otherwise use validated defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ConnectConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ConnectConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dispatch]\ngas_price_multiplier = 2.0\n\n[storage]\npath = \"session.json\""
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.dispatch.gas_price_multiplier, 2.0);
        assert_eq!(config.storage.path.as_deref(), Some("session.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/celo-connect.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[dispatch\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_problems() {
        let err = parse_config("[rpc]\ntimeout_secs = 0\n[dispatch]\ngas_price_multiplier = 0.1")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("timeout_secs"));
        assert!(message.contains("gas_price_multiplier"));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.dapp.name, "celo-connect");
    }
}
