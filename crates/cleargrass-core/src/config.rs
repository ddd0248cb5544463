//! Sensor configuration.
//!
//! Three keys are recognized: `host`, `token` and `name`.
//!
//! ```toml
//! host = "192.168.1.20"
//! token = "0123456789abcdef0123456789abcdef"
//! name = "Bedroom air"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default entity name.
pub const DEFAULT_NAME: &str = "clear_grass";

/// Required token length in characters.
pub const TOKEN_LENGTH: usize = 32;

/// Characters of the token shown in logs.
const TOKEN_PREFIX_LENGTH: usize = 5;

/// Device pairing token.
///
/// `Debug` and `Display` only reveal the first five characters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a token string. Length is checked by [`SensorConfig::validate`].
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The full token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The first five characters, for logging.
    pub fn prefix(&self) -> &str {
        match self.0.char_indices().nth(TOKEN_PREFIX_LENGTH) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}...)", self.prefix())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...", self.prefix())
    }
}

/// Configuration for one air quality monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    /// Device host address.
    pub host: String,
    /// Pairing token, exactly 32 characters.
    pub token: Token,
    /// Entity display name.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl SensorConfig {
    /// Create a configuration with the default name.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: Token::new(token),
            name: default_name(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return all errors found.
    ///
    /// This checks:
    /// - Host is not empty
    /// - Token is exactly 32 characters
    /// - Name is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push(ValidationError {
                field: "host".to_string(),
                message: "host cannot be empty".to_string(),
            });
        }

        let token_len = self.token.len();
        if token_len != TOKEN_LENGTH {
            errors.push(ValidationError {
                field: "token".to_string(),
                message: format!(
                    "token must be exactly {} characters (got {})",
                    TOKEN_LENGTH, token_len
                ),
            });
        }

        if self.name.is_empty() {
            errors.push(ValidationError {
                field: "name".to_string(),
                message: "name cannot be empty string (omit it to use the default)".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field name (e.g., `token`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cleargrass")
        .join("sensor.toml")
}
