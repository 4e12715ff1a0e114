//! Unified error type for the preflight workspace.
//!
//! Every variant is a hard failure: it aborts the current check and forces
//! a non-zero exit code. Soft findings are emitted through
//! [`crate::report::Reporter`] instead and never become errors.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// A required input file does not exist.
    #[error("File {} not found", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid TOML.
    #[error("TOML syntax error: {source}")]
    Toml {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser error.
        source: toml::de::Error,
    },

    /// The document is not valid YAML.
    #[error("YAML syntax error in {}: {source}", .path.display())]
    Yaml {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// The document parsed but does not have the required structure.
    #[error("{message}")]
    Schema {
        /// Description of the structural problem.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

impl PreflightError {
    /// Builds a [`PreflightError::Schema`] from any message.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PreflightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let err = PreflightError::NotFound {
            path: PathBuf::from("komodo-resources.toml"),
        };
        assert_eq!(err.to_string(), "File komodo-resources.toml not found");
    }

    #[test]
    fn schema_message_is_displayed_verbatim() {
        let err = PreflightError::schema("No [[stack]] section found");
        assert_eq!(err.to_string(), "No [[stack]] section found");
    }
}
