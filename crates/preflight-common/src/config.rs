//! Configuration model for the preflight checks.
//!
//! Every field has a default taken from [`crate::constants`], so a config
//! file only needs to name what it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PreflightError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreflightConfig {
    /// Settings for the resource file validator.
    pub resources: ResourceCheckConfig,
    /// Settings for the port conflict scanner.
    pub ports: PortScanConfig,
}

/// Settings for the resource file validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceCheckConfig {
    /// Resource file checked when none is given on the command line.
    pub file: PathBuf,
    /// `server_id` value that is reported as not yet filled in.
    pub placeholder_server_id: String,
}

impl Default for ResourceCheckConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(constants::DEFAULT_RESOURCE_FILE),
            placeholder_server_id: constants::PLACEHOLDER_SERVER_ID.into(),
        }
    }
}

/// Settings for the port conflict scanner.
///
/// Relative paths are resolved against the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortScanConfig {
    /// Production compose file.
    pub prod_compose_file: PathBuf,
    /// Directory scanned for additional compose files.
    pub compose_dir: PathBuf,
    /// Primary env file.
    pub env_file: PathBuf,
    /// Fallback env file.
    pub example_env_file: PathBuf,
    /// Resource file whose stack `environment` blocks are merged last.
    pub sync_resource_file: PathBuf,
    /// Port variables that must be defined.
    pub expected_variables: Vec<String>,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            prod_compose_file: PathBuf::from(constants::PROD_COMPOSE_FILE),
            compose_dir: PathBuf::from(constants::COMPOSE_DIR),
            env_file: PathBuf::from(constants::ENV_FILE),
            example_env_file: PathBuf::from(constants::EXAMPLE_ENV_FILE),
            sync_resource_file: PathBuf::from(constants::SYNC_RESOURCE_FILE),
            expected_variables: constants::EXPECTED_PORT_VARIABLES
                .iter()
                .map(|v| (*v).to_string())
                .collect(),
        }
    }
}

impl PreflightConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::Config`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| PreflightError::Config {
            message: e.to_string(),
        })
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading preflight configuration");
        if !path.exists() {
            return Err(PreflightError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
        Self::from_toml_str(&content)
    }
}
