//! Compose file discovery and port extraction.

use std::path::{Path, PathBuf};

use preflight_common::config::PortScanConfig;
use preflight_common::constants::COMPOSE_EXTENSIONS;
use preflight_common::error::{PreflightError, Result};
use serde_yaml::Value;

use crate::mapping::{PortMapping, parse_port_entry};

/// Lists the compose files to scan under `root`, sorted.
///
/// Picks up the production compose file when present plus every
/// `*.yml` / `*.yaml` directly inside the compose directory.
///
/// # Errors
///
/// Returns an error if the compose directory exists but cannot be listed.
pub fn discover_compose_files(root: &Path, config: &PortScanConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let prod = root.join(&config.prod_compose_file);
    if prod.is_file() {
        files.push(prod);
    }

    let dir = root.join(&config.compose_dir);
    if dir.is_dir() {
        for entry in std::fs::read_dir(&dir).map_err(|e| PreflightError::io(&dir, e))? {
            let path = entry.map_err(|e| PreflightError::io(&dir, e))?.path();
            if path.is_file() && has_compose_extension(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), "discovered compose files");
    Ok(files)
}

fn has_compose_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| COMPOSE_EXTENSIONS.contains(&ext))
}

/// Reads a compose file and extracts its port mappings.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML, or if
/// `services` is present but not a mapping.
pub fn extract_ports(path: &Path) -> Result<Vec<PortMapping>> {
    tracing::debug!(path = %path.display(), "extracting port mappings");
    let content = std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
    parse_ports(&content, path)
}

/// Extracts port mappings from compose file content.
///
/// An empty document or one without `services` yields no mappings.
///
/// # Errors
///
/// Returns an error if the content is not valid YAML or `services` is not a
/// mapping.
pub fn parse_ports(content: &str, source: &Path) -> Result<Vec<PortMapping>> {
    let document: Value = serde_yaml::from_str(content).map_err(|e| PreflightError::Yaml {
        path: source.to_path_buf(),
        source: e,
    })?;

    let services = match document.get("services") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Mapping(services)) => services,
        Some(_) => {
            return Err(PreflightError::schema(format!(
                "services in {} should be a mapping",
                source.display()
            )));
        }
    };

    let mut mappings = Vec::new();
    for (name, service) in services {
        let Some(ports) = service.get("ports").and_then(Value::as_sequence) else {
            continue;
        };
        let service_name = service_name(name);
        for entry in ports.iter().filter_map(Value::as_str) {
            if let Some((host, container_port)) = parse_port_entry(entry) {
                mappings.push(PortMapping {
                    host,
                    container_port,
                    service: service_name.clone(),
                    source: source.to_path_buf(),
                });
            }
        }
    }
    Ok(mappings)
}

fn service_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => "<unnamed>".into(),
    }
}
