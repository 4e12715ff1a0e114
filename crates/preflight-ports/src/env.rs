//! Environment table merged from env files and resource stack configs.
//!
//! Precedence, highest first: the primary env file, the example env file,
//! then the `environment` blocks embedded in the synced resource file.
//! Lower sources only fill keys that are still unset, and the example env
//! file never fills a key with an empty value.

use std::collections::BTreeMap;
use std::path::Path;

use preflight_common::config::PortScanConfig;
use preflight_common::error::{PreflightError, Result};
use preflight_common::report::Reporter;

/// Result of parsing `KEY=VALUE` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEnv {
    /// Assignments in source order.
    pub pairs: Vec<(String, String)>,
    /// Lines that are neither blank, comments nor assignments, with their
    /// 1-based line number.
    pub malformed: Vec<(usize, String)>,
}

/// Parses flat `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped. Keys and values are trimmed;
/// quotes are kept as written.
#[must_use]
pub fn parse_env(text: &str) -> ParsedEnv {
    let mut parsed = ParsedEnv::default();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => parsed
                .pairs
                .push((key.trim().to_string(), value.trim().to_string())),
            _ => parsed.malformed.push((index + 1, line.to_string())),
        }
    }
    parsed
}

/// Ordered variable name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentTable {
    vars: BTreeMap<String, String>,
}

impl EnvironmentTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Builds the table from the well-known sources under `root`.
    ///
    /// Missing files are skipped. Malformed lines and an unparsable resource
    /// file are reported as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn load(root: &Path, config: &PortScanConfig, reporter: &mut dyn Reporter) -> Result<Self> {
        let mut table = Self::new();

        let env_path = root.join(&config.env_file);
        if let Some(parsed) = read_env_file(&env_path, reporter)? {
            for (key, value) in parsed.pairs {
                table.insert(key, value);
            }
        }

        let example_path = root.join(&config.example_env_file);
        if let Some(parsed) = read_env_file(&example_path, reporter)? {
            for (key, value) in parsed.pairs.into_iter().filter(|(_, v)| !v.is_empty()) {
                let _ = table.fill(key, value);
            }
        }

        let sync_path = root.join(&config.sync_resource_file);
        for (stack, environment) in read_stack_environments(&sync_path, reporter)? {
            let parsed = parse_env(&environment);
            report_malformed(&format!("{} ({stack})", sync_path.display()), &parsed, reporter);
            for (key, value) in parsed.pairs {
                let _ = table.fill(key, value);
            }
        }

        tracing::debug!(count = table.len(), "environment table loaded");
        Ok(table)
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.vars.insert(key.into(), value.into());
    }

    /// Sets `key` only if it is not yet defined. Returns whether it was set.
    pub fn fill(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.vars.contains_key(&key) {
            return false;
        }
        let _ = self.vars.insert(key, value.into());
        true
    }

    /// Value of `key`, if defined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of defined variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn read_env_file(path: &Path, reporter: &mut dyn Reporter) -> Result<Option<ParsedEnv>> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "env file not present, skipping");
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
    let parsed = parse_env(&content);
    report_malformed(&path.display().to_string(), &parsed, reporter);
    Ok(Some(parsed))
}

fn report_malformed(source: &str, parsed: &ParsedEnv, reporter: &mut dyn Reporter) {
    for (line_no, line) in &parsed.malformed {
        tracing::warn!(source, line_no, "skipping malformed env line");
        reporter.warn(&format!("Skipping malformed line {line_no} in {source}: {line}"));
    }
}

/// Returns `(stack name, environment)` for every stack in the resource file
/// that carries a string `environment`.
fn read_stack_environments(
    path: &Path,
    reporter: &mut dyn Reporter,
) -> Result<Vec<(String, String)>> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "resource file not present, skipping");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
    let document: toml::Table = match content.parse() {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unparsable resource file");
            reporter.warn(&format!("Error reading {}: {e}", path.display()));
            return Ok(Vec::new());
        }
    };

    let stacks: Vec<&toml::Value> = match document.get("stack") {
        None => Vec::new(),
        Some(toml::Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    };

    let mut environments = Vec::new();
    for (index, stack) in stacks.into_iter().enumerate() {
        let name = stack
            .get("name")
            .and_then(toml::Value::as_str)
            .map_or_else(|| format!("stack {}", index + 1), str::to_string);
        match stack.get("config").and_then(|c| c.get("environment")) {
            None => {}
            Some(toml::Value::String(environment)) => {
                environments.push((name, environment.clone()));
            }
            Some(other) => reporter.warn(&format!(
                "Ignoring environment of {name} in {}: expected a string, got {}",
                path.display(),
                other.type_str()
            )),
        }
    }
    Ok(environments)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use preflight_common::report::{Level, Recorder};

    use super::*;

    #[test]
    fn parse_skips_blanks_and_comments() {
        let parsed = parse_env("# ports\n\nPORT=3100\n  DOZZLE_PORT = 8084  \n");
        assert_eq!(
            parsed.pairs,
            vec![
                ("PORT".to_string(), "3100".to_string()),
                ("DOZZLE_PORT".to_string(), "8084".to_string()),
            ]
        );
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn parse_splits_on_first_equals() {
        let parsed = parse_env("DATABASE_URL=postgres://u:p@db/app?sslmode=disable\n");
        assert_eq!(parsed.pairs[0].1, "postgres://u:p@db/app?sslmode=disable");
    }

    #[test]
    fn parse_collects_malformed_lines() {
        let parsed = parse_env("GOOD=1\nnot an assignment\n=orphan\n");
        assert_eq!(parsed.pairs.len(), 1);
        assert_eq!(
            parsed.malformed,
            vec![
                (2, "not an assignment".to_string()),
                (3, "=orphan".to_string()),
            ]
        );
    }

    #[test]
    fn fill_never_overwrites() {
        let mut table = EnvironmentTable::new();
        table.insert("PORT", "3100");
        assert!(!table.fill("PORT", "9999"));
        assert!(table.fill("METRICS_PORT", "8083"));
        assert_eq!(table.get("PORT"), Some("3100"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn load_without_any_source_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert!(table.is_empty());
        assert!(rec.lines().is_empty());
    }

    #[test]
    fn primary_env_file_wins_over_example() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".env"), "PORT=3100\n").expect("write");
        std::fs::write(dir.path().join("example.env"), "PORT=9999\nDOZZLE_PORT=8084\n")
            .expect("write");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert_eq!(table.get("PORT"), Some("3100"));
        assert_eq!(table.get("DOZZLE_PORT"), Some("8084"));
    }

    #[test]
    fn empty_example_values_stay_undefined() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("example.env"), "DOZZLE_PORT=\nPORT=3100\n")
            .expect("write");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert_eq!(table.get("DOZZLE_PORT"), None);
        assert_eq!(table.get("PORT"), Some("3100"));
    }

    #[test]
    fn empty_primary_values_are_defined() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".env"), "DOZZLE_PORT=\n").expect("write");
        std::fs::write(dir.path().join("example.env"), "DOZZLE_PORT=8084\n").expect("write");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert_eq!(table.get("DOZZLE_PORT"), Some(""));
    }

    #[test]
    fn later_duplicates_in_primary_file_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".env"), "PORT=1\nPORT=2\n").expect("write");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert_eq!(table.get("PORT"), Some("2"));
    }

    #[test]
    fn stack_environments_fill_remaining_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".env"), "PORT=3100\n").expect("write");
        std::fs::write(
            dir.path().join("komodo-sync-resources.toml"),
            r#"
[[stack]]
name = "flowise"
[stack.config]
environment = """
PORT=4000
METRICS_PORT=8083
garbage
"""

[[stack]]
name = "dozzle"
[stack.config]
environment = ["DOZZLE_PORT=8084"]
"#,
        )
        .expect("write");

        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert_eq!(table.get("PORT"), Some("3100"));
        assert_eq!(table.get("METRICS_PORT"), Some("8083"));
        assert_eq!(table.get("DOZZLE_PORT"), None);
        assert!(rec.contains(Level::Warn, "Skipping malformed line 3"));
        assert!(rec.contains(Level::Warn, "expected a string, got array"));
    }

    #[test]
    fn unparsable_resource_file_is_a_warning() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("komodo-sync-resources.toml"), "[[stack]\n")
            .expect("write");
        let mut rec = Recorder::new();
        let table = EnvironmentTable::load(dir.path(), &PortScanConfig::default(), &mut rec)
            .expect("load");
        assert!(table.is_empty());
        assert_eq!(rec.count(Level::Warn), 1);
    }
}
