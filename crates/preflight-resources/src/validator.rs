//! Structural validation of Komodo resource files.
//!
//! The walk stops at the first hard failure and returns it as an error.
//! Everything else is streamed to the [`Reporter`] as it is found.

use std::path::Path;

use preflight_common::config::ResourceCheckConfig;
use preflight_common::constants::{COMMAND_PREVIEW_CHARS, OPTIONAL_CONFIG_FIELDS};
use preflight_common::error::{PreflightError, Result};
use preflight_common::report::{Level, Reporter};
use toml::{Table, Value};

use crate::value;

const PRE_DEPLOY_SHAPE: &str =
    "pre_deploy should be a SystemCommand object with 'path' and 'command' fields";

/// Outcome of a passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// One entry per stack, in file order.
    pub stacks: Vec<StackSummary>,
    /// Number of soft warnings emitted.
    pub warnings: usize,
}

/// What the validator learned about one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    /// Stack name.
    pub name: String,
    /// Target server identifier.
    pub server_id: String,
    /// Git repository.
    pub repo: String,
    /// Whether `server_id` is still the template placeholder.
    pub placeholder_server_id: bool,
    /// Optional config fields left at their defaults.
    pub unset_fields: Vec<&'static str>,
    /// Whether a `pre_deploy` hook is configured.
    pub has_pre_deploy: bool,
}

/// Validates resource files against the stack schema.
#[derive(Debug, Clone)]
pub struct ResourceValidator {
    placeholder_server_id: String,
}

impl Default for ResourceValidator {
    fn default() -> Self {
        Self::new(&ResourceCheckConfig::default())
    }
}

/// Counts warnings on their way to the wrapped reporter.
struct Tally<'r> {
    inner: &'r mut dyn Reporter,
    warnings: usize,
}

impl Reporter for Tally<'_> {
    fn emit(&mut self, level: Level, message: &str) {
        if level == Level::Warn {
            self.warnings += 1;
        }
        self.inner.emit(level, message);
    }
}

impl ResourceValidator {
    /// Creates a validator using the given settings.
    #[must_use]
    pub fn new(config: &ResourceCheckConfig) -> Self {
        Self {
            placeholder_server_id: config.placeholder_server_id.clone(),
        }
    }

    /// Validates the resource file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::NotFound`] if the file does not exist,
    /// [`PreflightError::Toml`] if it is not valid TOML, and
    /// [`PreflightError::Schema`] on the first structural violation.
    pub fn validate_file(
        &self,
        path: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<ValidationSummary> {
        tracing::info!(path = %path.display(), "validating resource file");
        if !path.exists() {
            return Err(PreflightError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| PreflightError::io(path, e))?;
        self.validate_str(&content, path, reporter)
    }

    /// Validates resource file content; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::Toml`] on a syntax error and
    /// [`PreflightError::Schema`] on the first structural violation.
    pub fn validate_str(
        &self,
        content: &str,
        path: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<ValidationSummary> {
        let document: Table = content.parse().map_err(|source| PreflightError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        reporter.pass("TOML syntax is valid");
        self.validate_document(&document, reporter)
    }

    /// Validates an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::Schema`] on the first structural violation.
    pub fn validate_document(
        &self,
        document: &Table,
        reporter: &mut dyn Reporter,
    ) -> Result<ValidationSummary> {
        let entries = stack_entries(document)?;
        let mut tally = Tally {
            inner: reporter,
            warnings: 0,
        };
        let mut stacks = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            stacks.push(self.validate_stack(index + 1, entry, &mut tally)?);
        }
        Ok(ValidationSummary {
            stacks,
            warnings: tally.warnings,
        })
    }

    fn validate_stack(
        &self,
        number: usize,
        entry: &Value,
        reporter: &mut dyn Reporter,
    ) -> Result<StackSummary> {
        let Some(stack) = entry.as_table() else {
            return Err(PreflightError::schema(format!(
                "stack {number} should be a table, got {}",
                entry.type_str()
            )));
        };
        let name = stack.get("name").map_or_else(|| "unnamed".into(), value::render);
        tracing::debug!(number, name = %name, "validating stack");
        reporter.heading(&format!("\u{1f4e6} Validating stack {number}: {name}"));

        let _ = require(stack, "name", "Missing required field")?;
        reporter.pass(&format!("name: {name}"));
        let config = require(stack, "config", "Missing required field")?;
        reporter.pass("config: present");
        let Some(config) = config.as_table() else {
            return Err(PreflightError::schema(format!(
                "config should be a table, got {}",
                config.type_str()
            )));
        };

        let server_id = require(config, "server_id", "Missing required config field")?;
        let placeholder = server_id.as_str() == Some(self.placeholder_server_id.as_str());
        let server_id = value::render(server_id);
        if placeholder {
            reporter.warn(&format!("server_id: {server_id} (needs to be updated)"));
        } else {
            reporter.pass(&format!("server_id: {server_id}"));
        }
        let repo = value::render(require(config, "repo", "Missing required config field")?);
        reporter.pass(&format!("repo: {repo}"));

        let mut unset_fields = Vec::new();
        for (field, default) in OPTIONAL_CONFIG_FIELDS {
            match config.get(*field) {
                Some(v) if *field == "environment" => {
                    let state = if value::is_truthy(v) { "configured" } else { "empty" };
                    reporter.pass(&format!("{field}: {state}"));
                }
                Some(v) => reporter.pass(&format!("{field}: {}", value::render(v))),
                None => {
                    reporter.warn(&format!("{field}: not set (default: {default})"));
                    unset_fields.push(*field);
                }
            }
        }

        let has_pre_deploy = match config.get("pre_deploy") {
            Some(pre_deploy) => {
                check_pre_deploy(pre_deploy, reporter)?;
                true
            }
            None => false,
        };

        Ok(StackSummary {
            name,
            server_id,
            repo,
            placeholder_server_id: placeholder,
            unset_fields,
            has_pre_deploy,
        })
    }
}

/// Returns the `stack` entries, treating a bare table as a single stack.
fn stack_entries(document: &Table) -> Result<Vec<&Value>> {
    match document.get("stack") {
        None => Err(PreflightError::schema("No [[stack]] section found")),
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(other) => Ok(vec![other]),
    }
}

fn require<'t>(table: &'t Table, field: &str, context: &str) -> Result<&'t Value> {
    table
        .get(field)
        .ok_or_else(|| PreflightError::schema(format!("{context}: {field}")))
}

fn check_pre_deploy(pre_deploy: &Value, reporter: &mut dyn Reporter) -> Result<()> {
    let Some(hook) = pre_deploy.as_table() else {
        return Err(PreflightError::schema(PRE_DEPLOY_SHAPE));
    };
    let Some(command) = hook.get("command") else {
        return Err(PreflightError::schema("pre_deploy missing 'command' field"));
    };
    let command = value::preview(&value::render(command), COMMAND_PREVIEW_CHARS);
    reporter.pass(&format!("pre_deploy command: {command}..."));
    if let Some(path) = hook.get("path") {
        reporter.info(&format!("   pre_deploy path: {}", value::render(path)));
    }
    Ok(())
}
