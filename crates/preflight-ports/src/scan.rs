//! Port conflict scan over all compose files of a deployment.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use preflight_common::config::PortScanConfig;
use preflight_common::error::Result;
use preflight_common::report::Reporter;

use crate::compose;
use crate::env::EnvironmentTable;
use crate::mapping::{HostBinding, PortMapping};

/// A service publishing a fixed host port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortClaim {
    /// Compose file declaring the mapping.
    pub source: PathBuf,
    /// Service declaring the mapping.
    pub service: String,
    /// Container port the host port forwards to.
    pub container_port: String,
}

/// All claims on one host port, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortUsage {
    /// Literal host port.
    pub host_port: String,
    /// Services publishing it.
    pub claims: Vec<PortClaim>,
}

impl PortUsage {
    /// More than one service publishes this host port.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.claims.len() > 1
    }
}

/// Resolution of one expected port variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCheck {
    /// Variable name.
    pub name: String,
    /// Value from the environment table, if defined.
    pub value: Option<String>,
}

/// Everything the scan found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Compose files scanned, sorted.
    pub files: Vec<PathBuf>,
    /// Compose files that could not be read or parsed.
    pub unreadable: Vec<PathBuf>,
    /// Fixed host ports in first-seen order.
    pub ports: Vec<PortUsage>,
    /// Mappings whose host port comes from a variable.
    pub variable_mappings: Vec<PortMapping>,
    /// Expected and discovered port variables, sorted by name.
    pub variables: Vec<VariableCheck>,
}

impl ScanReport {
    /// Adds a mapping to the report.
    pub fn record(&mut self, mapping: PortMapping) {
        let PortMapping {
            host,
            container_port,
            service,
            source,
        } = mapping;
        let host_port = match host {
            HostBinding::Fixed(port) => port,
            HostBinding::Variable(name) => {
                self.variable_mappings.push(PortMapping {
                    host: HostBinding::Variable(name),
                    container_port,
                    service,
                    source,
                });
                return;
            }
        };
        let claim = PortClaim {
            source,
            service,
            container_port,
        };
        match self.ports.iter_mut().find(|u| u.host_port == host_port) {
            Some(usage) => usage.claims.push(claim),
            None => self.ports.push(PortUsage {
                host_port,
                claims: vec![claim],
            }),
        }
    }

    /// Host ports published more than once.
    pub fn conflicts(&self) -> impl Iterator<Item = &PortUsage> {
        self.ports.iter().filter(|u| u.is_conflict())
    }

    /// Whether any host port is published more than once.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    /// Names of port variables with no value.
    pub fn missing_variables(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .filter(|v| v.value.is_none())
            .map(|v| v.name.as_str())
    }
}

/// Scans a deployment root for host port conflicts.
#[derive(Debug, Clone)]
pub struct PortScanner {
    root: PathBuf,
    config: PortScanConfig,
}

impl PortScanner {
    /// Creates a scanner over `root` with the given file locations.
    pub fn new(root: impl Into<PathBuf>, config: PortScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Runs the scan, streaming findings to `reporter`.
    ///
    /// A compose file that cannot be read or parsed is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose directory cannot be listed or an
    /// existing env file cannot be read.
    pub fn scan(&self, reporter: &mut dyn Reporter) -> Result<ScanReport> {
        tracing::info!(root = %self.root.display(), "scanning compose files");
        let mut report = ScanReport {
            files: compose::discover_compose_files(&self.root, &self.config)?,
            ..ScanReport::default()
        };

        reporter.heading("\u{1f4cb} Scanning compose files for port mappings...");
        for path in report.files.clone() {
            let shown = self.relative(&path).display().to_string();
            reporter.heading(&format!("\u{1f4c4} {shown}:"));
            let mappings = match compose::extract_ports(&path) {
                Ok(mappings) => mappings,
                Err(e) => {
                    tracing::warn!(path = %shown, error = %e, "skipping unreadable compose file");
                    reporter.warn(&format!("Error reading {shown}: {e}"));
                    report.unreadable.push(path);
                    Vec::new()
                }
            };
            if mappings.is_empty() {
                reporter.info("     (no ports exposed)");
                continue;
            }
            for mapping in mappings {
                reporter.info(&format!(
                    "     - {} {} \u{2192} {}",
                    match mapping.host {
                        HostBinding::Fixed(_) => "Port",
                        HostBinding::Variable(_) => "Variable",
                    },
                    mapping.host,
                    mapping.container_port
                ));
                report.record(mapping);
            }
        }

        reporter.heading(&format!(
            "\u{1f522} Total unique ports found: {}",
            report.ports.len()
        ));
        self.report_conflicts(&report, reporter);

        reporter.heading("\u{1f527} Checking port environment variables...");
        let env = EnvironmentTable::load(&self.root, &self.config, reporter)?;
        report.variables = self.check_variables(&report, &env, reporter);

        tracing::info!(
            files = report.files.len(),
            ports = report.ports.len(),
            conflicts = report.conflicts().count(),
            "scan finished"
        );
        Ok(report)
    }

    fn report_conflicts(&self, report: &ScanReport, reporter: &mut dyn Reporter) {
        reporter.heading("\u{1f50d} Checking for port conflicts...");
        if !report.has_conflicts() {
            reporter.pass("No port conflicts detected");
            return;
        }
        reporter.fail("Found port conflicts:");
        for usage in report.conflicts() {
            reporter.info(&format!("   Port {} is used in:", usage.host_port));
            for claim in &usage.claims {
                reporter.info(&format!(
                    "     - {} ({} \u{2192} {})",
                    self.relative(&claim.source).display(),
                    claim.service,
                    claim.container_port
                ));
            }
        }
    }

    fn check_variables(
        &self,
        report: &ScanReport,
        env: &EnvironmentTable,
        reporter: &mut dyn Reporter,
    ) -> Vec<VariableCheck> {
        let mut names: BTreeSet<&str> = self
            .config
            .expected_variables
            .iter()
            .map(String::as_str)
            .collect();
        names.extend(report.variable_mappings.iter().filter_map(PortMapping::variable));

        names
            .into_iter()
            .map(|name| {
                let value = env.get(name);
                match value {
                    Some(v) => reporter.pass(&format!("{name} = {v}")),
                    None => reporter.warn(&format!("{name} is not defined")),
                }
                VariableCheck {
                    name: name.to_string(),
                    value: value.map(str::to_string),
                }
            })
            .collect()
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}
