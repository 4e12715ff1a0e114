//! `preflight ports` — Scan compose files for host port conflicts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use preflight_common::config::PortScanConfig;
use preflight_common::report::{ConsoleReporter, Reporter};
use preflight_ports::PortScanner;

use crate::output;

/// Arguments for the `ports` command.
#[derive(Args, Debug)]
pub struct PortsArgs {
    /// Deployment root holding the compose and env files.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Executes the `ports` command.
///
/// Exits with a failure code only when a host port is published more than
/// once. Undefined port variables are reported but never fail the check.
///
/// # Errors
///
/// Returns an error if the compose directory or an env file exists but
/// cannot be read.
pub fn execute(args: PortsArgs, config: PortScanConfig) -> anyhow::Result<ExitCode> {
    println!("\u{1f50d} Validating port configuration...");

    let mut reporter = ConsoleReporter;
    let report = PortScanner::new(&args.dir, config).scan(&mut reporter)?;

    print!("{}", output::port_allocation_table());
    println!();

    if report.has_conflicts() {
        reporter.fail("Port validation failed - conflicts detected!");
        print!("{}", output::tips("Tips to resolve conflicts:", output::CONFLICT_TIPS));
        return Ok(ExitCode::FAILURE);
    }

    reporter.pass("Port validation complete - no conflicts found!");
    let missing = report.missing_variables().count();
    if missing > 0 {
        println!();
        reporter.warn(&format!(
            "Warning: {missing} environment variable(s) not defined"
        ));
    }
    print!("{}", output::tips("Tips:", output::GENERAL_TIPS));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::path::Path;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(path, content).expect("write");
    }

    fn run(root: &Path) -> ExitCode {
        let args = PortsArgs {
            dir: root.to_path_buf(),
        };
        execute(args, PortScanConfig::default()).expect("scan should succeed")
    }

    #[test]
    fn conflict_exits_with_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "compose/a.yml",
            "services:\n  api:\n    ports:\n      - \"8080:80\"\n",
        );
        write(
            dir.path(),
            "compose/b.yml",
            "services:\n  admin:\n    ports:\n      - \"8080:3000\"\n",
        );
        assert_eq!(run(dir.path()), ExitCode::FAILURE);
    }

    #[test]
    fn disjoint_ports_exit_successfully_despite_missing_variables() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "docker-compose-prod.yml",
            "services:\n  traefik:\n    ports:\n      - \"80:80\"\n",
        );
        write(
            dir.path(),
            "compose/dozzle.yml",
            "services:\n  dozzle:\n    ports:\n      - \"${DOZZLE_PORT}:8080\"\n",
        );
        assert_eq!(run(dir.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn empty_root_exits_successfully() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(run(dir.path()), ExitCode::SUCCESS);
    }
}
