//! `preflight resources` — Validate the structure of a Komodo resource file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use preflight_common::config::ResourceCheckConfig;
use preflight_common::error::PreflightError;
use preflight_common::report::{ConsoleReporter, Reporter};
use preflight_resources::ResourceValidator;

/// Arguments for the `resources` command.
#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Path to the resource file [default: komodo-resources.toml].
    pub file: Option<PathBuf>,
}

/// Executes the `resources` command.
///
/// Exits with a failure code when the file is missing, unreadable, not valid
/// TOML or violates the stack schema.
///
/// # Errors
///
/// Returns an error only for failures that are not about the resource file
/// itself.
pub fn execute(args: ResourcesArgs, config: &ResourceCheckConfig) -> anyhow::Result<ExitCode> {
    let file = args.file.unwrap_or_else(|| config.file.clone());
    println!("\u{1f50d} Validating {}...", file.display());

    let mut reporter = ConsoleReporter;
    match ResourceValidator::new(config).validate_file(&file, &mut reporter) {
        Ok(summary) => {
            tracing::info!(
                stacks = summary.stacks.len(),
                warnings = summary.warnings,
                "resource file is valid"
            );
            println!("\n\u{1f389} TOML validation passed!");
            if summary.warnings > 0 {
                reporter.warn(&format!(
                    "{} stack(s) checked, {} warning(s)",
                    summary.stacks.len(),
                    summary.warnings
                ));
            }
            println!("\n\u{2705} Ready for Komodo deployment!");
            Ok(ExitCode::SUCCESS)
        }
        Err(
            e @ (PreflightError::NotFound { .. }
            | PreflightError::Io { .. }
            | PreflightError::Toml { .. }
            | PreflightError::Schema { .. }),
        ) => {
            tracing::debug!(error = %e, "resource file rejected");
            reporter.fail(&e.to_string());
            println!("\n\u{274c} Please fix the issues above before deploying");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn run(file: PathBuf) -> ExitCode {
        execute(ResourcesArgs { file: Some(file) }, &ResourceCheckConfig::default())
            .expect("resource problems are reported, not returned")
    }

    #[test]
    fn valid_file_exits_successfully() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("komodo-resources.toml");
        std::fs::write(
            &path,
            "[[stack]]\nname = \"a\"\n[stack.config]\nserver_id = \"your-server-id\"\nrepo = \"r\"\n",
        )
        .expect("write");
        assert_eq!(run(path), ExitCode::SUCCESS);
    }

    #[test]
    fn missing_file_exits_with_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(run(dir.path().join("absent.toml")), ExitCode::FAILURE);
    }

    #[test]
    fn schema_error_exits_with_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("komodo-resources.toml");
        std::fs::write(&path, "[[stack]]\nname = \"a\"\n[stack.config]\nrepo = \"r\"\n")
            .expect("write");
        assert_eq!(run(path), ExitCode::FAILURE);
    }

    #[test]
    fn syntax_error_exits_with_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("komodo-resources.toml");
        std::fs::write(&path, "[[stack]\n").expect("write");
        assert_eq!(run(path), ExitCode::FAILURE);
    }

    #[test]
    fn non_utf8_file_exits_with_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("komodo-resources.toml");
        std::fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d]).expect("write");
        assert_eq!(run(path), ExitCode::FAILURE);
    }
}
