//! # preflight-resources
//!
//! Structure validator for the TOML resource file consumed by the Komodo
//! deployment orchestrator.
//!
//! - **Validator**: walks every `[[stack]]` entry, checks required keys and
//!   reports defaults and placeholders.
//! - **Value**: rendering helpers for TOML values in diagnostic lines.

pub mod validator;
pub mod value;

pub use validator::{ResourceValidator, StackSummary, ValidationSummary};
