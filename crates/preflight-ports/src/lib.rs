//! # preflight-ports
//!
//! Host-port conflict scanner for Compose-based deployments.
//!
//! Handles:
//! - **Compose**: discovery of compose files and extraction of `ports` entries.
//! - **Mapping**: parsing of `HOST:CONTAINER` short-syntax entries.
//! - **Env**: the environment table merged from env files and stack configs.
//! - **Scan**: conflict detection and port variable cross-check.

pub mod compose;
pub mod env;
pub mod mapping;
pub mod scan;

pub use env::EnvironmentTable;
pub use mapping::{HostBinding, PortMapping};
pub use scan::{PortScanner, ScanReport};
