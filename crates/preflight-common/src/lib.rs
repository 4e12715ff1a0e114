//! # preflight-common
//!
//! Shared error definitions, configuration model, constants and report
//! output used by the preflight checks.
//!
//! This crate is the leaf of the dependency graph. It carries no validation
//! logic of its own: the resource validator and the port scanner are
//! independent and only meet here for ambient concerns.

pub mod config;
pub mod constants;
pub mod error;
pub mod report;
