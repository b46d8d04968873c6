//! # supportroute CLI Library
//!
//! Command-line front end for the support query router: decides whether a
//! question goes to the retrieval-augmented pipeline, the structured-query
//! pipeline, or both.
//!
//! ## Modules
//!
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration management and rule set resolution
//! - [`errors`] - Error display
//! - [`exit_codes`] - Standard exit codes

pub mod commands;
pub mod config;
pub mod errors;
pub mod exit_codes;

// Re-export commonly used types
pub use config::{Config, RulesSource};
