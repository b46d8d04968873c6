//! # CLI Command Implementations
//!
//! This module contains the implementation of all CLI commands.
//! Each submodule represents a top-level command or command group.
//!
//! ## Available Commands
//!
//! - [`route`] - Decide which pipeline(s) should answer a question
//! - [`rules`] - Show or validate routing rule sets
//! - [`config`] - Manage CLI configuration (default rules, channel)

pub mod config;
pub mod route;
pub mod rules;
