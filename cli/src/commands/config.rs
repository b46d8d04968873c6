//! # Config Command
//!
//! Manage the persistent CLI configuration.
//!
//! ## Usage
//!
//! ```bash
//! # Show current configuration
//! supportroute config show
//!
//! # Use a rule file by default (validated before saving)
//! supportroute config set-rules ./rules.toml
//!
//! # Go back to the built-in rules
//! supportroute config clear-rules
//!
//! # Attach a channel to every query unless --channel is given
//! supportroute config set-channel email
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use supportroute_rag::{Router, load_rules};

use crate::config::{Config, config_path, rules_source};
use crate::errors::{display_info, display_success, report_router_error};
use crate::exit_codes::*;

/// Execute `config show`
pub fn execute_show() -> Result<i32> {
    let path = config_path()?;
    let config = Config::load_or_default_from(&path)?;

    println!("{}", "supportroute configuration".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!();
    display_info(&format!(
        "Config file: {} {}",
        path.display().to_string().cyan(),
        if path.exists() {
            "".normal()
        } else {
            "(not created yet)".dimmed()
        }
    ));
    display_info(&format!(
        "Rules path: {}",
        config
            .rules_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    ));
    display_info(&format!(
        "Default channel: {}",
        config.default_channel.as_deref().unwrap_or("(none)")
    ));
    println!(
        "{} Active rules: {}",
        "→".cyan(),
        rules_source(None, Some(&config)).describe()
    );

    Ok(EXIT_SUCCESS)
}

/// Execute `config set-rules`
///
/// The rule file is loaded and validated first; an invalid file is never
/// written to the config.
pub fn execute_set_rules(path: PathBuf) -> Result<i32> {
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("Failed to determine current directory")?
            .join(path)
    };
    execute_set_rules_at(&config_path()?, &path)
}

/// `config set-rules` against an explicit config file.
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - The rule file is valid and was saved
/// * `Ok(EXIT_CONFIG_ERROR)` - The rule file is invalid; the config is untouched
pub fn execute_set_rules_at(config_file: &Path, rules_path: &Path) -> Result<i32> {
    let router = match load_rules(rules_path).and_then(Router::new) {
        Ok(router) => router,
        Err(e) => return Ok(report_router_error(&e)),
    };

    let config = Config::load_or_default_from(config_file)?.with_rules_path(rules_path);
    config.save_to(config_file)?;

    display_success(&format!(
        "Default rules set to {} ({} rule(s))",
        rules_path.display(),
        router.rules().len()
    ));
    Ok(EXIT_SUCCESS)
}

/// Execute `config clear-rules`
pub fn execute_clear_rules() -> Result<i32> {
    execute_clear_rules_at(&config_path()?)
}

/// `config clear-rules` against an explicit config file.
pub fn execute_clear_rules_at(config_file: &Path) -> Result<i32> {
    let mut config = Config::load_or_default_from(config_file)?;
    config.rules_path = None;
    config.save_to(config_file)?;

    display_success("Default rules reset to the built-in rule set");
    Ok(EXIT_SUCCESS)
}

/// Execute `config set-channel`; `None` clears it.
pub fn execute_set_channel(channel: Option<String>) -> Result<i32> {
    execute_set_channel_at(&config_path()?, channel)
}

/// `config set-channel` against an explicit config file.
pub fn execute_set_channel_at(config_file: &Path, channel: Option<String>) -> Result<i32> {
    let mut config = Config::load_or_default_from(config_file)?;
    config.default_channel = channel
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    config.save_to(config_file)?;

    match &config.default_channel {
        Some(channel) => display_success(&format!("Default channel set to {channel}")),
        None => display_success("Default channel cleared"),
    }
    Ok(EXIT_SUCCESS)
}
