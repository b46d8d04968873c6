//! # Rules Command
//!
//! Inspect and validate routing rule sets.
//!
//! ## Usage
//!
//! ```bash
//! # Show the active rule set
//! supportroute rules show
//!
//! # Validate a rule file before deploying it
//! supportroute rules check rules.toml
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use supportroute_rag::{PipelineKind, Router, RoutingRule, load_rules};

use crate::config::{Config, rules_source};
use crate::errors::{display_success, display_warning, report_router_error};
use crate::exit_codes::*;

/// Arguments for `rules show`
#[derive(Debug, Clone, Default)]
pub struct RulesShowArgs {
    pub rules: Option<PathBuf>,
    pub json: bool,
}

/// Arguments for `rules check`
#[derive(Debug, Clone)]
pub struct RulesCheckArgs {
    pub path: PathBuf,
}

#[derive(Debug, Serialize, PartialEq)]
struct RuleView {
    name: String,
    target: PipelineKind,
    weight: f64,
    matcher: String,
}

impl From<&RoutingRule> for RuleView {
    fn from(rule: &RoutingRule) -> Self {
        Self {
            name: rule.name().to_string(),
            target: rule.target(),
            weight: rule.weight(),
            matcher: rule.matcher().describe(),
        }
    }
}

/// Execute `rules show`
pub fn execute_show(args: RulesShowArgs) -> Result<i32> {
    let config = match Config::load_or_default() {
        Ok(config) => Some(config),
        Err(e) => {
            display_warning(&format!("Ignoring unreadable config: {e:#}"));
            None
        }
    };
    let source = rules_source(args.rules.as_deref(), config.as_ref());

    let router = match source.load_router() {
        Ok(router) => router,
        Err(e) => return Ok(report_router_error(&e)),
    };
    let views: Vec<RuleView> = router.rules().iter().map(RuleView::from).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&views).context("Failed to serialize rules")?;
        println!("{json}");
        return Ok(EXIT_SUCCESS);
    }

    println!("{}", "Routing rules".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{} Source: {}", "ℹ".blue(), source.describe().cyan());
    println!();
    for view in &views {
        let target = match view.target {
            PipelineKind::Structured => view.target.as_str().bright_cyan(),
            PipelineKind::Retrieval => view.target.as_str().bright_magenta(),
        };
        println!(
            "  {} → {} {}",
            view.name.bold(),
            target,
            format!("(weight {})", view.weight).dimmed()
        );
        println!("      {}", view.matcher.dimmed());
    }

    Ok(EXIT_SUCCESS)
}

/// Execute `rules check`
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - The file holds a valid, non-empty rule set
/// * `Ok(EXIT_CONFIG_ERROR)` - The file is unreadable or malformed
pub fn execute_check(args: RulesCheckArgs) -> Result<i32> {
    let router = match load_rules(&args.path).and_then(Router::new) {
        Ok(router) => router,
        Err(e) => return Ok(report_router_error(&e)),
    };

    let rules = router.rules();
    let structured = rules
        .iter()
        .filter(|r| r.target() == PipelineKind::Structured)
        .count();
    display_success(&format!(
        "{}: {} rule(s) valid ({} structured, {} retrieval)",
        args.path.display(),
        rules.len(),
        structured,
        rules.len() - structured
    ));
    if structured == 0 || structured == rules.len() {
        display_warning("all rules vote for one pipeline; the other is only reached on no-match");
    }

    Ok(EXIT_SUCCESS)
}
