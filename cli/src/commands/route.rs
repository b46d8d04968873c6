//! # Route Command
//!
//! Decides which pipeline(s) should answer a support question.
//!
//! ## Usage
//!
//! ```bash
//! # Route with the built-in rules
//! supportroute route "Average order value by month"
//!
//! # Route with a custom rule file and request metadata
//! supportroute route "my order never arrived" --rules rules.toml --channel email
//!
//! # Get JSON output
//! supportroute route "products similar to the X200" --json
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use supportroute_rag::{Query, QueryMetadata, RouteDecision, RouteTarget};

use crate::config::{Config, rules_source};
use crate::errors::{display_warning, report_router_error};
use crate::exit_codes::*;

/// Arguments for the route command
#[derive(Debug, Clone, Default)]
pub struct RouteArgs {
    /// The natural-language question
    pub query: String,
    /// Rule file overriding config and environment
    pub rules: Option<PathBuf>,
    pub customer_id: Option<String>,
    pub channel: Option<String>,
    /// Output as JSON
    pub json: bool,
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct RouteOutput<'a> {
    query: &'a str,
    metadata: &'a QueryMetadata,
    rules: String,
    decision: &'a RouteDecision,
}

/// Execute the route command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - A decision was printed
/// * `Ok(EXIT_INVALID_INPUT)` - The question was empty
/// * `Ok(EXIT_CONFIG_ERROR)` - The rule set could not be loaded
pub fn execute(args: RouteArgs) -> Result<i32> {
    let config = match Config::load_or_default() {
        Ok(config) => Some(config),
        Err(e) => {
            display_warning(&format!("Ignoring unreadable config: {e:#}"));
            None
        }
    };

    let source = rules_source(args.rules.as_deref(), config.as_ref());
    if args.verbose {
        eprintln!("{} Using {}", "ℹ".blue(), source.describe());
    }

    let router = match source.load_router() {
        Ok(router) => router,
        Err(e) => return Ok(report_router_error(&e)),
    };

    let query = build_query(&args, config.as_ref());
    let decision = match router.route(&query) {
        Ok(decision) => decision,
        Err(e) => return Ok(report_router_error(&e)),
    };

    if args.json {
        let output = RouteOutput {
            query: query.text(),
            metadata: query.metadata(),
            rules: source.describe(),
            decision: &decision,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize decision")?;
        println!("{json}");
    } else {
        print_decision(&decision, args.verbose);
    }

    Ok(EXIT_SUCCESS)
}

/// Assemble the query, falling back to the configured default channel.
fn build_query(args: &RouteArgs, config: Option<&Config>) -> Query {
    let mut query = Query::new(args.query.clone());
    if let Some(customer_id) = &args.customer_id {
        query = query.with_customer_id(customer_id.clone());
    }
    let channel = args
        .channel
        .clone()
        .or_else(|| config.and_then(|c| c.default_channel.clone()));
    if let Some(channel) = channel {
        query = query.with_channel(channel);
    }
    query
}

fn print_decision(decision: &RouteDecision, verbose: bool) {
    let target = match decision.target {
        RouteTarget::Structured => "structured".bright_cyan().bold(),
        RouteTarget::Retrieval => "retrieval".bright_magenta().bold(),
        RouteTarget::Both => "both".yellow().bold(),
    };

    println!(
        "{} Route: {} {}",
        "→".cyan(),
        target,
        format!("(confidence {:.2})", decision.confidence).dimmed()
    );
    println!("  {} {}", "Rationale:".dimmed(), decision.rationale.join(", "));

    if decision.is_hybrid() {
        println!(
            "  {} invoke both pipelines and merge the answers",
            "Note:".yellow()
        );
    }

    if verbose {
        println!(
            "  {} structured {:.2} · retrieval {:.2}",
            "Scores:".dimmed(),
            decision.scores.structured,
            decision.scores.retrieval
        );
        if !decision.matched_rules.is_empty() {
            println!(
                "  {} {}",
                "Matched:".dimmed(),
                decision.matched_rules.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_rules(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("rules.toml");
        fs::write(
            &path,
            r#"
[[rule]]
name = "aggregation"
target = "structured"
keywords = ["average", "by month"]

[[rule]]
name = "similar-to"
target = "retrieval"
keywords = ["similar"]
"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_build_query_uses_config_channel() {
        let args = RouteArgs {
            query: "hello".to_string(),
            customer_id: Some("cus_1".to_string()),
            ..Default::default()
        };
        let config = Config::default().with_default_channel("email");

        let query = build_query(&args, Some(&config));
        assert_eq!(query.channel(), Some("email"));
        assert_eq!(query.customer_id(), Some("cus_1"));
    }

    #[test]
    fn test_build_query_flag_channel_wins() {
        let args = RouteArgs {
            query: "hello".to_string(),
            channel: Some("chat".to_string()),
            ..Default::default()
        };
        let config = Config::default().with_default_channel("email");

        assert_eq!(build_query(&args, Some(&config)).channel(), Some("chat"));
    }

    #[test]
    fn test_route_output_json_shape() {
        let query = Query::new("hello").with_channel("chat");
        let decision = supportroute_rag::route(&query, &supportroute_rag::default_rules()).unwrap();
        let output = RouteOutput {
            query: query.text(),
            metadata: query.metadata(),
            rules: "built-in rules".to_string(),
            decision: &decision,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["query"], "hello");
        assert_eq!(value["metadata"]["channel"], "chat");
        assert!(value["metadata"].get("customer_id").is_none());
        assert_eq!(value["decision"]["target"], "both");
    }

    #[test]
    fn test_execute_with_rule_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = RouteArgs {
            query: "Average order value by month".to_string(),
            rules: Some(write_rules(&temp_dir)),
            json: true,
            ..Default::default()
        };
        assert_eq!(execute(args).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_execute_empty_query_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let args = RouteArgs {
            query: "   ".to_string(),
            rules: Some(write_rules(&temp_dir)),
            ..Default::default()
        };
        assert_eq!(execute(args).unwrap(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn test_execute_missing_rule_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let args = RouteArgs {
            query: "hello".to_string(),
            rules: Some(temp_dir.path().join("absent.toml")),
            ..Default::default()
        };
        assert_eq!(execute(args).unwrap(), EXIT_CONFIG_ERROR);
    }
}
