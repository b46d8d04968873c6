//! Loading rule sets from disk.
//!
//! Rule files are TOML (`[[rule]]` tables) or JSON (`{"rule": [...]}`),
//! selected by file extension:
//!
//! ```toml
//! [[rule]]
//! name = "aggregation"
//! target = "structured"
//! weight = 1.0
//! keywords = ["average", "total", "how many"]
//!
//! [[rule]]
//! name = "lookup"
//! target = "structured"
//! pattern = '\border\s*#\d+'
//! ```
//!
//! Each entry carries exactly one of `keywords`, `pattern` or `channels`.
//! Every failure is reported as [`RouterError::Configuration`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RouterError;
use crate::routing::{RoutingRule, RuleMatcher, validate_rules};
use crate::types::PipelineKind;

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    name: String,
    target: PipelineKind,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    channels: Option<Vec<String>>,
}

impl RuleEntry {
    fn into_rule(self) -> Result<RoutingRule, RouterError> {
        let matcher = match (self.keywords, self.pattern, self.channels) {
            (Some(keywords), None, None) => RuleMatcher::keywords(keywords.as_slice()),
            (None, Some(pattern), None) => RuleMatcher::pattern(&pattern),
            (None, None, Some(channels)) => RuleMatcher::channels(channels.as_slice()),
            (None, None, None) => Err(RouterError::config(
                "missing matcher: set one of keywords, pattern or channels",
            )),
            _ => Err(RouterError::config(
                "only one of keywords, pattern or channels may be set",
            )),
        }
        .map_err(|e| match e {
            RouterError::Configuration(msg) => {
                RouterError::config(format!("rule '{}': {msg}", self.name))
            }
            other => other,
        })?;

        RoutingRule::new(self.name, self.target, self.weight, matcher)
    }
}

fn build(file: RuleFile) -> Result<Vec<RoutingRule>, RouterError> {
    let rules = file
        .rule
        .into_iter()
        .map(RuleEntry::into_rule)
        .collect::<Result<Vec<_>, _>>()?;
    validate_rules(&rules)?;
    Ok(rules)
}

/// Parse a TOML rule set.
pub fn parse_rules_toml(contents: &str) -> Result<Vec<RoutingRule>, RouterError> {
    let file: RuleFile = toml::from_str(contents)
        .map_err(|e| RouterError::config(format!("invalid TOML rule file: {e}")))?;
    build(file)
}

/// Parse a JSON rule set.
pub fn parse_rules_json(contents: &str) -> Result<Vec<RoutingRule>, RouterError> {
    let file: RuleFile = serde_json::from_str(contents)
        .map_err(|e| RouterError::config(format!("invalid JSON rule file: {e}")))?;
    build(file)
}

/// Load a rule set from a `.toml` or `.json` file.
pub fn load_rules(path: &Path) -> Result<Vec<RoutingRule>, RouterError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let contents = fs::read_to_string(path).map_err(|e| {
        RouterError::config(format!("failed to read rule file {}: {e}", path.display()))
    })?;

    let rules = match extension.as_deref() {
        Some("toml") => parse_rules_toml(&contents),
        Some("json") => parse_rules_json(&contents),
        _ => Err(RouterError::config(format!(
            "unsupported rule file extension for {} (expected .toml or .json)",
            path.display()
        ))),
    }
    .map_err(|e| match e {
        RouterError::Configuration(msg) => {
            RouterError::config(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    log::info!("loaded {} routing rule(s) from {}", rules.len(), path.display());
    Ok(rules)
}
