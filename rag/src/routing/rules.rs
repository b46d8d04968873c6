//! Routing rules: a named predicate, the pipeline it votes for, and a weight.

use std::collections::HashSet;

use regex::Regex;

use crate::error::RouterError;
use crate::types::{PipelineKind, Query, RouteScores};

/// Predicate evaluated against a query.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Any of the listed words or phrases, case-insensitive, whole words only.
    Keywords { keywords: Vec<String>, regex: Regex },
    /// A case-insensitive regular expression over the query text.
    Pattern { source: String, regex: Regex },
    /// Query metadata `channel` equals one of the listed values.
    Channel { channels: Vec<String> },
}

impl RuleMatcher {
    /// Build a keyword matcher. Phrases match across any run of whitespace.
    pub fn keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, RouterError> {
        let keywords = normalize_list(keywords, "keywords")?;
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        let source = format!(r"(?i)(?:^|[^\w])(?:{})(?:[^\w]|$)", alternatives.join("|"));
        let regex = Regex::new(&source)
            .map_err(|e| RouterError::config(format!("invalid keyword list: {e}")))?;
        Ok(RuleMatcher::Keywords { keywords, regex })
    }

    /// Build a regex matcher. Matching is case-insensitive unless the
    /// pattern overrides it with its own flags.
    pub fn pattern(pattern: &str) -> Result<Self, RouterError> {
        if pattern.trim().is_empty() {
            return Err(RouterError::config("pattern must not be empty"));
        }
        let regex = Regex::new(&format!("(?i){pattern}"))
            .map_err(|e| RouterError::config(format!("invalid pattern '{pattern}': {e}")))?;
        Ok(RuleMatcher::Pattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Build a channel matcher. Comparison is case-insensitive.
    pub fn channels<S: AsRef<str>>(channels: &[S]) -> Result<Self, RouterError> {
        let channels = normalize_list(channels, "channels")?
            .into_iter()
            .map(|c| c.to_lowercase())
            .collect();
        Ok(RuleMatcher::Channel { channels })
    }

    pub fn matches(&self, query: &Query) -> bool {
        match self {
            RuleMatcher::Keywords { regex, .. } | RuleMatcher::Pattern { regex, .. } => {
                regex.is_match(query.text())
            }
            RuleMatcher::Channel { channels } => query
                .channel()
                .map(|c| {
                    let c = c.trim().to_lowercase();
                    channels.iter().any(|allowed| *allowed == c)
                })
                .unwrap_or(false),
        }
    }

    /// Short human-readable form, used by `rules show`.
    pub fn describe(&self) -> String {
        match self {
            RuleMatcher::Keywords { keywords, .. } => format!("keywords: {}", keywords.join(", ")),
            RuleMatcher::Pattern { source, .. } => format!("pattern: {source}"),
            RuleMatcher::Channel { channels } => format!("channel: {}", channels.join(", ")),
        }
    }
}

fn normalize_list<S: AsRef<str>>(items: &[S], field: &str) -> Result<Vec<String>, RouterError> {
    if items.is_empty() {
        return Err(RouterError::config(format!("{field} must not be empty")));
    }
    items
        .iter()
        .map(|s| {
            let trimmed = s.as_ref().trim();
            if trimmed.is_empty() {
                Err(RouterError::config(format!("{field} must not contain blank entries")))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

/// A named, weighted vote for one pipeline.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    name: String,
    target: PipelineKind,
    weight: f64,
    matcher: RuleMatcher,
}

impl RoutingRule {
    pub fn new(
        name: impl Into<String>,
        target: PipelineKind,
        weight: f64,
        matcher: RuleMatcher,
    ) -> Result<Self, RouterError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(RouterError::config("rule name must not be empty"));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(RouterError::config(format!(
                "rule '{name}': weight must be a positive finite number, got {weight}"
            )));
        }
        Ok(Self {
            name,
            target,
            weight,
            matcher,
        })
    }

    /// Shorthand for a keyword rule.
    pub fn keywords<S: AsRef<str>>(
        name: impl Into<String>,
        target: PipelineKind,
        weight: f64,
        keywords: &[S],
    ) -> Result<Self, RouterError> {
        let name = name.into();
        let matcher = RuleMatcher::keywords(keywords)
            .map_err(|e| prefix_rule_error(&name, e))?;
        Self::new(name, target, weight, matcher)
    }

    /// Shorthand for a pattern rule.
    pub fn pattern(
        name: impl Into<String>,
        target: PipelineKind,
        weight: f64,
        pattern: &str,
    ) -> Result<Self, RouterError> {
        let name = name.into();
        let matcher = RuleMatcher::pattern(pattern).map_err(|e| prefix_rule_error(&name, e))?;
        Self::new(name, target, weight, matcher)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> PipelineKind {
        self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    pub fn matches(&self, query: &Query) -> bool {
        self.matcher.matches(query)
    }
}

fn prefix_rule_error(name: &str, err: RouterError) -> RouterError {
    match err {
        RouterError::Configuration(msg) => RouterError::config(format!("rule '{name}': {msg}")),
        other => other,
    }
}

/// Check rule-set level invariants: non-empty, unique names, and a finite
/// combined weight so accumulated scores and their total never overflow.
pub fn validate_rules(rules: &[RoutingRule]) -> Result<(), RouterError> {
    if rules.is_empty() {
        return Err(RouterError::config("rule set must contain at least one rule"));
    }
    let mut seen = HashSet::new();
    let mut totals = RouteScores::default();
    for rule in rules {
        if !seen.insert(rule.name()) {
            return Err(RouterError::config(format!(
                "duplicate rule name '{}'",
                rule.name()
            )));
        }
        totals.add(rule.target(), rule.weight());
    }
    if !totals.total().is_finite() {
        return Err(RouterError::config(format!(
            "combined rule weight overflows (structured {}, retrieval {})",
            totals.structured, totals.retrieval
        )));
    }
    Ok(())
}
