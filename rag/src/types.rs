use std::fmt;

use serde::{Deserialize, Serialize};

/// Rationale tag used when no rule matched.
pub const NO_MATCH_TAG: &str = "no-match-default-hybrid";

/// Rationale tag used when both pipelines scored the same.
pub const TIE_TAG: &str = "tie-hybrid-fallback";

/// Optional request metadata attached at ingress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Ingress channel (e.g., "email", "chat", "phone")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// A natural-language support question.
///
/// Immutable once built: the builder methods consume and return `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default)]
    metadata: QueryMetadata,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: QueryMetadata::default(),
        }
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.metadata.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.metadata.channel = Some(channel.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.metadata.customer_id.as_deref()
    }

    pub fn channel(&self) -> Option<&str> {
        self.metadata.channel.as_deref()
    }

    /// True when the text has no non-whitespace characters.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A concrete backend pipeline. Rules vote for one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Natural-language-to-SQL agent over the relational store
    Structured,
    /// Retrieval-augmented generation over documents
    Retrieval,
}

impl PipelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Structured => "structured",
            PipelineKind::Retrieval => "retrieval",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a query should be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    Structured,
    Retrieval,
    /// Invoke both pipelines and let the caller merge the answers
    Both,
}

impl RouteTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteTarget::Structured => "structured",
            RouteTarget::Retrieval => "retrieval",
            RouteTarget::Both => "both",
        }
    }
}

impl From<PipelineKind> for RouteTarget {
    fn from(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Structured => RouteTarget::Structured,
            PipelineKind::Retrieval => RouteTarget::Retrieval,
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a decision fell back to [`RouteTarget::Both`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridFallback {
    /// No rule matched the query
    NoMatch,
    /// Both pipelines accumulated the same nonzero score
    Tie,
}

impl HybridFallback {
    pub fn tag(&self) -> &'static str {
        match self {
            HybridFallback::NoMatch => NO_MATCH_TAG,
            HybridFallback::Tie => TIE_TAG,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            HybridFallback::NoMatch => 0.0,
            HybridFallback::Tie => 0.5,
        }
    }
}

/// Accumulated rule weight per pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteScores {
    pub structured: f64,
    pub retrieval: f64,
}

impl RouteScores {
    pub fn add(&mut self, kind: PipelineKind, weight: f64) {
        match kind {
            PipelineKind::Structured => self.structured += weight,
            PipelineKind::Retrieval => self.retrieval += weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.structured + self.retrieval
    }
}

/// The router's output for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub target: RouteTarget,
    /// Share of the total matched weight held by the winner, in [0, 1]
    pub confidence: f64,
    /// Matched rule names, or the single fallback tag for `both`
    pub rationale: Vec<String>,
    /// Set iff `target` is [`RouteTarget::Both`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<HybridFallback>,
    pub scores: RouteScores,
    /// Every matching rule, by descending weight then name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_rules: Vec<String>,
}

impl RouteDecision {
    pub(crate) fn hybrid(
        fallback: HybridFallback,
        scores: RouteScores,
        matched_rules: Vec<String>,
    ) -> Self {
        Self {
            target: RouteTarget::Both,
            confidence: fallback.confidence(),
            rationale: vec![fallback.tag().to_string()],
            fallback: Some(fallback),
            scores,
            matched_rules,
        }
    }

    /// Whether the caller has to invoke both pipelines.
    pub fn is_hybrid(&self) -> bool {
        self.target == RouteTarget::Both
    }

    /// Pipelines the caller should invoke for this decision.
    pub fn pipelines(&self) -> &'static [PipelineKind] {
        match self.target {
            RouteTarget::Structured => &[PipelineKind::Structured],
            RouteTarget::Retrieval => &[PipelineKind::Retrieval],
            RouteTarget::Both => &[PipelineKind::Structured, PipelineKind::Retrieval],
        }
    }
}

/// A pipeline's answer to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub pipeline: PipelineKind,
    /// Natural-language formatted answer
    pub answer: String,
}

impl Response {
    pub fn new(pipeline: PipelineKind, answer: impl Into<String>) -> Self {
        Self {
            pipeline,
            answer: answer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let q = Query::new("where is my order?")
            .with_customer_id("cus_42")
            .with_channel("chat");
        assert_eq!(q.text(), "where is my order?");
        assert_eq!(q.customer_id(), Some("cus_42"));
        assert_eq!(q.channel(), Some("chat"));
    }

    #[test]
    fn test_query_is_blank() {
        assert!(Query::new("").is_blank());
        assert!(Query::new(" \t\n ").is_blank());
        assert!(!Query::new(" hi ").is_blank());
    }

    #[test]
    fn test_route_target_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RouteTarget::Both).unwrap(),
            "\"both\""
        );
        let parsed: PipelineKind = serde_json::from_str("\"structured\"").unwrap();
        assert_eq!(parsed, PipelineKind::Structured);
    }

    #[test]
    fn test_hybrid_decision_shape() {
        let d = RouteDecision::hybrid(HybridFallback::Tie, RouteScores::default(), vec![]);
        assert_eq!(d.target, RouteTarget::Both);
        assert_eq!(d.confidence, 0.5);
        assert_eq!(d.rationale, vec![TIE_TAG]);
        assert!(d.is_hybrid());
        assert_eq!(d.pipelines().len(), 2);
    }

    #[test]
    fn test_decision_json_omits_empty_fields() {
        let d = RouteDecision::hybrid(HybridFallback::NoMatch, RouteScores::default(), vec![]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["target"], "both");
        assert_eq!(json["fallback"], "no_match");
        assert!(json.get("matched_rules").is_none());
    }
}
