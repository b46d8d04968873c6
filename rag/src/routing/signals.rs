//! Built-in routing signals.
//!
//! Encodes the support-desk recommendation matrix as eight rules: four query
//! shapes that a structured-query agent answers well and four that retrieval
//! over documents answers well. Pattern rules are more specific than keyword
//! rules and weigh more.

use std::sync::LazyLock;

use super::rules::RoutingRule;
use crate::types::PipelineKind;

const KEYWORD_WEIGHT: f64 = 1.0;
const PATTERN_WEIGHT: f64 = 1.5;

static DEFAULT_RULES: LazyLock<Vec<RoutingRule>> = LazyLock::new(|| {
    vec![
        // --- Structured: numbers, dates, exact records ---
        RoutingRule::keywords(
            "aggregation",
            PipelineKind::Structured,
            KEYWORD_WEIGHT,
            &[
                "average", "avg", "sum", "total", "count", "how many", "how much", "mean",
                "median", "number of",
            ],
        )
        .unwrap(),
        RoutingRule::pattern(
            "time-trend",
            PipelineKind::Structured,
            PATTERN_WEIGHT,
            r"\b((by|per|each)\s+(day|week|month|quarter|year)|over\s+time|trends?|year\s+over\s+year|month\s+over\s+month|(last|previous|this)\s+(week|month|quarter|year))\b",
        )
        .unwrap(),
        RoutingRule::pattern(
            "exact-lookup",
            PipelineKind::Structured,
            PATTERN_WEIGHT,
            r"\b(order|invoice|ticket|account|shipment)\s*(#|no\.?|id|number)\s*[:#]?\s*[a-z]*\d[\w-]*",
        )
        .unwrap(),
        RoutingRule::pattern(
            "comparison-ranking",
            PipelineKind::Structured,
            PATTERN_WEIGHT,
            r"\b(top\s+\d+|highest|lowest|compare[ds]?|comparison|rank(ed|ing)?|(most|least)\s+(ordered|sold|returned|purchased|popular))\b",
        )
        .unwrap(),
        // --- Retrieval: meaning, guidance, free text ---
        RoutingRule::keywords(
            "similarity",
            PipelineKind::Retrieval,
            KEYWORD_WEIGHT,
            &[
                "similar", "like this", "resembles", "resembling", "related to", "alternatives to",
            ],
        )
        .unwrap(),
        RoutingRule::pattern(
            "policy-howto",
            PipelineKind::Retrieval,
            PATTERN_WEIGHT,
            r"\b(how\s+(do|can|should)\s+i|how\s+to|polic(y|ies)|warranty|instructions?|guide|steps\s+to|am\s+i\s+allowed)\b",
        )
        .unwrap(),
        RoutingRule::keywords(
            "troubleshooting",
            PipelineKind::Retrieval,
            KEYWORD_WEIGHT,
            &[
                "error", "not working", "troubleshoot", "broken", "fails", "failing", "crash",
                "won't", "doesn't work", "problem with",
            ],
        )
        .unwrap(),
        RoutingRule::keywords(
            "sentiment-feedback",
            PipelineKind::Retrieval,
            KEYWORD_WEIGHT,
            &[
                "complaint", "complaints", "complain", "feedback", "review", "reviews",
                "sentiment", "frustrated", "unhappy", "angry",
            ],
        )
        .unwrap(),
    ]
});

/// The built-in rule set, in evaluation order.
pub fn default_rules() -> Vec<RoutingRule> {
    DEFAULT_RULES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{route, validate_rules};
    use crate::types::{Query, RouteTarget};

    fn target_of(text: &str) -> RouteTarget {
        route(&Query::new(text), &default_rules()).unwrap().target
    }

    fn rationale_of(text: &str) -> Vec<String> {
        route(&Query::new(text), &default_rules()).unwrap().rationale
    }

    #[test]
    fn test_default_rules_are_valid() {
        let rules = default_rules();
        assert_eq!(rules.len(), 8);
        validate_rules(&rules).unwrap();
    }

    #[test]
    fn test_default_rules_cover_both_pipelines() {
        let rules = default_rules();
        let structured = rules
            .iter()
            .filter(|r| r.target() == PipelineKind::Structured)
            .count();
        assert_eq!(structured, 4);
        assert_eq!(rules.len() - structured, 4);
    }

    // --- Structured ---

    #[test]
    fn test_aggregation() {
        assert_eq!(target_of("What is the average order value?"), RouteTarget::Structured);
        assert_eq!(rationale_of("How many refunds did we issue?"), vec!["aggregation"]);
    }

    #[test]
    fn test_time_trend() {
        assert_eq!(rationale_of("Ticket volume per week"), vec!["time-trend"]);
        assert_eq!(target_of("signups over time"), RouteTarget::Structured);
    }

    #[test]
    fn test_exact_lookup() {
        assert_eq!(rationale_of("Where is order #A1234?"), vec!["exact-lookup"]);
        assert_eq!(target_of("invoice number 99812"), RouteTarget::Structured);
    }

    #[test]
    fn test_comparison_ranking() {
        assert_eq!(rationale_of("top 5 customers"), vec!["comparison-ranking"]);
        assert_eq!(target_of("which product is most returned"), RouteTarget::Structured);
    }

    #[test]
    fn test_aggregation_and_trend_stack() {
        let d = route(&Query::new("Average order value by month"), &default_rules()).unwrap();
        assert_eq!(d.target, RouteTarget::Structured);
        assert_eq!(d.confidence, 1.0);
        assert_eq!(d.rationale, vec!["time-trend", "aggregation"]);
    }

    // --- Retrieval ---

    #[test]
    fn test_similarity() {
        assert_eq!(rationale_of("products similar to the X200"), vec!["similarity"]);
    }

    #[test]
    fn test_policy_howto() {
        assert_eq!(rationale_of("What is your return policy?"), vec!["policy-howto"]);
        assert_eq!(target_of("How do I reset my password?"), RouteTarget::Retrieval);
    }

    #[test]
    fn test_troubleshooting() {
        assert_eq!(rationale_of("my headset is not working"), vec!["troubleshooting"]);
    }

    #[test]
    fn test_sentiment_feedback() {
        assert_eq!(
            rationale_of("customers seem frustrated lately"),
            vec!["sentiment-feedback"]
        );
    }

    #[test]
    fn test_similarity_and_feedback_stack() {
        let d = route(
            &Query::new("Find products similar to this review"),
            &default_rules(),
        )
        .unwrap();
        assert_eq!(d.target, RouteTarget::Retrieval);
        assert_eq!(d.confidence, 1.0);
        assert_eq!(d.rationale, vec!["sentiment-feedback", "similarity"]);
    }

    // --- Mixed / fallback ---

    #[test]
    fn test_mixed_query_prefers_heavier_side() {
        // policy-howto (1.5) vs aggregation (1.0)
        let d = route(
            &Query::new("how do I see the total I was charged?"),
            &default_rules(),
        )
        .unwrap();
        assert_eq!(d.target, RouteTarget::Retrieval);
        assert!((d.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_small_talk_falls_back_to_both() {
        assert_eq!(target_of("hello"), RouteTarget::Both);
        assert_eq!(target_of("thanks a lot!"), RouteTarget::Both);
    }
}
