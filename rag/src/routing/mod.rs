//! Query routing between the structured-query and retrieval pipelines.
//!
//! Every rule that matches a query adds its weight to the pipeline it votes
//! for. The higher total wins; confidence is the winner's share of the total.
//! No match and exact ties both route to the two pipelines at once. The
//! routing is deterministic and does not require ML models.

mod rules;
mod signals;

use std::cmp::Ordering;
use std::sync::Arc;

pub use rules::{RoutingRule, RuleMatcher, validate_rules};
pub use signals::default_rules;

use crate::error::RouterError;
use crate::types::{HybridFallback, PipelineKind, Query, RouteDecision, RouteScores};

/// Relative tolerance under which two accumulated scores count as a tie.
const TIE_TOLERANCE: f64 = 1e-9;

/// Route a query against an ordered rule set.
///
/// Fails with [`RouterError::InvalidInput`] for blank query text (checked
/// first) and [`RouterError::Configuration`] for an empty or malformed rule set.
pub fn route(query: &Query, rules: &[RoutingRule]) -> Result<RouteDecision, RouterError> {
    if query.is_blank() {
        return Err(RouterError::InvalidInput(
            "query text must not be empty".to_string(),
        ));
    }
    validate_rules(rules)?;
    Ok(decide(query, rules))
}

/// A router over an immutable rule set injected at construction.
///
/// Cloning is cheap; clones share the same rules.
#[derive(Debug, Clone)]
pub struct Router {
    rules: Arc<[RoutingRule]>,
}

impl Router {
    pub fn new(rules: Vec<RoutingRule>) -> Result<Self, RouterError> {
        validate_rules(&rules)?;
        Ok(Self {
            rules: rules.into(),
        })
    }

    /// Router over the built-in recommendation-matrix rules.
    pub fn with_default_rules() -> Self {
        Self {
            rules: default_rules().into(),
        }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn route(&self, query: &Query) -> Result<RouteDecision, RouterError> {
        if query.is_blank() {
            return Err(RouterError::InvalidInput(
                "query text must not be empty".to_string(),
            ));
        }
        Ok(decide(query, &self.rules))
    }
}

/// Score a validated rule set against a non-blank query.
fn decide(query: &Query, rules: &[RoutingRule]) -> RouteDecision {
    let mut scores = RouteScores::default();
    let mut matched: Vec<&RoutingRule> = Vec::new();

    for rule in rules {
        if rule.matches(query) {
            scores.add(rule.target(), rule.weight());
            matched.push(rule);
        }
    }

    matched.sort_by(|a, b| {
        b.weight()
            .partial_cmp(&a.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name().cmp(b.name()))
    });
    let matched_rules: Vec<String> = matched.iter().map(|r| r.name().to_string()).collect();

    let decision = if matched.is_empty() {
        RouteDecision::hybrid(HybridFallback::NoMatch, scores, matched_rules)
    } else if is_tie(scores.structured, scores.retrieval) {
        RouteDecision::hybrid(HybridFallback::Tie, scores, matched_rules)
    } else {
        let winner = if scores.structured > scores.retrieval {
            PipelineKind::Structured
        } else {
            PipelineKind::Retrieval
        };
        let winning = match winner {
            PipelineKind::Structured => scores.structured,
            PipelineKind::Retrieval => scores.retrieval,
        };
        RouteDecision {
            target: winner.into(),
            confidence: (winning / scores.total()).clamp(0.0, 1.0),
            rationale: matched_rules.clone(),
            fallback: None,
            scores,
            matched_rules,
        }
    };

    log::debug!(
        "routed query ({} chars) to {} (confidence {:.3}, structured {:.3}, retrieval {:.3}, matched [{}])",
        query.text().len(),
        decision.target,
        decision.confidence,
        scores.structured,
        scores.retrieval,
        decision.matched_rules.join(", ")
    );

    decision
}

fn is_tie(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= TIE_TOLERANCE * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NO_MATCH_TAG, RouteTarget, TIE_TAG};

    fn example_rules() -> Vec<RoutingRule> {
        vec![
            RoutingRule::keywords(
                "aggregation",
                PipelineKind::Structured,
                1.0,
                &["average", "sum", "total", "count", "by month"],
            )
            .unwrap(),
            RoutingRule::keywords("similar-to", PipelineKind::Retrieval, 1.0, &["similar"])
                .unwrap(),
        ]
    }

    #[test]
    fn test_aggregation_routes_structured() {
        let d = route(&Query::new("Average order value by month"), &example_rules()).unwrap();
        assert_eq!(d.target, RouteTarget::Structured);
        assert_eq!(d.confidence, 1.0);
        assert_eq!(d.rationale, vec!["aggregation"]);
        assert!(d.fallback.is_none());
    }

    #[test]
    fn test_similarity_routes_retrieval() {
        let d = route(
            &Query::new("Find products similar to this review"),
            &example_rules(),
        )
        .unwrap();
        assert_eq!(d.target, RouteTarget::Retrieval);
        assert_eq!(d.confidence, 1.0);
        assert_eq!(d.rationale, vec!["similar-to"]);
    }

    #[test]
    fn test_no_match_routes_both() {
        let d = route(&Query::new("hello"), &example_rules()).unwrap();
        assert_eq!(d.target, RouteTarget::Both);
        assert_eq!(d.confidence, 0.0);
        assert_eq!(d.rationale, vec![NO_MATCH_TAG]);
        assert_eq!(d.fallback, Some(HybridFallback::NoMatch));
        assert!(d.matched_rules.is_empty());
    }

    #[test]
    fn test_tie_routes_both() {
        let d = route(
            &Query::new("total spend on products similar to mine"),
            &example_rules(),
        )
        .unwrap();
        assert_eq!(d.target, RouteTarget::Both);
        assert_eq!(d.confidence, 0.5);
        assert_eq!(d.rationale, vec![TIE_TAG]);
        assert_eq!(d.fallback, Some(HybridFallback::Tie));
        assert_eq!(d.matched_rules, vec!["aggregation", "similar-to"]);
    }

    #[test]
    fn test_tie_tolerates_float_accumulation_order() {
        let rules = vec![
            RoutingRule::keywords("a", PipelineKind::Structured, 0.1, &["alpha"]).unwrap(),
            RoutingRule::keywords("b", PipelineKind::Structured, 0.2, &["beta"]).unwrap(),
            RoutingRule::keywords("c", PipelineKind::Retrieval, 0.3, &["gamma"]).unwrap(),
        ];
        let d = route(&Query::new("alpha beta gamma"), &rules).unwrap();
        assert_eq!(d.target, RouteTarget::Both);
        assert_eq!(d.fallback, Some(HybridFallback::Tie));
    }

    #[test]
    fn test_overflowing_weights_are_configuration_error() {
        let rules = vec![
            RoutingRule::keywords("a", PipelineKind::Structured, 1e308, &["alpha"]).unwrap(),
            RoutingRule::keywords("b", PipelineKind::Structured, 1e308, &["beta"]).unwrap(),
            RoutingRule::keywords("c", PipelineKind::Retrieval, 1.0, &["gamma"]).unwrap(),
        ];
        for text in ["alpha beta", "alpha beta gamma"] {
            assert!(matches!(
                route(&Query::new(text), &rules),
                Err(RouterError::Configuration(_))
            ));
        }
        assert!(Router::new(rules).is_err());
    }

    #[test]
    fn test_large_finite_weights_still_pick_a_winner() {
        let rules = vec![
            RoutingRule::keywords("a", PipelineKind::Structured, 1e307, &["alpha"]).unwrap(),
            RoutingRule::keywords("b", PipelineKind::Structured, 1e307, &["beta"]).unwrap(),
            RoutingRule::keywords("c", PipelineKind::Retrieval, 1.0, &["gamma"]).unwrap(),
        ];
        let d = route(&Query::new("alpha beta gamma"), &rules).unwrap();
        assert_eq!(d.target, RouteTarget::Structured);
        assert!(d.fallback.is_none());
        assert!(d.scores.structured.is_finite());
        assert!((d.confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_tie_never_equates_infinite_and_finite() {
        assert!(!is_tie(f64::INFINITY, 0.0));
        assert!(!is_tie(0.0, f64::INFINITY));
        assert!(is_tie(0.0, 0.0));
    }

    #[test]
    fn test_confidence_is_winning_share() {
        let rules = vec![
            RoutingRule::keywords("agg", PipelineKind::Structured, 3.0, &["average"]).unwrap(),
            RoutingRule::keywords("sim", PipelineKind::Retrieval, 1.0, &["similar"]).unwrap(),
        ];
        let d = route(&Query::new("average rating of similar items"), &rules).unwrap();
        assert_eq!(d.target, RouteTarget::Structured);
        assert!((d.confidence - 0.75).abs() < 1e-12);
        assert_eq!(d.rationale, vec!["agg", "sim"]);
        assert_eq!(d.scores.structured, 3.0);
        assert_eq!(d.scores.retrieval, 1.0);
    }

    #[test]
    fn test_rationale_ordered_by_weight_then_name() {
        let rules = vec![
            RoutingRule::keywords("zeta", PipelineKind::Retrieval, 1.0, &["refund"]).unwrap(),
            RoutingRule::keywords("beta", PipelineKind::Retrieval, 2.0, &["refund"]).unwrap(),
            RoutingRule::keywords("alpha", PipelineKind::Retrieval, 1.0, &["refund"]).unwrap(),
        ];
        let d = route(&Query::new("refund policy"), &rules).unwrap();
        assert_eq!(d.rationale, vec!["beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_empty_query_is_invalid_input_regardless_of_rules() {
        for text in ["", "   ", "\n\t"] {
            let q = Query::new(text);
            assert!(matches!(
                route(&q, &example_rules()),
                Err(RouterError::InvalidInput(_))
            ));
            assert!(matches!(route(&q, &[]), Err(RouterError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_empty_rules_is_configuration_error() {
        assert!(matches!(
            route(&Query::new("hello"), &[]),
            Err(RouterError::Configuration(_))
        ));
        assert!(matches!(
            Router::new(Vec::new()),
            Err(RouterError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_names_are_configuration_error() {
        let mut rules = example_rules();
        rules.push(
            RoutingRule::keywords("aggregation", PipelineKind::Retrieval, 1.0, &["x"]).unwrap(),
        );
        assert!(matches!(
            route(&Query::new("hello"), &rules),
            Err(RouterError::Configuration(_))
        ));
    }

    #[test]
    fn test_channel_rule_votes() {
        let mut rules = example_rules();
        rules.push(
            RoutingRule::new(
                "email-channel",
                PipelineKind::Retrieval,
                0.5,
                RuleMatcher::channels(&["email"]).unwrap(),
            )
            .unwrap(),
        );
        let q = Query::new("hello there").with_channel("email");
        let d = route(&q, &rules).unwrap();
        assert_eq!(d.target, RouteTarget::Retrieval);
        assert_eq!(d.rationale, vec!["email-channel"]);
    }

    #[test]
    fn test_router_matches_free_function() {
        let router = Router::new(example_rules()).unwrap();
        for text in [
            "Average order value by month",
            "Find products similar to this review",
            "hello",
            "total of similar orders",
        ] {
            let q = Query::new(text);
            assert_eq!(router.route(&q).unwrap(), route(&q, &example_rules()).unwrap());
        }
    }

    #[test]
    fn test_routing_is_deterministic() {
        let router = Router::with_default_rules();
        let q = Query::new("why is my invoice total different from last month?");
        let first = router.route(&q).unwrap();
        for _ in 0..10 {
            assert_eq!(router.route(&q).unwrap(), first);
        }
    }

    #[test]
    fn test_decision_invariants_hold_for_varied_queries() {
        let router = Router::with_default_rules();
        for text in [
            "hi",
            "how many tickets were opened per week?",
            "my router is not working",
            "compare refunds by month with the return policy",
            "order #A1234 status",
            "customers frustrated with delivery",
            "?",
        ] {
            let d = router.route(&Query::new(text)).unwrap();
            assert!((0.0..=1.0).contains(&d.confidence), "{text}");
            assert!(!d.rationale.is_empty(), "{text}");
            assert_eq!(d.fallback.is_some(), d.is_hybrid(), "{text}");
        }
    }

    #[test]
    fn test_router_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }
}
