//! supportroute-rag: query routing for customer-support answering
//!
//! Decides, per question, whether a retrieval-augmented pipeline, a
//! natural-language-to-SQL pipeline, or both should answer it:
//! - Weighted, named routing rules (keywords, regex patterns, channel)
//! - A built-in rule set for common support questions
//! - TOML/JSON rule files loaded once at startup
//! - A dispatcher that invokes the chosen pipeline(s)
//!
//! # Example
//!
//! ```
//! use supportroute_rag::{Query, RouteTarget, Router};
//!
//! let router = Router::with_default_rules();
//! let decision = router.route(&Query::new("Average order value by month")).unwrap();
//! assert_eq!(decision.target, RouteTarget::Structured);
//! ```

pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod routing;
pub mod rules_file;
pub mod types;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{DispatchError, PipelineError, PipelineErrorKind, RouterError};
pub use pipeline::{RetrievalPipeline, StructuredQueryPipeline};
pub use routing::{Router, RoutingRule, RuleMatcher, default_rules, route};
pub use rules_file::{load_rules, parse_rules_json, parse_rules_toml};
pub use types::{
    HybridFallback, PipelineKind, Query, QueryMetadata, Response, RouteDecision, RouteScores,
    RouteTarget,
};
