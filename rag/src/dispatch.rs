//! Query dispatcher.
//!
//! Combines routing with pipeline invocation:
//! 1. Routes the query with the injected [`Router`]
//! 2. Invokes the structured or retrieval pipeline for a single target
//! 3. Invokes both concurrently for a hybrid decision and returns both results
//!
//! Pipeline errors are passed through untouched. Merging two answers is left
//! to the caller.

use std::sync::Arc;

use crate::error::{DispatchError, PipelineError};
use crate::pipeline::{RetrievalPipeline, StructuredQueryPipeline};
use crate::routing::Router;
use crate::types::{Query, Response, RouteDecision, RouteTarget};

/// Result of dispatching a query.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A single pipeline answered.
    Single {
        decision: RouteDecision,
        response: Response,
    },
    /// Both pipelines were invoked; each result is reported as-is.
    Both {
        decision: RouteDecision,
        structured: Result<Response, PipelineError>,
        retrieval: Result<Response, PipelineError>,
    },
}

impl DispatchOutcome {
    pub fn decision(&self) -> &RouteDecision {
        match self {
            DispatchOutcome::Single { decision, .. } | DispatchOutcome::Both { decision, .. } => {
                decision
            }
        }
    }
}

/// Routes queries and invokes the chosen pipeline(s).
#[derive(Clone)]
pub struct Dispatcher {
    router: Router,
    structured: Arc<dyn StructuredQueryPipeline>,
    retrieval: Arc<dyn RetrievalPipeline>,
}

impl Dispatcher {
    pub fn new(
        router: Router,
        structured: Arc<dyn StructuredQueryPipeline>,
        retrieval: Arc<dyn RetrievalPipeline>,
    ) -> Self {
        Self {
            router,
            structured,
            retrieval,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub async fn dispatch(&self, query: &Query) -> Result<DispatchOutcome, DispatchError> {
        let decision = self.router.route(query)?;

        match decision.target {
            RouteTarget::Structured => {
                let response = self.structured.execute(query).await?;
                Ok(DispatchOutcome::Single { decision, response })
            }
            RouteTarget::Retrieval => {
                let response = self.retrieval.execute(query).await?;
                Ok(DispatchOutcome::Single { decision, response })
            }
            RouteTarget::Both => {
                let (structured, retrieval) = tokio::join!(
                    self.structured.execute(query),
                    self.retrieval.execute(query)
                );
                if let Err(e) = &structured {
                    log::warn!("structured pipeline failed during hybrid dispatch: {e}");
                }
                if let Err(e) = &retrieval {
                    log::warn!("retrieval pipeline failed during hybrid dispatch: {e}");
                }
                Ok(DispatchOutcome::Both {
                    decision,
                    structured,
                    retrieval,
                })
            }
        }
    }
}
