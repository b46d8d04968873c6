//! Capability interfaces for the two answering backends.
//!
//! Implementations live outside this crate: one translates questions into
//! SQL against the order/customer store, the other retrieves support
//! documents and generates an answer from them.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::types::{Query, Response};

/// Natural-language-to-SQL agent.
#[async_trait]
pub trait StructuredQueryPipeline: Send + Sync {
    /// Answer the query from the relational store.
    async fn execute(&self, query: &Query) -> Result<Response, PipelineError>;
}

/// Retrieval-augmented generation over support documents.
#[async_trait]
pub trait RetrievalPipeline: Send + Sync {
    /// Answer the query from retrieved documents.
    async fn execute(&self, query: &Query) -> Result<Response, PipelineError>;
}
