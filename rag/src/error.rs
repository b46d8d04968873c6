use thiserror::Error;

use crate::types::PipelineKind;

/// Errors produced by the router itself.
///
/// Both variants describe a precondition violation the caller has to fix
/// (the query or the rule set); neither is retried by the router.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RouterError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        RouterError::Configuration(msg.into())
    }
}

/// Broad category of a collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    /// The question could not be mapped onto the relational schema.
    SchemaMapping,
    /// The generated query failed to execute.
    Execution,
    /// Document retrieval failed.
    Retrieval,
    /// Answer generation failed.
    Generation,
    Other,
}

/// Error raised by a pipeline collaborator.
///
/// The router and dispatcher never rewrite these; they reach the caller
/// exactly as the pipeline produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{pipeline} pipeline error ({kind:?}): {message}")]
pub struct PipelineError {
    pub pipeline: PipelineKind,
    pub kind: PipelineErrorKind,
    pub message: String,
}

impl PipelineError {
    pub fn new(pipeline: PipelineKind, kind: PipelineErrorKind, message: impl Into<String>) -> Self {
        Self {
            pipeline,
            kind,
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`crate::dispatch::Dispatcher`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Routing(#[from] RouterError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
