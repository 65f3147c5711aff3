use thiserror::Error;

use crate::field_catalog::GraphError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryGeneratorError {
    #[error("description is required (must contain at least one non-whitespace character)")]
    EmptyDescription,
    #[error("no matching fields found for description")]
    NoMatches,
    #[error("failed to find join path: {0}")]
    JoinPath(#[from] GraphError),
}

impl QueryGeneratorError {
    /// Short machine-readable name used in error responses
    pub fn kind(&self) -> &'static str {
        match self {
            QueryGeneratorError::EmptyDescription => "ValidationError",
            QueryGeneratorError::NoMatches => "NoMatches",
            QueryGeneratorError::JoinPath(GraphError::TableNotFound { .. }) => "NotFound",
            QueryGeneratorError::JoinPath(GraphError::NoPathFound { .. }) => "NoPathFound",
        }
    }
}
