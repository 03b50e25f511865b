//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// A refused action is not an error: `Denied` and the two not-found outcomes
/// are ordinary [`crate::Decision`] values. Only a fault inside a predicate
/// surfaces here.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A predicate failed for a reason other than refusing access
    #[error("predicate evaluation failed: {0}")]
    Evaluation(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
