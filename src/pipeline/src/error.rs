//! Pipeline error taxonomy
//!
//! Each stage converts its collaborator failures into exactly one of these
//! variants at its own boundary. The variant fixes the client-visible status
//! and stable message; the detail it carries is for operator logs only and
//! is never returned. Several variants collapse to the same wire response;
//! the taxonomy stays distinct so the logs do not.

use crate::stage::StageResponse;
use http::StatusCode;
use palisade_authz::{ActionName, EntityName};
use thiserror::Error;

/// Classified failure for one request
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad or missing token, or no caller record; the halves are never
    /// distinguished to the client
    #[error("authentication failure: {0}")]
    AuthenticationFailure(String),

    /// A registered predicate refused the action
    #[error("authorization denied: '{action}' on '{entity}'")]
    AuthorizationDenied {
        entity: EntityName,
        action: ActionName,
    },

    /// Entity or action missing from the policy registry
    #[error("policy configuration fault: {0}")]
    PolicyConfigurationFault(String),

    /// Entity lookup miss; a malformed id is indistinguishable on purpose
    #[error("{kind} not found: {detail}")]
    ResourceNotFound { kind: &'static str, detail: String },

    /// Any other collaborator or predicate fault
    #[error("unexpected fault: {0}")]
    UnexpectedFault(String),
}

impl PipelineError {
    /// Status code for the client-visible response
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::AuthenticationFailure(_) => StatusCode::UNAUTHORIZED,
            PipelineError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            PipelineError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            PipelineError::PolicyConfigurationFault(_) | PipelineError::UnexpectedFault(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-visible response for this failure
    pub fn response(&self) -> StageResponse {
        match self {
            PipelineError::AuthenticationFailure(_) => StageResponse::unauthenticated(),
            PipelineError::AuthorizationDenied { .. } => StageResponse::forbidden(),
            PipelineError::ResourceNotFound { kind, .. } => StageResponse::not_found(kind),
            PipelineError::PolicyConfigurationFault(_) | PipelineError::UnexpectedFault(_) => {
                StageResponse::server_fault()
            }
        }
    }
}
