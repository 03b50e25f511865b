//! Stage contract for the request pipeline

use crate::request::PipelineRequest;
use async_trait::async_trait;
use http::StatusCode;
use palisade_authz::RequestContext;

/// Stable client-facing message for an authentication failure
pub const UNAUTHENTICATED_MESSAGE: &str = "Sorry — log in and try again.";

/// Stable client-facing message for a refused action
pub const FORBIDDEN_MESSAGE: &str = "You are not authorized to perform this action.";

/// Stable client-facing message for any server-side fault
pub const SERVER_FAULT_MESSAGE: &str = "Sorry — something bad happened.";

/// Final response produced by a terminating stage
///
/// Transport-agnostic: a status code and the stable body message for it.
/// Internal identifiers and stack traces never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResponse {
    status: StatusCode,
    message: String,
}

impl StageResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 401 with the generic login message
    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHENTICATED_MESSAGE)
    }

    /// 403 with the generic refusal message
    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)
    }

    /// 500 with the generic fault message
    pub fn server_fault() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, SERVER_FAULT_MESSAGE)
    }

    /// 404 with the entity-specific not-found message
    pub fn not_found(kind: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("The {kind} does not exist."),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What a stage tells the pipeline to do next
#[derive(Debug)]
pub enum StageOutcome {
    /// Proceed to the next stage (or the handler)
    Continue,

    /// Stop here; `StageResponse` is the final result for the request
    Terminate(StageResponse),
}

/// One step of the request pipeline
///
/// Stages run strictly in registration order and are each the sole boundary
/// for their own collaborator's failures: whatever goes wrong inside a stage
/// comes out as a `Terminate`, never as a propagated error.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name used in pipeline traces
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        request: &mut PipelineRequest,
        context: &mut RequestContext,
    ) -> StageOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_responses() {
        let response = StageResponse::unauthenticated();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.message(), "Sorry — log in and try again.");

        let response = StageResponse::not_found("article");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.message(), "The article does not exist.");
    }
}
