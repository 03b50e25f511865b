//! Ordered execution of pipeline stages

use crate::request::PipelineRequest;
use crate::stage::{Stage, StageOutcome, StageResponse};
use palisade_authz::RequestContext;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of running a pipeline for one request
#[derive(Debug)]
pub enum PipelineResult {
    /// Every stage continued; the handler runs against the accumulated
    /// context
    Completed(RequestContext),

    /// A stage terminated the request; this response is final
    Terminated(StageResponse),
}

impl PipelineResult {
    pub fn is_terminated(&self) -> bool {
        matches!(self, PipelineResult::Terminated(_))
    }
}

/// An ordered list of stages sharing one context lifecycle
///
/// The pipeline owns the per-request context: it is created empty before
/// the first stage, threaded through each stage in registration order, and
/// handed to the caller only if every stage continued. Once a stage
/// terminates, no later stage runs and no further lookup is started for the
/// request.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run every stage against a fresh context
    pub async fn run(&self, request: &mut PipelineRequest) -> PipelineResult {
        let mut context = RequestContext::new();

        for stage in &self.stages {
            match stage.apply(request, &mut context).await {
                StageOutcome::Continue => {
                    trace!(stage = stage.name(), path = request.path(), "stage continued");
                }
                StageOutcome::Terminate(response) => {
                    debug!(
                        stage = stage.name(),
                        path = request.path(),
                        status = %response.status(),
                        "pipeline terminated"
                    );
                    return PipelineResult::Terminated(response);
                }
            }
        }

        PipelineResult::Completed(context)
    }
}

/// Builds a [`Pipeline`] stage by stage, in execution order
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Append a stage; stages run in the order they were added
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}
