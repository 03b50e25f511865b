//! Generic resource resolution stage

use crate::error::PipelineError;
use crate::request::PipelineRequest;
use crate::stage::{Stage, StageOutcome};
use anyhow::Result;
use async_trait::async_trait;
use palisade_authz::RequestContext;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// External entity collaborator: load one record by id
///
/// Implementations perform whatever eager loading the application expects
/// for this kind (a user arrives with its roles, an article with its owner
/// projection).
#[async_trait]
pub trait EntityLoader<T>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
}

/// Resolves one path parameter into a context entry, or ends the request
/// with 404
///
/// A lookup error, a missing record and a malformed id all produce the same
/// client-visible response; the cause is logged.
pub struct ResolveStage<T> {
    kind: &'static str,
    param: &'static str,
    key: &'static str,
    loader: Arc<dyn EntityLoader<T>>,
}

impl<T> ResolveStage<T> {
    /// `kind` is the client-facing entity name used in the not-found
    /// message, `param` the path parameter carrying the id, `key` the
    /// context key the resolved entity is stored under
    pub fn new(
        kind: &'static str,
        param: &'static str,
        key: &'static str,
        loader: Arc<dyn EntityLoader<T>>,
    ) -> Self {
        Self {
            kind,
            param,
            key,
            loader,
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Stage for ResolveStage<T> {
    fn name(&self) -> &'static str {
        self.kind
    }

    async fn apply(
        &self,
        request: &mut PipelineRequest,
        context: &mut RequestContext,
    ) -> StageOutcome {
        let Some(id) = request.param(self.param) else {
            let err = PipelineError::ResourceNotFound {
                kind: self.kind,
                detail: format!("request carries no '{}' parameter", self.param),
            };
            warn!(path = request.path(), %err);
            return StageOutcome::Terminate(err.response());
        };

        match self.loader.find_by_id(id).await {
            Ok(Some(entity)) => {
                debug!(kind = self.kind, id, "entity resolved into context");
                if let Err(cause) = context.insert(self.key, entity) {
                    let err = PipelineError::UnexpectedFault(cause.to_string());
                    error!(kind = self.kind, %err);
                    return StageOutcome::Terminate(err.response());
                }
                StageOutcome::Continue
            }
            Ok(None) => {
                let err = PipelineError::ResourceNotFound {
                    kind: self.kind,
                    detail: format!("no record with id '{id}'"),
                };
                warn!(%err);
                StageOutcome::Terminate(err.response())
            }
            Err(cause) => {
                let err = PipelineError::ResourceNotFound {
                    kind: self.kind,
                    detail: format!("lookup failed for id '{id}': {cause}"),
                };
                warn!(%err);
                StageOutcome::Terminate(err.response())
            }
        }
    }
}
