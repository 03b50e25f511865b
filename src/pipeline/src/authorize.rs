//! Authorization stage factory

use crate::error::PipelineError;
use crate::request::PipelineRequest;
use crate::stage::{Stage, StageOutcome};
use async_trait::async_trait;
use palisade_authz::{authorize, ActionName, Decision, EntityName, PolicyRegistry, RequestContext};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Builds authorization stages closed over one policy registry
pub struct Gate {
    registry: Arc<PolicyRegistry>,
}

impl Gate {
    pub fn new(registry: Arc<PolicyRegistry>) -> Self {
        Self { registry }
    }

    /// Stage enforcing `action` on `entity` for the authenticated caller
    pub fn can(
        &self,
        action: impl Into<ActionName>,
        entity: impl Into<EntityName>,
    ) -> AuthorizeStage {
        AuthorizeStage {
            action: action.into(),
            entity: entity.into(),
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Asks the decision engine whether the caller may perform a fixed action
/// on a fixed entity
///
/// Outcome mapping: `Allowed` continues; `Denied` terminates with 403; a
/// registry gap or any fault while obtaining permissions or evaluating the
/// predicate terminates with 500. The 500 causes are logged with their
/// detail and never exposed.
pub struct AuthorizeStage {
    action: ActionName,
    entity: EntityName,
    registry: Arc<PolicyRegistry>,
}

#[async_trait]
impl Stage for AuthorizeStage {
    fn name(&self) -> &'static str {
        "authorize"
    }

    async fn apply(
        &self,
        request: &mut PipelineRequest,
        context: &mut RequestContext,
    ) -> StageOutcome {
        // Registry gaps are decided before the permission lookup runs.
        let gap = match self.registry.record(&self.entity) {
            None => Some(format!("no policy registered for entity '{}'", self.entity)),
            Some(record) if record.predicate(&self.action).is_none() => Some(format!(
                "entity '{}' has no rule for action '{}'",
                self.entity, self.action
            )),
            Some(_) => None,
        };
        if let Some(detail) = gap {
            let err = PipelineError::PolicyConfigurationFault(detail);
            error!(path = request.path(), %err);
            return StageOutcome::Terminate(err.response());
        }

        // A route wired to authorize without authenticating first is a
        // wiring bug, not a client failure.
        let Some(identity) = request.identity() else {
            let err = PipelineError::UnexpectedFault(
                "no caller identity attached before authorization".to_string(),
            );
            error!(path = request.path(), %err);
            return StageOutcome::Terminate(err.response());
        };

        let permissions = match identity.permissions().await {
            Ok(permissions) => permissions,
            Err(cause) => {
                let err =
                    PipelineError::UnexpectedFault(format!("permission lookup failed: {cause}"));
                error!(username = identity.username(), %err);
                return StageOutcome::Terminate(err.response());
            }
        };

        match authorize(
            &self.action,
            &self.entity,
            &permissions,
            &self.registry,
            Some(&*context),
        )
        .await
        {
            Ok(Decision::Allowed) => {
                debug!(
                    username = identity.username(),
                    entity = %self.entity,
                    action = %self.action,
                    "authorized"
                );
                StageOutcome::Continue
            }
            Ok(Decision::Denied) => {
                let err = PipelineError::AuthorizationDenied {
                    entity: self.entity.clone(),
                    action: self.action.clone(),
                };
                warn!(username = identity.username(), %err);
                StageOutcome::Terminate(err.response())
            }
            Ok(Decision::PolicyNotFound { entity }) => {
                let err = PipelineError::PolicyConfigurationFault(format!(
                    "no policy registered for entity '{entity}'"
                ));
                error!(%err);
                StageOutcome::Terminate(err.response())
            }
            Ok(Decision::ActionNotFound { entity, action }) => {
                let err = PipelineError::PolicyConfigurationFault(format!(
                    "entity '{entity}' has no rule for action '{action}'"
                ));
                error!(%err);
                StageOutcome::Terminate(err.response())
            }
            Err(cause) => {
                let err = PipelineError::UnexpectedFault(format!("predicate fault: {cause}"));
                error!(username = identity.username(), %err);
                StageOutcome::Terminate(err.response())
            }
        }
    }
}
