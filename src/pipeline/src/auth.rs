//! Authentication stage

use crate::error::PipelineError;
use crate::request::{CallerIdentity, PipelineRequest};
use crate::stage::{Stage, StageOutcome};
use anyhow::Result;
use async_trait::async_trait;
use palisade_authz::RequestContext;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Claims recovered from a request token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub username: String,
}

/// External identity collaborator
///
/// Token encoding is a black box to the pipeline: the implementation may
/// verify a signed token or consult a token table, and either operation may
/// suspend.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Decode the auth token carried by the request; fails for a missing or
    /// malformed token
    async fn decode_token(&self, request: &PipelineRequest) -> Result<TokenClaims>;

    /// Look up the caller record for a decoded username
    async fn find_by_username(&self, username: &str) -> Result<Option<CallerIdentity>>;
}

/// Gates every non-public route behind a resolved caller identity
///
/// Public paths bypass authentication by exact match, never by pattern, so
/// the allow-list stays minimal and explicit. Every failure past the bypass
/// (bad token, lookup fault, unknown user) collapses to the same 401; which
/// half failed is logged, never revealed to the client.
pub struct AuthenticationStage {
    identity: Arc<dyn IdentitySource>,
    public_paths: HashSet<String>,
}

impl AuthenticationStage {
    pub fn new(
        identity: Arc<dyn IdentitySource>,
        public_paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            identity,
            public_paths: public_paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Stage for AuthenticationStage {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn apply(
        &self,
        request: &mut PipelineRequest,
        _context: &mut RequestContext,
    ) -> StageOutcome {
        if self.public_paths.contains(request.path()) {
            debug!(path = request.path(), "public path, authentication bypassed");
            return StageOutcome::Continue;
        }

        let claims = match self.identity.decode_token(request).await {
            Ok(claims) => claims,
            Err(cause) => {
                let err = PipelineError::AuthenticationFailure(format!(
                    "token decode failed: {cause}"
                ));
                warn!(path = request.path(), %err);
                return StageOutcome::Terminate(err.response());
            }
        };

        match self.identity.find_by_username(&claims.username).await {
            Ok(Some(identity)) => {
                debug!(username = identity.username(), "caller authenticated");
                request.attach_identity(identity);
                StageOutcome::Continue
            }
            Ok(None) => {
                let err = PipelineError::AuthenticationFailure(format!(
                    "no caller record for '{}'",
                    claims.username
                ));
                warn!(path = request.path(), %err);
                StageOutcome::Terminate(err.response())
            }
            Err(cause) => {
                let err =
                    PipelineError::AuthenticationFailure(format!("caller lookup failed: {cause}"));
                warn!(path = request.path(), %err);
                StageOutcome::Terminate(err.response())
            }
        }
    }
}
