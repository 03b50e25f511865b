//! Request surface threaded through the pipeline

use anyhow::Result;
use async_trait::async_trait;
use palisade_authz::PermissionSet;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Computes the caller's granted capabilities on demand
///
/// Kept behind the identity so the permission set is only resolved when an
/// authorization stage actually needs it; the lookup may suspend.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn permissions(&self) -> Result<PermissionSet>;
}

/// The authenticated principal for one request
#[derive(Clone)]
pub struct CallerIdentity {
    username: String,
    source: Arc<dyn PermissionSource>,
}

impl CallerIdentity {
    pub fn new(username: impl Into<String>, source: Arc<dyn PermissionSource>) -> Self {
        Self {
            username: username.into(),
            source,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Resolve the caller's permission set (may hit the backing store)
    pub async fn permissions(&self) -> Result<PermissionSet> {
        self.source.permissions().await
    }
}

impl fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerIdentity")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Transport-agnostic view of one incoming request
///
/// Carries what the stages consume: the request path (matched exactly
/// against the public allow-list), the named path parameters, the raw auth
/// token, and, once authentication succeeds, the caller identity.
#[derive(Debug, Default)]
pub struct PipelineRequest {
    path: String,
    params: HashMap<String, String>,
    token: Option<String>,
    identity: Option<CallerIdentity>,
}

impl PipelineRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a named path parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Attach the raw auth token, if the transport carried one
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// Attach the authenticated caller
    ///
    /// Written once by the authentication stage; immutable for the rest of
    /// the request.
    pub fn attach_identity(&mut self, identity: CallerIdentity) {
        debug_assert!(self.identity.is_none(), "caller identity attached twice");
        self.identity = Some(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoPermissions;

    #[async_trait]
    impl PermissionSource for NoPermissions {
        async fn permissions(&self) -> Result<PermissionSet> {
            Ok(PermissionSet::new())
        }
    }

    #[test]
    fn test_request_builder() {
        let request = PipelineRequest::new("/articles/42")
            .with_param("id", "42")
            .with_token(Some("tok-1".to_string()));

        assert_eq!(request.path(), "/articles/42");
        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.param("slug"), None);
        assert_eq!(request.token(), Some("tok-1"));
        assert!(request.identity().is_none());
    }

    #[tokio::test]
    async fn test_identity_attachment() {
        let mut request = PipelineRequest::new("/articles/42");
        request.attach_identity(CallerIdentity::new("alice", Arc::new(NoPermissions)));

        let identity = request.identity().unwrap();
        assert_eq!(identity.username(), "alice");
        assert!(identity.permissions().await.unwrap().is_empty());
    }
}
