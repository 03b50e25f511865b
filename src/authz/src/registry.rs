//! Policy registry: entity name → action name → predicate
//!
//! Provided by the embedding application as static configuration and never
//! mutated once the process is serving, so concurrent readers need no
//! locking. The registry performs no exhaustiveness checks; a missing entity
//! or action is a normal runtime outcome reported by the engine.

use crate::context::RequestContext;
use crate::error::Result;
use crate::types::{ActionName, EntityName, PermissionSet};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Decides whether a permission set satisfies an action's requirement
///
/// The optional context lets a predicate implement attribute rules over
/// entities resolved earlier in the request ("only the article's owner may
/// edit it") alongside pure capability checks.
#[async_trait]
pub trait Predicate: Send + Sync {
    async fn evaluate(
        &self,
        permissions: &PermissionSet,
        context: Option<&RequestContext>,
    ) -> Result<bool>;
}

/// Plain closures are predicates
///
/// Asynchronous or fallible predicates implement [`Predicate`] directly.
#[async_trait]
impl<F> Predicate for F
where
    F: Fn(&PermissionSet, Option<&RequestContext>) -> bool + Send + Sync,
{
    async fn evaluate(
        &self,
        permissions: &PermissionSet,
        context: Option<&RequestContext>,
    ) -> Result<bool> {
        Ok(self(permissions, context))
    }
}

/// The named action rules registered for one entity
#[derive(Default)]
pub struct PolicyRecord {
    actions: HashMap<ActionName, Arc<dyn Predicate>>,
}

impl PolicyRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for an action
    pub fn action(
        mut self,
        name: impl Into<ActionName>,
        predicate: impl Predicate + 'static,
    ) -> Self {
        self.actions.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Look up the rule for an action
    pub fn predicate(&self, action: &ActionName) -> Option<&Arc<dyn Predicate>> {
        self.actions.get(action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Two-level mapping from entity name to its action rules
#[derive(Default)]
pub struct PolicyRegistry {
    entities: HashMap<EntityName, PolicyRecord>,
}

impl PolicyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the policy record for an entity, replacing any previous one
    pub fn register(&mut self, entity: impl Into<EntityName>, record: PolicyRecord) {
        let entity = entity.into();
        debug!(entity = %entity, actions = record.len(), "policy registered");
        self.entities.insert(entity, record);
    }

    /// Look up the policy record for an entity
    pub fn record(&self, entity: &EntityName) -> Option<&PolicyRecord> {
        self.entities.get(entity)
    }

    /// Names of every registered entity
    pub fn entities(&self) -> impl Iterator<Item = &EntityName> {
        self.entities.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_predicate() {
        let record = PolicyRecord::new().action(
            "view",
            |permissions: &PermissionSet, _: Option<&RequestContext>| {
                permissions.contains("articles.view")
            },
        );

        let predicate = record.predicate(&ActionName::new("view")).unwrap();
        let permissions = PermissionSet::new().grant("articles.view");

        assert!(predicate.evaluate(&permissions, None).await.unwrap());
        assert!(!predicate
            .evaluate(&PermissionSet::new(), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let mut registry = PolicyRegistry::new();
        registry.register(
            "article",
            PolicyRecord::new()
                .action("view", |_: &PermissionSet, _: Option<&RequestContext>| true),
        );

        let record = registry.record(&EntityName::new("article")).unwrap();
        assert!(record.predicate(&ActionName::new("view")).is_some());
        assert!(record.predicate(&ActionName::new("publish")).is_none());
        assert!(registry.record(&EntityName::new("widget")).is_none());
    }

    #[test]
    fn test_reregistration_replaces_record() {
        let mut registry = PolicyRegistry::new();
        registry.register("article", PolicyRecord::new());
        registry.register(
            "article",
            PolicyRecord::new()
                .action("view", |_: &PermissionSet, _: Option<&RequestContext>| true),
        );

        let record = registry.record(&EntityName::new("article")).unwrap();
        assert_eq!(record.len(), 1);
    }
}
