//! Application policy registry
//!
//! One record per exposed entity, registered once at startup. Capability
//! checks are pure; the edit/delete and self-view rules also read the
//! entity the resolution stage put in the request context.

use crate::keys;
use crate::models::{Article, User};
use palisade_authz::{PermissionSet, PolicyRecord, PolicyRegistry, RequestContext};

fn owns_article(permissions: &PermissionSet, context: Option<&RequestContext>) -> bool {
    context
        .and_then(|ctx| ctx.get::<Article>(keys::ARTICLE))
        .and_then(|article| article.owner.as_ref())
        .map(|owner| Some(owner.username.as_str()) == permissions.subject())
        .unwrap_or(false)
}

fn views_self(permissions: &PermissionSet, context: Option<&RequestContext>) -> bool {
    context
        .and_then(|ctx| ctx.get::<User>(keys::USER))
        .map(|user| Some(user.username.as_str()) == permissions.subject())
        .unwrap_or(false)
}

/// Policies for every entity the API exposes
pub fn default_registry() -> PolicyRegistry {
    let mut registry = PolicyRegistry::new();

    registry.register(
        "article",
        PolicyRecord::new()
            .action(
                "view",
                |permissions: &PermissionSet, _: Option<&RequestContext>| {
                    permissions.contains("articles.view")
                },
            )
            .action(
                "edit",
                |permissions: &PermissionSet, context: Option<&RequestContext>| {
                    permissions.contains("articles.edit") || owns_article(permissions, context)
                },
            )
            .action(
                "delete",
                |permissions: &PermissionSet, context: Option<&RequestContext>| {
                    permissions.contains("articles.delete") || owns_article(permissions, context)
                },
            ),
    );

    registry.register(
        "role",
        PolicyRecord::new().action(
            "view",
            |permissions: &PermissionSet, _: Option<&RequestContext>| {
                permissions.contains("roles.view")
            },
        ),
    );

    registry.register(
        "user",
        PolicyRecord::new().action(
            "view",
            |permissions: &PermissionSet, context: Option<&RequestContext>| {
                permissions.contains("users.view") || views_self(permissions, context)
            },
        ),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleOwner;
    use chrono::Utc;
    use palisade_authz::{authorize, ActionName, Decision, EntityName};

    fn article_owned_by(username: &str) -> Article {
        Article {
            id: 42,
            title: "t".to_string(),
            body: "b".to_string(),
            owner_id: 1,
            owner: Some(ArticleOwner {
                id: 1,
                username: username.to_string(),
            }),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_owner_may_edit_without_the_grant() {
        let registry = default_registry();
        let mut context = RequestContext::new();
        context
            .insert(keys::ARTICLE, article_owned_by("alice"))
            .unwrap();

        let owner = PermissionSet::for_subject("alice");
        let decision = authorize(
            &ActionName::new("edit"),
            &EntityName::new("article"),
            &owner,
            &registry,
            Some(&context),
        )
        .await
        .unwrap();
        assert_eq!(decision, Decision::Allowed);

        let stranger = PermissionSet::for_subject("bob");
        let decision = authorize(
            &ActionName::new("edit"),
            &EntityName::new("article"),
            &stranger,
            &registry,
            Some(&context),
        )
        .await
        .unwrap();
        assert_eq!(decision, Decision::Denied);
    }

    #[tokio::test]
    async fn test_grant_suffices_without_ownership() {
        let registry = default_registry();
        let mut context = RequestContext::new();
        context
            .insert(keys::ARTICLE, article_owned_by("alice"))
            .unwrap();

        let editor = PermissionSet::for_subject("carol").grant("articles.edit");
        let decision = authorize(
            &ActionName::new("edit"),
            &EntityName::new("article"),
            &editor,
            &registry,
            Some(&context),
        )
        .await
        .unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[tokio::test]
    async fn test_unregistered_pairs_stay_gaps() {
        let registry = default_registry();

        let decision = authorize(
            &ActionName::new("edit"),
            &EntityName::new("widget"),
            &PermissionSet::new(),
            &registry,
            None,
        )
        .await
        .unwrap();
        assert!(matches!(decision, Decision::PolicyNotFound { .. }));

        let decision = authorize(
            &ActionName::new("publish"),
            &EntityName::new("article"),
            &PermissionSet::new(),
            &registry,
            None,
        )
        .await
        .unwrap();
        assert!(matches!(decision, Decision::ActionNotFound { .. }));
    }
}
