//! Authorization decision engine

use crate::context::RequestContext;
use crate::error::Result;
use crate::registry::PolicyRegistry;
use crate::types::{ActionName, Decision, EntityName, PermissionSet};
use tracing::debug;

/// Decide whether `permissions` may perform `action` on `entity`
///
/// Registry lookups run strictly before predicate evaluation, so a
/// configuration gap short-circuits without touching the permission set:
///
/// 1. no record for `entity` → [`Decision::PolicyNotFound`]
/// 2. no rule for `action` in the record → [`Decision::ActionNotFound`]
/// 3. otherwise the rule is evaluated with `(permissions, context)` and its
///    boolean maps to [`Decision::Allowed`] / [`Decision::Denied`]
///
/// All four outcomes are ordinary values; only a fault inside a predicate
/// returns an error.
pub async fn authorize(
    action: &ActionName,
    entity: &EntityName,
    permissions: &PermissionSet,
    registry: &PolicyRegistry,
    context: Option<&RequestContext>,
) -> Result<Decision> {
    let Some(record) = registry.record(entity) else {
        debug!(entity = %entity, "no policy registered for entity");
        return Ok(Decision::PolicyNotFound {
            entity: entity.clone(),
        });
    };

    let Some(predicate) = record.predicate(action) else {
        debug!(entity = %entity, action = %action, "no rule for action");
        return Ok(Decision::ActionNotFound {
            entity: entity.clone(),
            action: action.clone(),
        });
    };

    let granted = predicate.evaluate(permissions, context).await?;
    debug!(entity = %entity, action = %action, granted, "predicate evaluated");

    Ok(if granted {
        Decision::Allowed
    } else {
        Decision::Denied
    })
}
