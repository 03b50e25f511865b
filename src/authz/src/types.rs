//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Name of an entity kind that policies are registered under
///
/// Compared by exact string identity, never by pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Create a new entity name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Name of an action within an entity's policy record
///
/// Compared by exact string identity, never by pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(String);

impl ActionName {
    /// Create a new action name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Granted capabilities for one caller
///
/// Opaque to the decision engine, which hands it to predicates unexamined.
/// Predicates may read the grants and the subject the set was derived for;
/// ownership rules compare the subject against entities resolved into the
/// request context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// The caller the grants were computed for
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,

    /// Granted capability strings (e.g. "articles.edit")
    grants: HashSet<String>,
}

impl PermissionSet {
    /// Create an empty permission set with no subject
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty permission set for the given subject
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            grants: HashSet::new(),
        }
    }

    /// Add a granted capability
    pub fn grant(mut self, capability: impl Into<String>) -> Self {
        self.grants.insert(capability.into());
        self
    }

    /// Whether the capability was granted
    pub fn contains(&self, capability: &str) -> bool {
        self.grants.contains(capability)
    }

    /// The caller the grants were computed for, if known
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            subject: None,
            grants: iter.into_iter().collect(),
        }
    }
}

/// Outcome of an authorization check
///
/// The not-found variants indicate a configuration gap (a policy or rule a
/// developer forgot to register), not a legitimate refusal; callers map them
/// to a server error rather than a client error. The carried names exist for
/// operator logging only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// The predicate accepted the permission set
    Allowed,

    /// The predicate refused the permission set
    Denied,

    /// No policy is registered for the entity
    PolicyNotFound { entity: EntityName },

    /// The entity's policy has no rule for the action
    ActionNotFound {
        entity: EntityName,
        action: ActionName,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Whether this outcome reflects a registry gap rather than an
    /// ordinary allow/deny
    pub fn is_configuration_gap(&self) -> bool {
        matches!(
            self,
            Decision::PolicyNotFound { .. } | Decision::ActionNotFound { .. }
        )
    }
}
