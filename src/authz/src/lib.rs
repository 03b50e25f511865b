//! # Palisade Authorization Engine
//!
//! Policy registry and the decision function that consumes it.
//!
//! A [`PolicyRegistry`] maps entity names to records of named action
//! predicates. [`authorize`] looks the pair up and evaluates the predicate
//! against the caller's [`PermissionSet`] and, optionally, the per-request
//! [`RequestContext`] accumulated by the surrounding pipeline. The four-way
//! [`Decision`] keeps configuration gaps (no policy, no rule) distinct from
//! a legitimate refusal.
//!
//! ## Example
//!
//! ```rust
//! use palisade_authz::{
//!     authorize, ActionName, EntityName, PermissionSet, PolicyRecord,
//!     PolicyRegistry, RequestContext,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> palisade_authz::Result<()> {
//! let mut registry = PolicyRegistry::new();
//! registry.register(
//!     "article",
//!     PolicyRecord::new().action("view", |perms: &PermissionSet, _: Option<&RequestContext>| {
//!         perms.contains("articles.view")
//!     }),
//! );
//!
//! let permissions = PermissionSet::for_subject("alice").grant("articles.view");
//! let decision = authorize(
//!     &ActionName::new("view"),
//!     &EntityName::new("article"),
//!     &permissions,
//!     &registry,
//!     None,
//! )
//! .await?;
//!
//! assert!(decision.is_allowed());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use context::{ContextError, RequestContext};
pub use engine::authorize;
pub use error::{AuthzError, Result};
pub use registry::{PolicyRecord, PolicyRegistry, Predicate};
pub use types::{ActionName, Decision, EntityName, PermissionSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
