//! # Palisade Request Pipeline
//!
//! Threads a per-request [`RequestContext`](palisade_authz::RequestContext)
//! and an authenticated [`CallerIdentity`] through an ordered list of
//! [`Stage`]s, short-circuiting on the first stage that terminates.
//!
//! The bundled stages cover the three concerns every protected route needs:
//!
//! - [`AuthenticationStage`] resolves the caller from a request token, with
//!   an exact-match allow-list for public paths.
//! - [`ResolveStage`] loads an entity named by a path parameter into the
//!   context, or ends the request with 404.
//! - [`Gate::can`] builds a stage that asks the
//!   [`palisade_authz`] decision engine whether the caller may perform a
//!   fixed action on a fixed entity.
//!
//! Stages convert every collaborator failure into a [`PipelineError`]
//! variant at their own boundary: clients see only the stable status and
//! message for that variant, operators get the detail in the logs.

pub mod auth;
pub mod authorize;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod resolve;
pub mod stage;

// Re-export commonly used types
pub use auth::{AuthenticationStage, IdentitySource, TokenClaims};
pub use authorize::{AuthorizeStage, Gate};
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineResult};
pub use request::{CallerIdentity, PermissionSource, PipelineRequest};
pub use resolve::{EntityLoader, ResolveStage};
pub use stage::{Stage, StageOutcome, StageResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
