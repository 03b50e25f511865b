//! Palisade REST API
//!
//! The embedding application for the palisade request pipeline: an axum
//! router whose protected routes each run an
//! authenticate → resolve → authorize pipeline before their handler touches
//! the accumulated context.
//!
//! ## Features
//!
//! - **Pipeline-gated routes**: articles, roles and users behind the policy
//!   registry in [`policies`]
//! - **Public allow-list**: `/` and `/auth/login` bypass authentication by
//!   exact match
//! - **In-memory collaborators**: seedable store standing in for the
//!   persistence layer
//! - **OpenAPI documentation**: auto-generated Swagger UI
//! - **CORS and request tracing** via tower-http

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policies;
pub mod store;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

use axum::{
    routing::{get, post},
    Router,
};
use palisade_pipeline::{
    AuthenticationStage, EntityLoader, Gate, IdentitySource, Pipeline, ResolveStage,
};
use std::sync::Arc;
use store::{InMemoryStore, StoreIdentitySource};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Context keys claimed by the resolution stages
pub mod keys {
    pub const ARTICLE: &str = "article";
    pub const ROLE: &str = "role";
    pub const USER: &str = "user";
}

/// Paths that bypass authentication, by exact match
pub const PUBLIC_PATHS: [&str; 2] = ["/", "/auth/login"];

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::service_info,
        handlers::auth::login,
        handlers::articles::show,
        handlers::articles::update,
        handlers::articles::remove,
        handlers::roles::show,
        handlers::users::show,
    ),
    components(
        schemas(
            models::ServiceInfo,
            models::LoginRequest,
            models::LoginResponse,
            models::Article,
            models::ArticleOwner,
            models::UpdateArticleRequest,
            models::Role,
            models::User,
        )
    ),
    tags(
        (name = "auth", description = "Login and token issuance"),
        (name = "articles", description = "Article resources"),
        (name = "roles", description = "Role resources"),
        (name = "users", description = "User resources"),
    )
)]
struct ApiDoc;

/// Per-route pipelines, built once at startup
pub(crate) struct RoutePipelines {
    pub(crate) public: Pipeline,
    pub(crate) article_view: Pipeline,
    pub(crate) article_edit: Pipeline,
    pub(crate) article_delete: Pipeline,
    pub(crate) role_view: Pipeline,
    pub(crate) user_view: Pipeline,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub(crate) pipelines: Arc<RoutePipelines>,
}

impl AppState {
    /// State with the application's default policy registry
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self::with_registry(store, policies::default_registry())
    }

    /// State with a caller-supplied policy registry
    ///
    /// The registry is fixed for the life of the state; requests only ever
    /// read it.
    pub fn with_registry(
        store: Arc<InMemoryStore>,
        registry: palisade_authz::PolicyRegistry,
    ) -> Self {
        let gate = Gate::new(Arc::new(registry));
        let identity: Arc<dyn IdentitySource> =
            Arc::new(StoreIdentitySource::new(Arc::clone(&store)));

        let articles: Arc<dyn EntityLoader<models::Article>> = store.clone();
        let roles: Arc<dyn EntityLoader<models::Role>> = store.clone();
        let users: Arc<dyn EntityLoader<models::User>> = store.clone();

        let authenticate =
            || AuthenticationStage::new(Arc::clone(&identity), PUBLIC_PATHS);

        let pipelines = RoutePipelines {
            public: Pipeline::builder().stage(authenticate()).build(),
            article_view: Pipeline::builder()
                .stage(authenticate())
                .stage(ResolveStage::new("article", "id", keys::ARTICLE, Arc::clone(&articles)))
                .stage(gate.can("view", "article"))
                .build(),
            article_edit: Pipeline::builder()
                .stage(authenticate())
                .stage(ResolveStage::new("article", "id", keys::ARTICLE, Arc::clone(&articles)))
                .stage(gate.can("edit", "article"))
                .build(),
            article_delete: Pipeline::builder()
                .stage(authenticate())
                .stage(ResolveStage::new("article", "id", keys::ARTICLE, articles))
                .stage(gate.can("delete", "article"))
                .build(),
            role_view: Pipeline::builder()
                .stage(authenticate())
                .stage(ResolveStage::new("role", "id", keys::ROLE, roles))
                .stage(gate.can("view", "role"))
                .build(),
            user_view: Pipeline::builder()
                .stage(authenticate())
                .stage(ResolveStage::new("user", "id", keys::USER, users))
                .stage(gate.can("view", "user"))
                .build(),
        };

        Self {
            store,
            pipelines: Arc::new(pipelines),
        }
    }
}

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        // Public surface
        .route("/", get(handlers::health::service_info))
        .route("/auth/login", post(handlers::auth::login))
        // Protected resources
        .route(
            "/articles/:id",
            get(handlers::articles::show)
                .put(handlers::articles::update)
                .delete(handlers::articles::remove),
        )
        .route("/roles/:id", get(handlers::roles::show))
        .route("/users/:id", get(handlers::users::show))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
