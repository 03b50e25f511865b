//! Domain models served by the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named role carrying capability grants
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: i64,

    pub name: String,

    /// Capability strings, e.g. "articles.edit"
    pub permissions: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// A registered user with roles eager-loaded
///
/// Credentials stay in the store's records; this projection is what leaves
/// the process.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: i64,

    pub username: String,

    pub roles: Vec<Role>,

    pub created_at: DateTime<Utc>,
}

/// Owner projection embedded in an article, sensitive fields excluded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleOwner {
    pub id: i64,

    pub username: String,
}

/// An article with its owner eager-loaded
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Article {
    pub id: i64,

    pub title: String,

    pub body: String,

    pub owner_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ArticleOwner>,

    pub created_at: DateTime<Utc>,
}

/// Login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,

    pub password: String,
}

/// Login response carrying the opaque auth token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Article update request body; absent fields keep their current value
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub body: Option<String>,
}

/// Service info returned at the root path
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub status: String,

    pub version: String,
}
