//! In-memory collaborators backing the pipeline's external interfaces
//!
//! Stands in for the persistence layer: plain maps behind `RwLock`s, with
//! every lookup an await point, the same shape a database-backed
//! implementation would have. The pipeline only ever sees the collaborator
//! traits, so swapping this out does not touch a single stage.

use crate::models::{Article, ArticleOwner, Role, User};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use palisade_authz::PermissionSet;
use palisade_pipeline::{
    CallerIdentity, EntityLoader, IdentitySource, PermissionSource, PipelineRequest, TokenClaims,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Stored user row; credentials and role links never leave the store
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Stored article row; the owner is joined in at load time
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Hash a password for storage or comparison
pub fn hash_password(password: &str) -> String {
    blake3::hash(password.as_bytes()).to_hex().to_string()
}

/// In-memory store implementing every collaborator the pipeline needs
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<i64, UserRecord>>,
    roles: RwLock<HashMap<i64, Role>>,
    articles: RwLock<HashMap<i64, ArticleRecord>>,

    /// Opaque login token → username
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn insert_role(&self, role: Role) {
        self.roles.write().await.insert(role.id, role);
    }

    pub async fn insert_article(&self, article: ArticleRecord) {
        self.articles.write().await.insert(article.id, article);
    }

    /// Verify credentials and mint an opaque token for the user
    pub async fn login(&self, username: &str, password: &str) -> Option<String> {
        let users = self.users.read().await;
        let user = users.values().find(|user| user.username == username)?;
        if user.password_hash != hash_password(password) {
            return None;
        }
        drop(users);

        let token = Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), username.to_string());
        debug!(username, "login token issued");
        Some(token)
    }

    /// Username for a previously issued token
    pub async fn resolve_token(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Load a user with its roles eager-loaded
    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        let record = {
            let users = self.users.read().await;
            users.values().find(|user| user.username == username).cloned()
        }?;
        Some(self.compose_user(record).await)
    }

    pub async fn update_article(
        &self,
        id: i64,
        title: Option<String>,
        body: Option<String>,
    ) -> Option<Article> {
        let record = {
            let mut articles = self.articles.write().await;
            let record = articles.get_mut(&id)?;
            if let Some(title) = title {
                record.title = title;
            }
            if let Some(body) = body {
                record.body = body;
            }
            record.clone()
        };
        Some(self.compose_article(record).await)
    }

    pub async fn delete_article(&self, id: i64) -> bool {
        self.articles.write().await.remove(&id).is_some()
    }

    /// Demo dataset used by the server binary and the end-to-end tests
    pub async fn seed(&self) {
        let now = Utc::now();

        self.insert_role(Role {
            id: 1,
            name: "editor".to_string(),
            permissions: vec![
                "articles.view".to_string(),
                "articles.edit".to_string(),
                "articles.delete".to_string(),
                "roles.view".to_string(),
                "users.view".to_string(),
            ],
            created_at: now,
        })
        .await;
        self.insert_role(Role {
            id: 2,
            name: "reader".to_string(),
            permissions: vec!["articles.view".to_string()],
            created_at: now,
        })
        .await;

        self.insert_user(UserRecord {
            id: 1,
            username: "alice".to_string(),
            password_hash: hash_password("alice-password"),
            role_ids: vec![1],
            created_at: now,
        })
        .await;
        self.insert_user(UserRecord {
            id: 2,
            username: "bob".to_string(),
            password_hash: hash_password("bob-password"),
            role_ids: vec![2],
            created_at: now,
        })
        .await;

        self.insert_article(ArticleRecord {
            id: 42,
            title: "Pipelines in anger".to_string(),
            body: "Notes from running the request pipeline in production.".to_string(),
            owner_id: 1,
            created_at: now,
        })
        .await;
        self.insert_article(ArticleRecord {
            id: 7,
            title: "Reading list".to_string(),
            body: "What bob has been reading this week.".to_string(),
            owner_id: 2,
            created_at: now,
        })
        .await;
    }

    async fn compose_user(&self, record: UserRecord) -> User {
        let roles = self.roles.read().await;
        let user_roles = record
            .role_ids
            .iter()
            .filter_map(|id| roles.get(id).cloned())
            .collect();

        User {
            id: record.id,
            username: record.username,
            roles: user_roles,
            created_at: record.created_at,
        }
    }

    async fn compose_article(&self, record: ArticleRecord) -> Article {
        let owner = {
            let users = self.users.read().await;
            users.get(&record.owner_id).map(|user| ArticleOwner {
                id: user.id,
                username: user.username.clone(),
            })
        };

        Article {
            id: record.id,
            title: record.title,
            body: record.body,
            owner_id: record.owner_id,
            owner,
            created_at: record.created_at,
        }
    }
}

/// Identity collaborator over the shared store
///
/// Tokens are opaque values minted at login; decoding one is a token-table
/// lookup. A signed-token codec would slot in here without touching the
/// authentication stage.
pub struct StoreIdentitySource {
    store: Arc<InMemoryStore>,
}

impl StoreIdentitySource {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentitySource for StoreIdentitySource {
    async fn decode_token(&self, request: &PipelineRequest) -> Result<TokenClaims> {
        let token = request
            .token()
            .ok_or_else(|| anyhow!("no auth token on request"))?;
        let username = self
            .store
            .resolve_token(token)
            .await
            .ok_or_else(|| anyhow!("token is not recognized"))?;
        Ok(TokenClaims { username })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<CallerIdentity>> {
        let users = self.store.users.read().await;
        let Some(record) = users.values().find(|user| user.username == username) else {
            return Ok(None);
        };
        Ok(Some(CallerIdentity::new(
            record.username.clone(),
            Arc::new(StorePermissions {
                store: Arc::clone(&self.store),
                username: record.username.clone(),
            }),
        )))
    }
}

/// Permission source deriving grants from the caller's roles on demand
struct StorePermissions {
    store: Arc<InMemoryStore>,
    username: String,
}

#[async_trait]
impl PermissionSource for StorePermissions {
    async fn permissions(&self) -> Result<PermissionSet> {
        let user = self
            .store
            .find_user_by_username(&self.username)
            .await
            .ok_or_else(|| anyhow!("user '{}' disappeared mid-request", self.username))?;

        let mut permissions = PermissionSet::for_subject(user.username.as_str());
        for role in &user.roles {
            for capability in &role.permissions {
                permissions = permissions.grant(capability.as_str());
            }
        }
        Ok(permissions)
    }
}

#[async_trait]
impl EntityLoader<Article> for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Article>> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let record = {
            let articles = self.articles.read().await;
            articles.get(&id).cloned()
        };
        match record {
            Some(record) => Ok(Some(self.compose_article(record).await)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EntityLoader<Role> for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Role>> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        Ok(self.roles.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl EntityLoader<User> for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let record = {
            let users = self.users.read().await;
            users.get(&id).cloned()
        };
        match record {
            Some(record) => Ok(Some(self.compose_user(record).await)),
            None => Ok(None),
        }
    }
}
