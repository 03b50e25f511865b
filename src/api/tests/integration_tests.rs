//! End-to-end router scenarios
//!
//! Each test drives the full axum router through tower's `oneshot`, so the
//! request crosses the real pipeline: authentication, resolution,
//! authorization, then the handler.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use palisade_api::store::InMemoryStore;
use palisade_api::AppState;
use palisade_api::{build_router, policies};
use palisade_authz::{PermissionSet, PolicyRecord, PolicyRegistry, RequestContext};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn seeded_app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    store.seed().await;
    build_router(AppState::new(store))
}

async fn seeded_app_with_registry(registry: PolicyRegistry) -> Router {
    let store = Arc::new(InMemoryStore::new());
    store.seed().await;
    build_router(AppState::with_registry(store, registry))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

// Scenario: the login route is public and needs no token
#[tokio::test]
async fn login_bypasses_authentication() {
    let app = seeded_app().await;
    let token = login(&app, "alice", "alice-password").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn wrong_credentials_yield_the_generic_401() {
    let app = seeded_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": "alice", "password": "guess" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Sorry — log in and try again."
    );
}

// Scenario: an invalid token on a protected route is a 401
#[tokio::test]
async fn invalid_token_yields_401() {
    let app = seeded_app().await;

    for token in [None, Some("tok-forged")] {
        let response = app.clone().oneshot(get("/articles/42", token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["message"],
            "Sorry — log in and try again."
        );
    }
}

// Scenario: a valid token but an absent record is a 404
#[tokio::test]
async fn missing_article_yields_404() {
    let app = seeded_app().await;
    let token = login(&app, "alice", "alice-password").await;

    let response = app
        .clone()
        .oneshot(get("/articles/9999", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "The article does not exist."
    );

    // A malformed id is indistinguishable from absence
    let response = app
        .oneshot(get("/articles/forty-two", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn viewing_an_article_joins_its_owner() {
    let app = seeded_app().await;
    let token = login(&app, "bob", "bob-password").await;

    let response = app.oneshot(get("/articles/42", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Pipelines in anger");
    assert_eq!(body["owner"]["username"], "alice");
    // The owner projection excludes credentials
    assert!(body["owner"].get("password_hash").is_none());
}

// Scenario: predicate refuses → 403 with the stable message
#[tokio::test]
async fn non_owner_without_grant_cannot_edit() {
    let app = seeded_app().await;
    let token = login(&app, "bob", "bob-password").await;

    let request = Request::builder()
        .method("PUT")
        .uri("/articles/42")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "title": "bob was here" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["message"],
        "You are not authorized to perform this action."
    );
}

#[tokio::test]
async fn editor_updates_an_article() {
    let app = seeded_app().await;
    let token = login(&app, "alice", "alice-password").await;

    let request = Request::builder()
        .method("PUT")
        .uri("/articles/7")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "title": "Curated reading list" }).to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Curated reading list");
    // Untouched fields keep their value
    assert_eq!(body["owner"]["username"], "bob");
}

#[tokio::test]
async fn deleting_an_article_then_fetching_it_is_404() {
    let app = seeded_app().await;
    let token = login(&app, "alice", "alice-password").await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/articles/7")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/articles/7", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Scenario: entity missing from the registry entirely → generic 500
#[tokio::test]
async fn missing_policy_record_is_a_500() {
    // No policies registered at all, so "article" has no record
    let app = seeded_app_with_registry(PolicyRegistry::new()).await;
    let token = login(&app, "alice", "alice-password").await;

    let response = app.oneshot(get("/articles/42", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "Sorry — something bad happened."
    );
}

// Scenario: entity registered but the action rule absent → generic 500
#[tokio::test]
async fn missing_action_rule_is_a_500() {
    let mut registry = PolicyRegistry::new();
    // "article" exists, but carries no "view" rule
    registry.register(
        "article",
        PolicyRecord::new().action(
            "edit",
            |permissions: &PermissionSet, _: Option<&RequestContext>| {
                permissions.contains("articles.edit")
            },
        ),
    );

    let app = seeded_app_with_registry(registry).await;
    let token = login(&app, "alice", "alice-password").await;

    let response = app.oneshot(get("/articles/42", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "Sorry — something bad happened."
    );
}

#[tokio::test]
async fn callers_may_view_themselves_but_not_others() {
    let app = seeded_app().await;
    let token = login(&app, "bob", "bob-password").await;

    // bob is user 2 and holds no users.view grant
    let response = app.clone().oneshot(get("/users/2", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "bob");
    assert_eq!(body["roles"][0]["name"], "reader");
    assert!(body.get("password_hash").is_none());

    let response = app.oneshot(get("/users/1", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_view_requires_the_grant() {
    let app = seeded_app().await;

    let alice = login(&app, "alice", "alice-password").await;
    let response = app.clone().oneshot(get("/roles/2", Some(&alice))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "reader");

    let bob = login(&app, "bob", "bob-password").await;
    let response = app.oneshot(get("/roles/2", Some(&bob))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn service_info_is_public() {
    let app = seeded_app().await;

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn default_registry_covers_every_routed_pair() {
    // Sanity check on the shipped configuration: the default registry has a
    // record for each routed entity
    let registry = policies::default_registry();
    for entity in ["article", "role", "user"] {
        assert!(registry
            .record(&palisade_authz::EntityName::new(entity))
            .is_some());
    }
}
