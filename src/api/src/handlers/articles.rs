//! Article endpoints

use super::pipeline_request;
use crate::error::{ApiError, ApiResult};
use crate::keys;
use crate::models::{Article, UpdateArticleRequest};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use palisade_pipeline::PipelineResult;

/// Fetch one article with its owner
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "The article", body = Article),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller may not view articles"),
        (status = 404, description = "No such article"),
    ),
    tag = "articles"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> ApiResult<Json<Article>> {
    let mut request = pipeline_request(&uri, &headers).with_param("id", id);

    match state.pipelines.article_view.run(&mut request).await {
        PipelineResult::Terminated(response) => Err(ApiError::Terminated(response)),
        PipelineResult::Completed(context) => {
            let article = context
                .get::<Article>(keys::ARTICLE)
                .cloned()
                .ok_or_else(|| ApiError::Internal("resolved article missing from context".to_string()))?;
            Ok(Json(article))
        }
    }
}

/// Update an article's title or body
///
/// Allowed for callers holding `articles.edit` or owning the article.
#[utoipa::path(
    put,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "The updated article", body = Article),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller may not edit this article"),
        (status = 404, description = "No such article"),
    ),
    tag = "articles"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<UpdateArticleRequest>,
) -> ApiResult<Json<Article>> {
    let mut request = pipeline_request(&uri, &headers).with_param("id", id);

    match state.pipelines.article_edit.run(&mut request).await {
        PipelineResult::Terminated(response) => Err(ApiError::Terminated(response)),
        PipelineResult::Completed(context) => {
            let resolved = context
                .get::<Article>(keys::ARTICLE)
                .ok_or_else(|| ApiError::Internal("resolved article missing from context".to_string()))?;
            let updated = state
                .store
                .update_article(resolved.id, body.title, body.body)
                .await
                .ok_or_else(|| ApiError::Internal("article vanished during update".to_string()))?;
            Ok(Json(updated))
        }
    }
}

/// Delete an article
///
/// Allowed for callers holding `articles.delete` or owning the article.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller may not delete this article"),
        (status = 404, description = "No such article"),
    ),
    tag = "articles"
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let mut request = pipeline_request(&uri, &headers).with_param("id", id);

    match state.pipelines.article_delete.run(&mut request).await {
        PipelineResult::Terminated(response) => Err(ApiError::Terminated(response)),
        PipelineResult::Completed(context) => {
            let resolved = context
                .get::<Article>(keys::ARTICLE)
                .ok_or_else(|| ApiError::Internal("resolved article missing from context".to_string()))?;
            state.store.delete_article(resolved.id).await;
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
