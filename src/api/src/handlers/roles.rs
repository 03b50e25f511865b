//! Role endpoints

use super::pipeline_request;
use crate::error::{ApiError, ApiResult};
use crate::keys;
use crate::models::Role;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri};
use axum::Json;
use palisade_pipeline::PipelineResult;

/// Fetch one role with its permission strings
#[utoipa::path(
    get,
    path = "/roles/{id}",
    params(("id" = String, Path, description = "Role id")),
    responses(
        (status = 200, description = "The role", body = Role),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller may not view roles"),
        (status = 404, description = "No such role"),
    ),
    tag = "roles"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> ApiResult<Json<Role>> {
    let mut request = pipeline_request(&uri, &headers).with_param("id", id);

    match state.pipelines.role_view.run(&mut request).await {
        PipelineResult::Terminated(response) => Err(ApiError::Terminated(response)),
        PipelineResult::Completed(context) => {
            let role = context
                .get::<Role>(keys::ROLE)
                .cloned()
                .ok_or_else(|| ApiError::Internal("resolved role missing from context".to_string()))?;
            Ok(Json(role))
        }
    }
}
