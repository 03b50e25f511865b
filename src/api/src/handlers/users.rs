//! User endpoints

use super::pipeline_request;
use crate::error::{ApiError, ApiResult};
use crate::keys;
use crate::models::User;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri};
use axum::Json;
use palisade_pipeline::PipelineResult;

/// Fetch one user with roles eager-loaded
///
/// Callers holding `users.view` may fetch anyone; every caller may fetch
/// itself.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller may not view this user"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> ApiResult<Json<User>> {
    let mut request = pipeline_request(&uri, &headers).with_param("id", id);

    match state.pipelines.user_view.run(&mut request).await {
        PipelineResult::Terminated(response) => Err(ApiError::Terminated(response)),
        PipelineResult::Completed(context) => {
            let user = context
                .get::<User>(keys::USER)
                .cloned()
                .ok_or_else(|| ApiError::Internal("resolved user missing from context".to_string()))?;
            Ok(Json(user))
        }
    }
}
