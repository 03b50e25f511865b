//! Login endpoint

use super::pipeline_request;
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, LoginResponse};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::Json;
use palisade_pipeline::{PipelineResult, StageResponse};
use tracing::warn;

/// Log in with username and password
///
/// On success returns an opaque token to present as `Authorization:
/// Bearer <token>` on protected routes.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Unknown user or wrong password"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Login sits on the public allow-list; running the pipeline anyway
    // keeps the route inside the stage contract.
    let mut request = pipeline_request(&uri, &headers);
    if let PipelineResult::Terminated(response) = state.pipelines.public.run(&mut request).await {
        return Err(ApiError::Terminated(response));
    }

    match state.store.login(&body.username, &body.password).await {
        Some(token) => Ok(Json(LoginResponse { token })),
        None => {
            // Wrong password and unknown user share one answer
            warn!(username = %body.username, "login rejected");
            Err(ApiError::Terminated(StageResponse::unauthenticated()))
        }
    }
}
