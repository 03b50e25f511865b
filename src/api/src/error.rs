//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use palisade_pipeline::{stage::SERVER_FAULT_MESSAGE, StageResponse};
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// A pipeline stage terminated the request; its response is final
    Terminated(StageResponse),

    /// Handler-level fault; collapses to the generic 500 body
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Terminated(response) => {
                (response.status(), response.message().to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "handler fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_FAULT_MESSAGE.to_string(),
                )
            }
        };

        let error = match status.as_u16() {
            401 => "unauthenticated",
            403 => "forbidden",
            404 => "not_found",
            500 => "internal_error",
            _ => "error",
        };

        let body = Json(ErrorBody {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StageResponse> for ApiError {
    fn from(response: StageResponse) -> Self {
        ApiError::Terminated(response)
    }
}
