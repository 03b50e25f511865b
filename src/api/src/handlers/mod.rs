//! HTTP handlers
//!
//! Each protected handler builds a [`PipelineRequest`] from the incoming
//! parts, runs its route's pipeline, and only touches the store once the
//! pipeline completed with a context.

pub mod articles;
pub mod auth;
pub mod health;
pub mod roles;
pub mod users;

use axum::http::{header, HeaderMap, Uri};
use palisade_pipeline::PipelineRequest;

/// Bearer token from the Authorization header, if present
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Pipeline request for the incoming URI and headers
pub(crate) fn pipeline_request(uri: &Uri, headers: &HeaderMap) -> PipelineRequest {
    PipelineRequest::new(uri.path()).with_token(bearer_token(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok-1"),
        );
        assert_eq!(bearer_token(&headers).as_deref(), Some("tok-1"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("tok-1"));
        assert!(bearer_token(&headers).is_none());
    }
}
