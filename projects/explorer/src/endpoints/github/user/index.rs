use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use interfaces_github_rest::{ErrorBody, FetchError, GithubClient, UpstreamResponse};
use thiserror::Error;

use crate::endpoints::github::{not_found, server_error};

pub const SERVER_ERROR_MESSAGE: &str = "Server error fetching from GitHub";

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("FetchUser: {source}")]
    FetchUser {
        #[from]
        source: FetchError,
    },
    #[error("UpstreamErrorBody: {status} with non-JSON body: {source}")]
    UpstreamErrorBody {
        status: StatusCode,
        source: serde_json::Error,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        server_error(SERVER_ERROR_MESSAGE, self.to_string())
    }
}

/// Axum handler: GET /api/github/{username}
///
/// Upstream's profile and upstream's errors are both forwarded verbatim.
pub async fn handler(
    Extension(github): Extension<GithubClient>,
    Path(username): Path<String>,
) -> Response {
    match github.fetch_user(&username).await {
        Ok(UpstreamResponse::Success(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(UpstreamResponse::Failure {
            status,
            body: ErrorBody::Json(body),
        }) => (status, Json(body)).into_response(),
        Ok(UpstreamResponse::Failure {
            status,
            body: ErrorBody::Raw { source, .. },
        }) => HandlerError::UpstreamErrorBody { status, source }.into_response(),
        Err(FetchError::InvalidSegment { segment }) => not_found(&segment),
        Err(source) => HandlerError::FetchUser { source }.into_response(),
    }
}
