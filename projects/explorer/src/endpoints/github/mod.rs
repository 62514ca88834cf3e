pub mod repos;
pub mod user;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Body of every 500 the GitHub endpoints send.
#[derive(Debug, Serialize)]
pub struct ServerErrorBody {
    pub message: &'static str,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub message: &'static str,
}

/// Answer for usernames that cannot be addressed upstream as-is.
pub fn not_found(username: &str) -> Response {
    tracing::debug!(username, "refusing unaddressable username");
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            message: "Not Found",
        }),
    )
        .into_response()
}

pub fn server_error(message: &'static str, error: String) -> Response {
    tracing::error!(%error, "{message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerErrorBody { message, error }),
    )
        .into_response()
}
