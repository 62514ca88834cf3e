use axum::{middleware, routing::get, Extension, Router};
use interfaces_github_rest::GithubClient;
use tower_http::trace::TraceLayer;

use crate::{
    config::AllowedOrigin,
    endpoints::{
        github::{repos, user},
        message,
    },
    layers,
};

/// Builds the application with its cross-origin and header policy applied.
pub fn router(allowed_origin: AllowedOrigin, github: GithubClient) -> Router {
    let mut app = Router::new()
        .route("/api/message", get(message::index::handler))
        .route("/api/github/{username}", get(user::index::handler))
        .route("/api/github/{username}/repos", get(repos::index::handler))
        .layer(Extension(github))
        .layer(layers::cors(&allowed_origin))
        .layer(middleware::from_fn_with_state(
            allowed_origin,
            layers::enforce_allowed_origin,
        ));

    for layer in layers::security_headers() {
        app = app.layer(layer);
    }

    app.layer(TraceLayer::new_for_http())
}
