use std::net::SocketAddr;

use axum::serve;
use interfaces_github_rest::GithubClient;
use projects_explorer::{config::Config, router::router};
use thiserror::Error;
use tracing::{info, warn};
use utils_trace::DEFAULT_DIRECTIVE;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("Config: {source}")]
    Config {
        #[source]
        source: projects_explorer::config::ConfigError,
    },
    #[error("GithubClient: {source}")]
    GithubClient {
        #[source]
        source: interfaces_github_rest::ClientBuildError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    // .env may carry RUST_LOG, so load it before the subscriber reads the filter.
    let dotenv = dotenvy::dotenv();
    utils_trace::init(DEFAULT_DIRECTIVE).map_err(|source| MainError::TracingInit { source })?;

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "ignoring unreadable .env file");
        }
    }

    let config = Config::from_env().map_err(|source| MainError::Config { source })?;
    info!(?config, "loaded configuration");

    let headers = config.upstream_headers();
    if !headers.has_token() {
        warn!("GITHUB_TOKEN not set, upstream calls are unauthenticated and rate limited");
    }

    let github = GithubClient::new(&config.github_api_url, &headers)
        .map_err(|source| MainError::GithubClient { source })?;

    let app = router(config.allowed_origin.clone(), github);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!("Server running on http://localhost:{}", config.port);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| MainError::Serve { source })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
