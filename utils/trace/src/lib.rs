use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive` when set.
pub fn init(default_directive: &str) -> Result<(), TracingInitError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(from_env.as_deref(), default_directive)?;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| TracingInitError::SetGlobalDefault { source })?;

    Ok(())
}

fn build_filter(from_env: Option<&str>, default_directive: &str) -> Result<EnvFilter, TracingInitError> {
    let directives = from_env
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .unwrap_or(default_directive);

    EnvFilter::try_new(directives).map_err(|source| TracingInitError::InvalidFilter {
        directives: directives.to_string(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Invalid filter config {directives:?}: {source}")]
    InvalidFilter {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global default subscriber")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}
