use std::{env, fmt};

use axum::http::HeaderValue;
use interfaces_github_rest::{UpstreamHeaders, GITHUB_API_BASE, USER_AGENT};

pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

impl AllowedOrigin {
    /// Unset, empty and `*` all mean any origin.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") | Some("*") => Ok(Self::Any),
            Some(origin) => HeaderValue::from_str(origin)
                .map(Self::Exact)
                .map_err(|_| ConfigError::InvalidValue("PORTFOLIO_URL")),
        }
    }

    pub fn permits(&self, origin: &HeaderValue) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(allowed) => allowed == origin,
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub allowed_origin: AllowedOrigin,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let allowed_origin = AllowedOrigin::parse(lookup("PORTFOLIO_URL").as_deref())?;

        let github_token = lookup("GITHUB_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let github_api_url = lookup("GITHUB_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| GITHUB_API_BASE.to_string());

        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            allowed_origin,
            github_token,
            github_api_url,
            port,
        })
    }

    pub fn upstream_headers(&self) -> UpstreamHeaders {
        UpstreamHeaders::new(USER_AGENT, self.github_token.clone())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("allowed_origin", &self.allowed_origin)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("github_api_url", &self.github_api_url)
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();

        assert_eq!(config.allowed_origin, AllowedOrigin::Any);
        assert_eq!(config.github_token, None);
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.port, 5000);
        assert!(!config.upstream_headers().has_token());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("PORTFOLIO_URL", "https://me.github.io"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITHUB_API_URL", "http://127.0.0.1:9000"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(
            config.allowed_origin,
            AllowedOrigin::Exact(HeaderValue::from_static("https://me.github.io"))
        );
        assert_eq!(config.github_token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.github_api_url, "http://127.0.0.1:9000");
        assert_eq!(config.port, 8080);
        assert!(config.upstream_headers().has_token());
    }

    #[test]
    fn empty_token_means_unauthenticated() {
        let config = config(&[("GITHUB_TOKEN", "")]).unwrap();
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn star_origin_means_any() {
        let config = config(&[("PORTFOLIO_URL", "*")]).unwrap();
        assert_eq!(config.allowed_origin, AllowedOrigin::Any);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config(&[("PORT", "fifty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));

        let err = config(&[("PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));
    }

    #[test]
    fn exact_origin_only_permits_itself() {
        let allowed = AllowedOrigin::parse(Some("https://me.github.io")).unwrap();

        assert!(allowed.permits(&HeaderValue::from_static("https://me.github.io")));
        assert!(!allowed.permits(&HeaderValue::from_static("https://evil.example")));
        assert!(AllowedOrigin::Any.permits(&HeaderValue::from_static("https://evil.example")));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = config(&[("GITHUB_TOKEN", "ghp_secret")]).unwrap();
        assert!(!format!("{config:?}").contains("ghp_secret"));
    }
}
