use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::{Client, IntoUrl, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const USER_AGENT: &str = "github-explorer-app";

/// Header set sent with every upstream call.
#[derive(Clone)]
pub struct UpstreamHeaders {
    user_agent: String,
    token: Option<String>,
}

impl UpstreamHeaders {
    /// An empty token is treated as no token at all.
    pub fn new(user_agent: impl Into<String>, token: Option<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_str(&self.user_agent)?,
        );

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

impl Default for UpstreamHeaders {
    fn default() -> Self {
        Self::new(USER_AGENT, None)
    }
}

impl fmt::Debug for UpstreamHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamHeaders")
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body of a non-2xx upstream response.
#[derive(Debug)]
pub enum ErrorBody {
    Json(Value),
    /// Upstream sent something that is not JSON.
    Raw {
        text: String,
        source: serde_json::Error,
    },
}

/// Outcome of a call that reached upstream and got a response back.
#[derive(Debug)]
pub enum UpstreamResponse {
    Success(Value),
    Failure { status: StatusCode, body: ErrorBody },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("InvalidUrl: {url} cannot carry path segments")]
    InvalidUrl { url: String },

    #[error("InvalidSegment: {segment:?} would be dropped from the path")]
    InvalidSegment { segment: String },

    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("DecodeBody: {source}")]
    DecodeBody { source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("InvalidHeader: {source}")]
    InvalidHeader {
        #[from]
        source: InvalidHeaderValue,
    },

    #[error("InvalidBaseUrl: {url}")]
    InvalidBaseUrl { url: String },

    #[error("HttpClient: {source}")]
    HttpClient { source: reqwest::Error },
}

/// GitHub REST client sharing one connection pool across calls.
///
/// Every call is independent: no retries, no caching.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base: Url,
}

impl GithubClient {
    pub fn new(base: &str, headers: &UpstreamHeaders) -> Result<Self, ClientBuildError> {
        let base = Url::parse(base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientBuildError::InvalidBaseUrl {
                url: base.to_string(),
            })?;

        let http = Client::builder()
            .default_headers(headers.to_header_map()?)
            .build()
            .map_err(|source| ClientBuildError::HttpClient { source })?;

        Ok(Self { http, base })
    }

    /// Appends percent-encoded segments to the base URL.
    ///
    /// `.` and `..` are refused: the URL parser would silently drop them and
    /// address a different resource.
    pub fn endpoint<I>(&self, segments: I) -> Result<Url, FetchError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments = segments.into_iter().collect::<Vec<_>>();
        if let Some(segment) = segments
            .iter()
            .find(|segment| is_dot_segment(segment.as_ref()))
        {
            return Err(FetchError::InvalidSegment {
                segment: segment.as_ref().to_string(),
            });
        }

        let mut url = self.base.clone();
        // Only reachable for cannot-be-a-base URLs, which `new` already refuses.
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn fetch_user(&self, username: &str) -> Result<UpstreamResponse, FetchError> {
        self.fetch(self.endpoint(["users", username])?).await
    }

    pub async fn fetch_user_repos(&self, username: &str) -> Result<UpstreamResponse, FetchError> {
        self.fetch(self.endpoint(["users", username, "repos"])?).await
    }

    /// GET `url` and classify the response by status.
    pub async fn fetch<U: IntoUrl>(&self, url: U) -> Result<UpstreamResponse, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::RequestSend { source })?;

        let status = response.status();
        debug!(url = %response.url(), %status, "upstream responded");

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::ResponseRead { source })?;

        classify(status, &text)
    }
}

/// `.` or `..`, including the `%2e` spellings the URL parser also resolves.
fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().replace("%2e", ".").as_str(),
        "." | ".."
    )
}

fn classify(status: StatusCode, text: &str) -> Result<UpstreamResponse, FetchError> {
    if status.is_success() {
        let body = serde_json::from_str(text).map_err(|source| FetchError::DecodeBody { source })?;
        return Ok(UpstreamResponse::Success(body));
    }

    let body = match serde_json::from_str(text) {
        Ok(json) => ErrorBody::Json(json),
        Err(source) => ErrorBody::Raw {
            text: text.to_string(),
            source,
        },
    };

    Ok(UpstreamResponse::Failure { status, body })
}
