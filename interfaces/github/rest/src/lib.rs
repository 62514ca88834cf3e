//! Thin client for the public GitHub REST API
//!
//! - `index` performs calls and classifies upstream responses
//! - `models` holds the few upstream shapes we read fields from

pub mod index;
pub mod models;

pub use index::{
    ClientBuildError, ErrorBody, FetchError, GithubClient, UpstreamHeaders, UpstreamResponse,
    GITHUB_API_BASE, USER_AGENT,
};
pub use models::{CommitDetails, CommitRecord, RepositorySummary};
