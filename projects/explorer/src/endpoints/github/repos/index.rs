use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use futures::future::join_all;
use interfaces_github_rest::{
    CommitRecord, ErrorBody, FetchError, GithubClient, RepositorySummary, UpstreamResponse,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::endpoints::github::{not_found, server_error};

pub const SERVER_ERROR_MESSAGE: &str = "Server error fetching repos and commits";

/// Repositories taken from the head of upstream's listing.
pub const MAX_REPOSITORIES: usize = 5;
/// Commit messages kept per repository.
pub const MAX_COMMITS: usize = 5;

/// One repository's metadata together with its most recent commit messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedRepo {
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub commits: Vec<String>,
}

impl AggregatedRepo {
    fn new(repo: RepositorySummary, commits: Vec<String>) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            commits,
        }
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("ListRepositories: {source}")]
    ListRepositories {
        #[from]
        source: FetchError,
    },
    #[error("UpstreamErrorBody: {status} with non-JSON body: {source}")]
    UpstreamErrorBody {
        status: StatusCode,
        source: serde_json::Error,
    },
    #[error("RepositoryListNotArray: got {found}")]
    RepositoryListNotArray { found: &'static str },
    #[error("MalformedRepository: {source}")]
    MalformedRepository { source: serde_json::Error },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        server_error(SERVER_ERROR_MESSAGE, self.to_string())
    }
}

/// Axum handler: GET /api/github/{username}/repos
///
/// Only a failure of the initial listing reaches the caller; commit fetch
/// failures leave that repository with an empty `commits`.
pub async fn handler(
    Extension(github): Extension<GithubClient>,
    Path(username): Path<String>,
) -> Response {
    let listing = match github.fetch_user_repos(&username).await {
        Ok(UpstreamResponse::Success(listing)) => listing,
        Ok(UpstreamResponse::Failure {
            status,
            body: ErrorBody::Json(body),
        }) => return (status, Json(body)).into_response(),
        Ok(UpstreamResponse::Failure {
            status,
            body: ErrorBody::Raw { source, .. },
        }) => return HandlerError::UpstreamErrorBody { status, source }.into_response(),
        Err(FetchError::InvalidSegment { segment }) => return not_found(&segment),
        Err(source) => return HandlerError::ListRepositories { source }.into_response(),
    };

    match aggregate_repositories(&github, listing).await {
        Ok(repos) => (StatusCode::OK, Json(repos)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Fetches commits for the first `MAX_REPOSITORIES` entries of `listing`
/// concurrently and pairs them back up in listing order.
pub async fn aggregate_repositories(
    github: &GithubClient,
    listing: Value,
) -> Result<Vec<AggregatedRepo>, HandlerError> {
    let entries = match listing {
        Value::Array(entries) => entries,
        other => {
            return Err(HandlerError::RepositoryListNotArray {
                found: json_kind(&other),
            })
        }
    };

    let repositories = entries
        .into_iter()
        .take(MAX_REPOSITORIES)
        .map(serde_json::from_value::<RepositorySummary>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| HandlerError::MalformedRepository { source })?;

    debug!(count = repositories.len(), "fetching commits");

    let commits = join_all(
        repositories
            .iter()
            .map(|repo| fetch_commit_messages(github, repo)),
    )
    .await;

    Ok(repositories
        .into_iter()
        .zip(commits)
        .map(|(repo, commits)| AggregatedRepo::new(repo, commits))
        .collect())
}

async fn fetch_commit_messages(github: &GithubClient, repo: &RepositorySummary) -> Vec<String> {
    match github.fetch(repo.commits_endpoint()).await {
        Ok(UpstreamResponse::Success(body)) => commit_messages(body),
        Ok(UpstreamResponse::Failure { status, .. }) => {
            warn!(repo = %repo.name, %status, "commit listing failed, using no commits");
            Vec::new()
        }
        Err(err) => {
            warn!(repo = %repo.name, error = %err, "commit listing failed, using no commits");
            Vec::new()
        }
    }
}

/// Messages of the first `MAX_COMMITS` entries, in upstream order.
///
/// Anything other than an array yields no messages, as do entries without
/// a `commit.message` string.
pub fn commit_messages(body: Value) -> Vec<String> {
    let Value::Array(entries) = body else {
        return Vec::new();
    };

    entries
        .into_iter()
        .take(MAX_COMMITS)
        .filter_map(|entry| serde_json::from_value::<CommitRecord>(entry).ok())
        .map(|record| record.commit.message)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn commit(message: &str) -> Value {
        json!({ "sha": "abc", "commit": { "message": message } })
    }

    #[test]
    fn keeps_first_five_messages_in_order() {
        let body = Value::Array((0..8).map(|i| commit(&format!("change {i}"))).collect());

        assert_eq!(
            commit_messages(body),
            vec!["change 0", "change 1", "change 2", "change 3", "change 4"]
        );
    }

    #[test]
    fn fewer_than_five_commits_are_all_kept() {
        let body = json!([commit("first"), commit("second")]);
        assert_eq!(commit_messages(body), vec!["first", "second"]);
    }

    #[test]
    fn non_array_body_yields_no_messages() {
        assert!(commit_messages(json!({ "message": "Git Repository is empty." })).is_empty());
        assert!(commit_messages(Value::Null).is_empty());
    }

    #[test]
    fn entries_without_message_are_skipped() {
        let body = json!([commit("kept"), { "sha": "def" }, commit("also kept")]);
        assert_eq!(commit_messages(body), vec!["kept", "also kept"]);
    }

    #[test]
    fn aggregated_repo_serializes_null_description() {
        let repo = AggregatedRepo {
            name: "dotfiles".into(),
            description: None,
            created_at: Some("2020-01-01T00:00:00Z".into()),
            updated_at: Some("2021-01-01T00:00:00Z".into()),
            commits: vec!["init".into()],
        };

        assert_eq!(
            serde_json::to_value(&repo).unwrap(),
            json!({
                "name": "dotfiles",
                "description": null,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2021-01-01T00:00:00Z",
                "commits": ["init"]
            })
        );
    }

    #[test]
    fn describes_json_kinds() {
        assert_eq!(json_kind(&json!({})), "object");
        assert_eq!(json_kind(&json!("x")), "string");
    }
}
