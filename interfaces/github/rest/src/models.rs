use serde::Deserialize;

/// URI template suffix GitHub appends to `commits_url`.
pub const COMMIT_SHA_PLACEHOLDER: &str = "{/sha}";

/// Entry of `GET /users/{username}/repos`, reduced to the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub commits_url: String,
}

impl RepositorySummary {
    /// Commit listing URL with no specific SHA targeted.
    pub fn commits_endpoint(&self) -> String {
        self.commits_url.replace(COMMIT_SHA_PLACEHOLDER, "")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commits_endpoint_drops_sha_placeholder() {
        let repo: RepositorySummary = serde_json::from_value(json!({
            "name": "hello-world",
            "description": null,
            "created_at": "2011-01-26T19:01:12Z",
            "updated_at": "2011-01-26T19:14:43Z",
            "commits_url": "https://api.github.com/repos/octocat/hello-world/commits{/sha}",
            "stargazers_count": 80
        }))
        .unwrap();

        assert_eq!(
            repo.commits_endpoint(),
            "https://api.github.com/repos/octocat/hello-world/commits"
        );
        assert!(repo.description.is_none());
    }

    #[test]
    fn commit_record_reads_nested_message() {
        let record: CommitRecord = serde_json::from_value(json!({
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "commit": { "message": "Fix all the bugs", "author": { "name": "Monalisa" } }
        }))
        .unwrap();

        assert_eq!(record.commit.message, "Fix all the bugs");
    }
}
