//! Repository Host
//!
//! The remote operations the publish pipeline needs, behind a trait so the
//! pipeline can be driven against an in-memory host in tests.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64_ENGINE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::PublishConfig;
use crate::types::{BlogError, PublishAttemptError};

pub type HostResult<T> = std::result::Result<T, PublishAttemptError>;

/// Remote version-control host
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Human-readable repository identifier, e.g. `owner/repo`
    fn describe(&self) -> String;

    /// Create or overwrite `path`; `branch = None` targets the default branch.
    /// Returns a URL for the written file.
    async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        branch: Option<&str>,
    ) -> HostResult<String>;

    async fn default_branch(&self) -> HostResult<String>;

    /// Head commit of `branch`
    async fn branch_sha(&self, branch: &str) -> HostResult<String>;

    async fn create_branch(&self, name: &str, from_sha: &str) -> HostResult<()>;

    /// Returns the pull request URL
    async fn open_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> HostResult<String>;
}

/// Commit author identity
#[derive(Debug, Clone, Serialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// GitHub REST implementation
pub struct GitHubHost {
    /// Stored securely - never exposed in logs or debug output
    token: SecretString,
    api_base: String,
    owner: String,
    repo: String,
    committer: Committer,
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubHost")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("committer", &self.committer)
            .finish()
    }
}

impl GitHubHost {
    pub fn new(
        token: SecretString,
        config: &PublishConfig,
        timeout: Duration,
    ) -> crate::types::Result<Self> {
        if !config.has_repository() {
            return Err(BlogError::Config(
                "publish.owner and publish.repo must be set to publish remotely".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::constants::network::USER_AGENT)
            .build()
            .map_err(|e| BlogError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            committer: Committer {
                name: config.committer_name.clone(),
                email: config.committer_email.clone(),
            },
            client,
        })
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!("{}/repos/{}/{}{}", self.api_base, self.owner, self.repo, suffix)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Send and translate transport or non-2xx failures
    async fn send(&self, operation: &str, request: RequestBuilder) -> HostResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PublishAttemptError::new(operation, None, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(PublishAttemptError::new(
            operation,
            Some(status.as_u16()),
            format!("GitHub API error ({}): {}", status, body),
        ))
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> HostResult<T> {
        response.json().await.map_err(|e| {
            PublishAttemptError::new(operation, None, format!("invalid response body: {}", e))
        })
    }

    /// Blob sha of an existing file, so the write becomes an update
    async fn existing_sha(&self, path: &str, branch: Option<&str>) -> HostResult<Option<String>> {
        const OP: &str = "lookup file";

        let mut request = self.request(Method::GET, &self.repo_url(&format!("/contents/{}", path)));
        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublishAttemptError::new(OP, None, e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let file: ContentEntry = Self::decode(OP, response).await?;
                Ok(Some(file.sha))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(PublishAttemptError::new(OP, Some(status.as_u16()), body))
            }
        }
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    fn describe(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        branch: Option<&str>,
    ) -> HostResult<String> {
        let sha = self.existing_sha(path, branch).await?;
        debug!(path, ?branch, update = sha.is_some(), "Writing file");

        let body = PutFileRequest {
            message,
            content: B64_ENGINE.encode(content),
            committer: &self.committer,
            sha,
            branch,
        };

        let url = self.repo_url(&format!("/contents/{}", path));
        let response = self
            .send("write file", self.request(Method::PUT, &url).json(&body))
            .await?;
        let written: PutFileResponse = Self::decode("write file", response).await?;

        Ok(written
            .content
            .and_then(|c| c.html_url)
            .unwrap_or_else(|| {
                format!(
                    "https://github.com/{}/{}/blob/{}/{}",
                    self.owner,
                    self.repo,
                    branch.unwrap_or("HEAD"),
                    path
                )
            }))
    }

    async fn default_branch(&self) -> HostResult<String> {
        let response = self
            .send("read repository", self.request(Method::GET, &self.repo_url("")))
            .await?;
        let repo: RepositoryInfo = Self::decode("read repository", response).await?;
        Ok(repo.default_branch)
    }

    async fn branch_sha(&self, branch: &str) -> HostResult<String> {
        let url = self.repo_url(&format!("/git/ref/heads/{}", branch));
        let response = self.send("read branch", self.request(Method::GET, &url)).await?;
        let git_ref: GitRef = Self::decode("read branch", response).await?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> HostResult<()> {
        let body = CreateRefRequest {
            git_ref: format!("refs/heads/{}", name),
            sha: from_sha,
        };
        let url = self.repo_url("/git/refs");
        self.send("create branch", self.request(Method::POST, &url).json(&body))
            .await?;
        Ok(())
    }

    async fn open_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> HostResult<String> {
        let request = PullRequestRequest {
            title,
            head,
            base,
            body,
        };
        let url = self.repo_url("/pulls");
        let response = self
            .send("open pull request", self.request(Method::POST, &url).json(&request))
            .await?;
        let pull: PullRequestResponse = Self::decode("open pull request", response).await?;
        Ok(pull.html_url)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct PutFileRequest<'a> {
    message: &'a str,
    content: String,
    committer: &'a Committer,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutFileResponse {
    content: Option<ContentLink>,
}

#[derive(Debug, Deserialize)]
struct ContentLink {
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct PullRequestRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubServer;
    use serde_json::json;

    fn config(api_base: &str) -> PublishConfig {
        PublishConfig {
            owner: "acme".into(),
            repo: "site".into(),
            api_base: api_base.into(),
            ..PublishConfig::default()
        }
    }

    fn host_at(api_base: &str) -> GitHubHost {
        GitHubHost::new(
            SecretString::from("ghp_secret".to_string()),
            &config(api_base),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn host() -> GitHubHost {
        host_at("https://api.example.invalid/")
    }

    #[test]
    fn test_requires_repository() {
        let err = GitHubHost::new(
            SecretString::from("t".to_string()),
            &PublishConfig::default(),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::Config(_)));
    }

    #[test]
    fn test_urls() {
        let host = host();
        assert_eq!(host.describe(), "acme/site");
        assert_eq!(
            host.repo_url("/git/refs"),
            "https://api.example.invalid/repos/acme/site/git/refs"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", host());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ghp_secret"));
    }

    #[test]
    fn test_put_file_body() {
        let committer = Committer {
            name: "Bot".into(),
            email: "bot@example.com".into(),
        };
        let body = PutFileRequest {
            message: "Auto-generated: Hi",
            content: B64_ENGINE.encode("# Hi"),
            committer: &committer,
            sha: None,
            branch: Some("autoblog/hi"),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["content"], "IyBIaQ==");
        assert_eq!(value["branch"], "autoblog/hi");
        assert!(value.get("sha").is_none());
        assert_eq!(value["committer"], json!({"name": "Bot", "email": "bot@example.com"}));
    }

    #[test]
    fn test_create_ref_body() {
        let body = CreateRefRequest {
            git_ref: "refs/heads/autoblog/x".into(),
            sha: "abc123",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"ref": "refs/heads/autoblog/x", "sha": "abc123"})
        );
    }

    #[tokio::test]
    async fn test_put_file_updates_existing_blob() {
        let server = StubServer::start(vec![
            (200, r#"{"sha":"blob123","path":"blog/2025-06-01-hi.md"}"#),
            (
                200,
                r#"{"content":{"html_url":"https://github.com/acme/site/blob/main/blog/2025-06-01-hi.md"}}"#,
            ),
        ])
        .await;

        let url = host_at(&server.base_url)
            .put_file("blog/2025-06-01-hi.md", "# Hi", "Auto-generated: Hi", None)
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://github.com/acme/site/blob/main/blog/2025-06-01-hi.md"
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/repos/acme/site/contents/blog/2025-06-01-hi.md");
        assert_eq!(requests[1].method, "PUT");
        assert_eq!(requests[1].path, "/repos/acme/site/contents/blog/2025-06-01-hi.md");

        let sent = requests[1].json();
        assert_eq!(sent["sha"], "blob123");
        assert_eq!(sent["content"], "IyBIaQ==");
        assert_eq!(sent["message"], "Auto-generated: Hi");
        assert!(sent.get("branch").is_none());
    }

    #[tokio::test]
    async fn test_put_file_creates_new_file_on_branch() {
        let server = StubServer::start(vec![
            (404, r#"{"message":"Not Found"}"#),
            (201, r#"{"content":{}}"#),
        ])
        .await;

        let url = host_at(&server.base_url)
            .put_file("blog/x.md", "# X", "Auto-generated: X", Some("autoblog/x"))
            .await
            .unwrap();
        assert_eq!(url, "https://github.com/acme/site/blob/autoblog/x/blog/x.md");

        let requests = server.requests();
        assert_eq!(requests[0].path, "/repos/acme/site/contents/blog/x.md?ref=autoblog%2Fx");
        let sent = requests[1].json();
        assert!(sent.get("sha").is_none());
        assert_eq!(sent["branch"], "autoblog/x");
    }

    #[tokio::test]
    async fn test_rejected_write_is_classified() {
        let server = StubServer::start(vec![
            (404, r#"{"message":"Not Found"}"#),
            (409, r#"{"message":"is at 1a2b but expected 3c4d"}"#),
        ])
        .await;

        let err = host_at(&server.base_url)
            .put_file("blog/x.md", "# X", "m", None)
            .await
            .unwrap_err();
        assert_eq!(err.operation, "write file");
        assert_eq!(err.status, Some(409));
        assert_eq!(err.kind, crate::types::PublishFailureKind::Conflict);
        assert!(err.message.contains("expected 3c4d"));
    }

    #[tokio::test]
    async fn test_branch_and_pull_request_calls() {
        let server = StubServer::start(vec![
            (200, r#"{"default_branch":"trunk"}"#),
            (200, r#"{"ref":"refs/heads/trunk","object":{"sha":"abc123","type":"commit"}}"#),
            (201, r#"{"ref":"refs/heads/autoblog/x"}"#),
            (201, r#"{"html_url":"https://github.com/acme/site/pull/7","number":7}"#),
        ])
        .await;
        let host = host_at(&server.base_url);

        let base = host.default_branch().await.unwrap();
        assert_eq!(base, "trunk");
        assert_eq!(host.branch_sha(&base).await.unwrap(), "abc123");
        host.create_branch("autoblog/x", "abc123").await.unwrap();
        let pr = host
            .open_pull_request("X", "autoblog/x", &base, "body")
            .await
            .unwrap();
        assert_eq!(pr, "https://github.com/acme/site/pull/7");

        let requests = server.requests();
        assert_eq!(requests[1].path, "/repos/acme/site/git/ref/heads/trunk");
        assert_eq!(
            requests[2].json(),
            json!({"ref": "refs/heads/autoblog/x", "sha": "abc123"})
        );
        assert_eq!(requests[3].path, "/repos/acme/site/pulls");
        assert_eq!(requests[3].json()["head"], "autoblog/x");
        assert_eq!(requests[3].json()["base"], "trunk");
    }
}
