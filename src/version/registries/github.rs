//! GitHub Tags API registry implementation

use crate::config::RepoId;
use crate::version::error::RegistryError;
use crate::version::registry::{MAX_TAGS_PER_REQUEST, TagSource};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default base URL for GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Response record from the GitHub Tags API
///
/// Only `name` is read; commit and tarball fields are ignored.
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Tag source backed by the GitHub REST API (`/repos/{owner}/{repo}/tags`)
pub struct GitHubTagRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubTagRegistry {
    /// Creates a new GitHubTagRegistry against `base_url`, authenticating with `token` if given
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("semver-match/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }
}

/// GitHub reports exhausted primary rate limits as 403 with a zero remaining count
fn is_rate_limited(status: reqwest::StatusCode, headers: &HeaderMap) -> bool {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    status == reqwest::StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait::async_trait]
impl TagSource for GitHubTagRegistry {
    async fn fetch_tags(&self, repo: &RepoId) -> Result<Vec<String>, RegistryError> {
        let url = format!(
            "{}/repos/{}/{}/tags?per_page={}",
            self.base_url, repo.owner, repo.name, MAX_TAGS_PER_REQUEST
        );
        debug!(%url, "Listing repository tags");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(repo.to_string()));
        }

        if is_rate_limited(status, response.headers()) {
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after(response.headers()),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RegistryError::Unauthorized(format!(
                "GitHub rejected the credential for {}",
                repo
            )));
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let tags: Vec<Tag> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub tags response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        debug!(repo = %repo, count = tags.len(), "Fetched tags");

        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn repo(owner: &str, name: &str) -> RepoId {
        RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_tags_returns_names_in_upstream_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "v0.2.0", "commit": {"sha": "c3d0be41ecbe669545ee3e94d31ed9a4bc91ee3c"}},
                    {"name": "v0.1.1", "commit": {"sha": "a1b2c3"}},
                    {"name": "v0.1.0", "commit": {"sha": "d4e5f6"}}
                ]"#,
            )
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["v0.2.0", "v0.1.1", "v0.1.0"]);
    }

    #[tokio::test]
    async fn fetch_tags_sends_bearer_token_when_configured() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer fake-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "v1.0.0"}]"#)
            .create_async()
            .await;

        let registry =
            GitHubTagRegistry::new(&server.url(), Some("fake-token".to_string())).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["v1.0.0"]);
    }

    #[tokio::test]
    async fn fetch_tags_omits_authorization_for_empty_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), Some(String::new())).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_tags_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/nonexistent/repo/tags")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("nonexistent", "repo")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(name)) if name == "nonexistent/repo"));
    }

    #[tokio::test]
    async fn fetch_tags_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_tags_returns_rate_limited_for_exhausted_403() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::RateLimited {
                retry_after_secs: None
            })
        ));
    }

    #[tokio::test]
    async fn fetch_tags_returns_unauthorized_for_401() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), Some("bad".to_string())).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn fetch_tags_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_tags_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/gotray/got/tags")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let registry = GitHubTagRegistry::new(&server.url(), None).unwrap();
        let result = registry.fetch_tags(&repo("gotray", "got")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
