use std::sync::Arc;

use octocrab::service::middleware::retry::RetryConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, McpGithubError};
use crate::ops::path_segments;
use crate::validation::{validate_branch_name, validate_owner_name, validate_repository_name};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_RESULTS: u32 = 30;

/// GitHub API maximum page size.
const MAX_PER_PAGE: u32 = 100;

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
    pub max_results: u32,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

/// Authenticated handle on the GitHub REST API.
///
/// The token is bound at construction; every operation goes through the
/// client that carries it.
#[derive(Clone)]
pub struct GitHubClient {
    github: Arc<octocrab::Octocrab>,
    base: Url,
    max_results: u32,
}

impl GitHubClient {
    /// Build a client. Fails when the token is empty or the base URL is not
    /// an absolute http(s) URL. Requests are never retried.
    pub fn new(config: ClientConfig) -> Result<Self, McpGithubError> {
        if config.token.trim().is_empty() {
            return Err(McpGithubError::Config(
                "a GitHub personal access token is required".to_string(),
            ));
        }

        let base_url = config.base_url.trim_end_matches('/');
        let base = Url::parse(base_url).map_err(|e| {
            McpGithubError::Config(format!("invalid API URL '{}': {}", base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(McpGithubError::Config(format!(
                "API URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        let github = octocrab::OctocrabBuilder::new()
            .base_uri(base_url)
            .map_err(|e| McpGithubError::Config(format!("invalid API URL '{}': {}", base_url, e)))?
            .personal_token(config.token)
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| McpGithubError::Config(format!("failed to create GitHub client: {}", e)))?;

        Ok(Self {
            github: Arc::new(github),
            base,
            max_results: config.max_results,
        })
    }

    /// Page size to request: the caller's value or the configured default,
    /// capped at 100.
    pub fn per_page(&self, requested: Option<u32>) -> u32 {
        std::cmp::min(
            requested.filter(|n| *n > 0).unwrap_or(self.max_results),
            MAX_PER_PAGE,
        )
    }

    /// Build an API route from raw path segments and query pairs.
    ///
    /// Segments are percent-encoded individually; pairs whose value is
    /// `None` or empty are left out.
    pub(crate) fn route(&self, segments: &[&str], query: &[(&str, Option<String>)]) -> String {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }

        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v))
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// Empty bodies decode as `null` and non-JSON bodies as a JSON string.
    /// Non-success statuses become [`ApiError`].
    pub(crate) async fn send(
        &self,
        method: Method,
        route: &str,
        body: Option<&Value>,
    ) -> Result<Value, McpGithubError> {
        tracing::debug!(method = method.as_str(), route, "GitHub request");

        let response = match method {
            Method::Get => self.github._get(route).await?,
            Method::Post => self.github._post(route, body).await?,
            Method::Put => self.github._put(route, body).await?,
            Method::Patch => self.github._patch(route, body).await?,
        };

        let status = response.status();
        let reset_header = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = self.github.body_to_string(response).await?;
        let payload = parse_body(&text);

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), payload, reset_header.as_deref());
            tracing::warn!(
                method = method.as_str(),
                route,
                status = status.as_u16(),
                error = %err.message,
                "GitHub API returned an error"
            );
            return Err(err.into());
        }

        Ok(payload)
    }

    /// Send a request and decode the body into `T`, reporting a shape
    /// mismatch as [`McpGithubError::Malformed`] for `resource`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        route: &str,
        body: Option<&Value>,
        resource: &str,
    ) -> Result<T, McpGithubError> {
        let value = self.send(method, route, body).await?;
        decode(value, resource)
    }

    /// Whether `branch` exists in `owner/repo`. A 404 means it does not.
    pub async fn branch_exists(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<bool, McpGithubError> {
        validate_owner_name(owner)?;
        validate_repository_name(repo)?;
        validate_branch_name(branch)?;

        let mut segments = vec!["repos", owner, repo, "branches"];
        segments.extend(path_segments(branch)?);
        let route = self.route(&segments, &[]);
        self.exists(&route).await
    }

    /// Whether a user or organization login exists. A 404 means it does not.
    pub async fn user_exists(&self, login: &str) -> Result<bool, McpGithubError> {
        validate_owner_name(login)?;
        let route = self.route(&["users", login], &[]);
        self.exists(&route).await
    }

    async fn exists(&self, route: &str) -> Result<bool, McpGithubError> {
        match self.send(Method::Get, route, None).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, resource: &str) -> Result<T, McpGithubError> {
    serde_json::from_value(value).map_err(|e| McpGithubError::malformed(resource, e))
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Octocrab's service stack spawns onto the Tokio runtime, so anything
    // that builds a client has to run inside one.

    async fn make_client(max_results: u32) -> GitHubClient {
        GitHubClient::new(ClientConfig::new("test-token").with_max_results(max_results)).unwrap()
    }

    #[tokio::test]
    async fn test_new_requires_token() {
        let err = GitHubClient::new(ClientConfig::new("  ")).err().unwrap();
        assert!(matches!(err, McpGithubError::Config(_)));
        assert!(err.to_string().contains("token is required"));
    }

    #[tokio::test]
    async fn test_new_rejects_bad_base_url() {
        let err = GitHubClient::new(ClientConfig::new("t").with_base_url("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, McpGithubError::Config(_)));

        let err = GitHubClient::new(ClientConfig::new("t").with_base_url("ftp://example.com"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("http(s)"));
    }

    #[tokio::test]
    async fn test_per_page_default_and_cap() {
        let client = make_client(30).await;
        assert_eq!(client.per_page(None), 30);
        assert_eq!(client.per_page(Some(0)), 30);
        assert_eq!(client.per_page(Some(50)), 50);
        assert_eq!(client.per_page(Some(200)), 100);

        let client = make_client(500).await;
        assert_eq!(client.per_page(None), 100);
    }

    #[tokio::test]
    async fn test_route_encodes_segments() {
        let client = make_client(30).await;
        assert_eq!(
            client.route(&["repos", "octocat", "hello-world", "issues"], &[]),
            "/repos/octocat/hello-world/issues"
        );
        assert_eq!(
            client.route(&["repos", "o", "r", "contents", "docs", "my file.md"], &[]),
            "/repos/o/r/contents/docs/my%20file.md"
        );
        assert_eq!(
            client.route(&["repos", "o", "r", "contents", "a?b#c"], &[]),
            "/repos/o/r/contents/a%3Fb%23c"
        );
    }

    #[tokio::test]
    async fn test_route_query_skips_empty_values() {
        let client = make_client(30).await;
        let route = client.route(
            &["search", "repositories"],
            &[
                ("q", Some("language:rust stars:>100".to_string())),
                ("page", None),
                ("sort", Some(String::new())),
                ("per_page", Some("30".to_string())),
            ],
        );
        assert_eq!(
            route,
            "/search/repositories?q=language%3Arust+stars%3A%3E100&per_page=30"
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), serde_json::json!({"a": 1}));
        assert_eq!(parse_body("oops"), Value::String("oops".to_string()));
    }

    #[test]
    fn test_decode_reports_resource() {
        let err = decode::<crate::models::Branch>(serde_json::json!({"name": 1}), "branch")
            .unwrap_err();
        assert!(matches!(err, McpGithubError::Malformed { .. }));
        assert!(err.to_string().starts_with("unexpected branch response from GitHub"));
    }
}
