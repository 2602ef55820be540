use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::{CodeResult, Issue, SearchResponse, User};
use crate::ops::page_query;
use crate::validation::{require_non_empty, ValidationError};

/// Parameters shared by the code, issue and user searches.
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Search query in GitHub search syntax, e.g. 'language:rust repo:owner/name'")]
    pub query: String,

    #[schemars(description = "Page number of the results to fetch (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,

    #[schemars(description = "Number of results per page (default: 30, max: 100)")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.query, "query is required")
    }
}

/// Run a query against `/search/{scope}`.
pub(crate) async fn run_search<T: DeserializeOwned>(
    client: &GitHubClient,
    scope: &str,
    query: &str,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<SearchResponse<T>, McpGithubError> {
    require_non_empty(query, "query is required")?;

    let [page, per_page] = page_query(client, page, per_page);
    let route = client.route(
        &["search", scope],
        &[("q", Some(query.to_string())), page, per_page],
    );
    let resource = format!("{scope} search");
    client.call(Method::Get, &route, None, &resource).await
}

/// Search code across repositories.
pub async fn search_code(
    client: &GitHubClient,
    params: &SearchParams,
) -> Result<SearchResponse<CodeResult>, McpGithubError> {
    params.validate()?;
    run_search(client, "code", &params.query, params.page, params.per_page).await
}

/// Search issues and pull requests.
pub async fn search_issues(
    client: &GitHubClient,
    params: &SearchParams,
) -> Result<SearchResponse<Issue>, McpGithubError> {
    params.validate()?;
    run_search(client, "issues", &params.query, params.page, params.per_page).await
}

/// Search users and organizations.
pub async fn search_users(
    client: &GitHubClient,
    params: &SearchParams,
) -> Result<SearchResponse<User>, McpGithubError> {
    params.validate()?;
    run_search(client, "users", &params.query, params.page, params.per_page).await
}
