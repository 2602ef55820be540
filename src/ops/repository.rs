use rmcp::schemars;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::{Repository, SearchResponse};
use crate::ops::search::run_search;
use crate::ops::validate_repo;
use crate::validation::{
    require_non_empty, validate_owner_name, validate_repository_name, ValidationError,
};

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRepositoriesParams {
    #[schemars(description = "Search query in GitHub search syntax, e.g. 'language:go stars:>100'")]
    pub query: String,

    #[schemars(description = "Page number of the results to fetch (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,

    #[schemars(description = "Number of results per page (default: 30, max: 100)")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl SearchRepositoriesParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.query, "query is required")
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateRepositoryParams {
    #[schemars(description = "Repository name: letters, numbers, hyphens, periods and underscores")]
    pub name: String,

    #[schemars(description = "Repository description")]
    #[serde(default)]
    pub description: Option<String>,

    #[schemars(description = "Whether the repository is private (default: false)")]
    #[serde(default)]
    pub private: Option<bool>,

    #[schemars(description = "Create an initial commit with a README")]
    #[serde(default)]
    pub auto_init: Option<bool>,
}

impl CreateRepositoryParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repository_name(&self.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ForkRepositoryParams {
    #[schemars(description = "Owner of the repository to fork")]
    pub owner: String,

    #[schemars(description = "Name of the repository to fork")]
    pub repo: String,

    #[schemars(description = "Organization to fork into (default: the authenticated user)")]
    #[serde(default)]
    pub organization: Option<String>,
}

impl ForkRepositoryParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        if let Some(org) = self.organization.as_deref().filter(|o| !o.is_empty()) {
            validate_owner_name(org)?;
        }
        Ok(())
    }
}

/// Search public repositories.
pub async fn search_repositories(
    client: &GitHubClient,
    params: &SearchRepositoriesParams,
) -> Result<SearchResponse<Repository>, McpGithubError> {
    params.validate()?;
    run_search(
        client,
        "repositories",
        &params.query,
        params.page,
        params.per_page,
    )
    .await
}

/// Create a repository owned by the authenticated user.
pub async fn create_repository(
    client: &GitHubClient,
    params: &CreateRepositoryParams,
) -> Result<Repository, McpGithubError> {
    params.validate()?;

    let mut body = serde_json::json!({ "name": params.name });
    if let Some(ref description) = params.description {
        body["description"] = description.clone().into();
    }
    if let Some(private) = params.private {
        body["private"] = private.into();
    }
    if let Some(auto_init) = params.auto_init {
        body["auto_init"] = auto_init.into();
    }

    let route = client.route(&["user", "repos"], &[]);
    let repo: Repository = client
        .call(Method::Post, &route, Some(&body), "repository")
        .await?;
    tracing::info!(repo = %repo.full_name, "Created repository");
    Ok(repo)
}

/// Fork a repository into the authenticated user's account or an organization.
pub async fn fork_repository(
    client: &GitHubClient,
    params: &ForkRepositoryParams,
) -> Result<Repository, McpGithubError> {
    params.validate()?;

    let route = client.route(
        &["repos", &params.owner, &params.repo, "forks"],
        &[("organization", params.organization.clone())],
    );
    let repo: Repository = client.call(Method::Post, &route, None, "repository").await?;
    tracing::info!(
        owner = %params.owner,
        repo = %params.repo,
        fork = %repo.full_name,
        "Forked repository"
    );
    Ok(repo)
}
