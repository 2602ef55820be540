use rmcp::schemars;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::GitRef;
use crate::ops::{page_query, validate_repo};
use crate::validation::ValidationError;

const TAG_PREFIX: &str = "refs/tags/";

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ListTagsParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Only return tags whose name contains this text (case-insensitive)")]
    #[serde(default)]
    pub search: Option<String>,

    #[schemars(description = "Page number of the results to fetch (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,

    #[schemars(description = "Number of results per page (default: 30, max: 100)")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ListTagsParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)
    }
}

/// Tag names from a page of tag refs, filtered by `search`.
fn tag_names(refs: Vec<GitRef>, search: Option<&str>) -> Vec<String> {
    let needle = search
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    refs.into_iter()
        .map(|r| {
            r.git_ref
                .strip_prefix(TAG_PREFIX)
                .unwrap_or(&r.git_ref)
                .to_string()
        })
        .filter(|name| {
            needle
                .as_deref()
                .map_or(true, |n| name.to_lowercase().contains(n))
        })
        .collect()
}

/// List tag names of a repository.
///
/// The filter applies to the fetched page only.
pub async fn list_tags(
    client: &GitHubClient,
    params: &ListTagsParams,
) -> Result<Vec<String>, McpGithubError> {
    params.validate()?;

    let [page, per_page] = page_query(client, params.page, params.per_page);
    let route = client.route(
        &["repos", &params.owner, &params.repo, "git", "refs", "tags"],
        &[page, per_page],
    );
    let refs: Vec<GitRef> = client.call(Method::Get, &route, None, "tag list").await?;
    Ok(tag_names(refs, params.search.as_deref()))
}
