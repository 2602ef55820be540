use chrono::{DateTime, NaiveDate};
use rmcp::schemars;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::Commit;
use crate::ops::{page_query, validate_repo};
use crate::validation::{validate_branch_name, ValidationError};

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ListCommitsParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Branch to list commits from (default: the repository's default branch)")]
    #[serde(default)]
    pub branch: Option<String>,

    #[schemars(description = "Only commits touching this file path")]
    #[serde(default)]
    pub path: Option<String>,

    #[schemars(description = "Only commits after this time: 2024-01-01 or 2024-01-01T00:00:00Z")]
    #[serde(default)]
    pub since: Option<String>,

    #[schemars(description = "Only commits before this time: 2024-01-31 or 2024-01-31T23:59:59Z")]
    #[serde(default)]
    pub until: Option<String>,

    #[schemars(description = "Page number of the results to fetch (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,

    #[schemars(description = "Number of results per page (default: 30, max: 100)")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
fn validate_timestamp(value: Option<&str>, field: &str) -> Result<(), ValidationError> {
    let Some(v) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    if DateTime::parse_from_rfc3339(v).is_ok() || NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    Err(ValidationError::new(format!(
        "{field} must be an ISO 8601 date or timestamp, e.g. 2024-01-01 or 2024-01-01T00:00:00Z"
    )))
}

impl ListCommitsParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            validate_branch_name(branch)?;
        }
        validate_timestamp(self.since.as_deref(), "since")?;
        validate_timestamp(self.until.as_deref(), "until")
    }
}

/// List commits, newest first.
pub async fn list_commits(
    client: &GitHubClient,
    params: &ListCommitsParams,
) -> Result<Vec<Commit>, McpGithubError> {
    params.validate()?;

    let [page, per_page] = page_query(client, params.page, params.per_page);
    let route = client.route(
        &["repos", &params.owner, &params.repo, "commits"],
        &[
            ("sha", params.branch.clone()),
            ("path", params.path.clone()),
            ("since", params.since.clone()),
            ("until", params.until.clone()),
            page,
            per_page,
        ],
    );
    client.call(Method::Get, &route, None, "commit list").await
}
