use rmcp::schemars;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::Branch;
use crate::ops::{path_segments, validate_repo};
use crate::validation::{validate_branch_name, ValidationError};

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateBranchParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Name of the branch to create (git ref rules: no spaces, no '..', etc.)")]
    pub branch: String,

    #[schemars(description = "Existing branch the new branch starts from")]
    pub from_branch: String,
}

impl CreateBranchParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_branch_name(&self.branch)?;
        validate_branch_name(&self.from_branch)?;
        Ok(())
    }
}

async fn get_branch(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Result<Branch, McpGithubError> {
    let mut segments = vec!["repos", owner, repo, "branches"];
    segments.extend(path_segments(branch)?);
    let route = client.route(&segments, &[]);
    client.call(Method::Get, &route, None, "branch").await
}

/// Create `branch` pointing at the head commit of `from_branch`, then read it
/// back.
pub async fn create_branch(
    client: &GitHubClient,
    params: &CreateBranchParams,
) -> Result<Branch, McpGithubError> {
    params.validate()?;
    let (owner, repo) = (params.owner.as_str(), params.repo.as_str());

    let source = get_branch(client, owner, repo, &params.from_branch)
        .await
        .map_err(|e| e.context("error getting source branch"))?;

    let body = serde_json::json!({
        "ref": format!("refs/heads/{}", params.branch),
        "sha": source.commit.sha,
    });
    let route = client.route(&["repos", owner, repo, "git", "refs"], &[]);
    client
        .send(Method::Post, &route, Some(&body))
        .await
        .map_err(|e| e.context("error creating branch"))?;

    tracing::info!(
        owner,
        repo,
        branch = %params.branch,
        sha = %source.commit.sha,
        "Created branch"
    );

    get_branch(client, owner, repo, &params.branch)
        .await
        .map_err(|e| e.context("branch might have been created but verification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(branch: &str, from: &str) -> CreateBranchParams {
        CreateBranchParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            branch: branch.to_string(),
            from_branch: from.to_string(),
        }
    }

    #[test]
    fn test_valid_branch_params() {
        assert!(params("feature/login", "main").validate().is_ok());
    }

    #[test]
    fn test_invalid_new_branch() {
        let err = params("feature..x", "main").validate().unwrap_err();
        assert!(err.to_string().contains("'..'"));
        assert!(params("topic.lock", "main").validate().is_err());
    }

    #[test]
    fn test_invalid_source_branch() {
        let err = params("feature", "bad branch").validate().unwrap_err();
        assert!(err.to_string().contains("branch name"));
    }
}
