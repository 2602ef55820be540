use rmcp::schemars;
use serde::Deserialize;

use crate::client::{GitHubClient, Method};
use crate::error::McpGithubError;
use crate::models::{Issue, IssueComment};
use crate::ops::{page_query, validate_repo};
use crate::validation::{require_non_empty, ValidationError};

const LIST_STATES: [&str; 3] = ["open", "closed", "all"];
const UPDATE_STATES: [&str; 2] = ["open", "closed"];
const SORTS: [&str; 3] = ["created", "updated", "comments"];
const DIRECTIONS: [&str; 2] = ["asc", "desc"];

fn validate_number(number: u64) -> Result<(), ValidationError> {
    if number == 0 {
        return Err(ValidationError::new(
            "issue number must be a positive integer",
        ));
    }
    Ok(())
}

/// Reject a non-empty value that is not one of `allowed`.
fn validate_choice(
    value: Option<&str>,
    field: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) if !allowed.contains(&v) => Err(ValidationError::new(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue title")]
    pub title: String,

    #[schemars(description = "Issue body (markdown)")]
    #[serde(default)]
    pub body: Option<String>,

    #[schemars(description = "Logins of users to assign")]
    #[serde(default)]
    pub assignees: Option<Vec<String>>,

    #[schemars(description = "Label names to add")]
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl CreateIssueParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        require_non_empty(&self.title, "title is required")
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct GetIssueParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue number")]
    pub number: u64,
}

impl GetIssueParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_number(self.number)
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ListIssuesParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Filter by state: open, closed or all (default: open)")]
    #[serde(default)]
    pub state: Option<String>,

    #[schemars(description = "Sort by: created, updated or comments (default: created)")]
    #[serde(default)]
    pub sort: Option<String>,

    #[schemars(description = "Sort direction: asc or desc (default: desc)")]
    #[serde(default)]
    pub direction: Option<String>,

    #[schemars(description = "Page number of the results to fetch (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,

    #[schemars(description = "Number of results per page (default: 30, max: 100)")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ListIssuesParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_choice(self.state.as_deref(), "state", &LIST_STATES)?;
        validate_choice(self.sort.as_deref(), "sort", &SORTS)?;
        validate_choice(self.direction.as_deref(), "direction", &DIRECTIONS)
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct UpdateIssueParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue number")]
    pub number: u64,

    #[schemars(description = "New title")]
    #[serde(default)]
    pub title: Option<String>,

    #[schemars(description = "New body (markdown)")]
    #[serde(default)]
    pub body: Option<String>,

    #[schemars(description = "New state: open or closed")]
    #[serde(default)]
    pub state: Option<String>,

    #[schemars(description = "Replacement assignee logins; an empty list clears them")]
    #[serde(default)]
    pub assignees: Option<Vec<String>>,

    #[schemars(description = "Replacement label names; an empty list clears them")]
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl UpdateIssueParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_number(self.number)?;
        validate_choice(self.state.as_deref(), "state", &UPDATE_STATES)
    }

    /// PATCH body. Empty strings are left out; lists are sent whenever they
    /// are present, even empty.
    fn body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        let text_fields = [
            ("title", &self.title),
            ("body", &self.body),
            ("state", &self.state),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                body.insert(key.to_string(), v.into());
            }
        }
        if let Some(ref assignees) = self.assignees {
            body.insert("assignees".to_string(), assignees.clone().into());
        }
        if let Some(ref labels) = self.labels {
            body.insert("labels".to_string(), labels.clone().into());
        }
        serde_json::Value::Object(body)
    }
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct AddIssueCommentParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue number")]
    pub number: u64,

    #[schemars(description = "Comment text (markdown)")]
    pub body: String,
}

impl AddIssueCommentParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_number(self.number)?;
        require_non_empty(&self.body, "comment body is required")
    }
}

fn issue_route(client: &GitHubClient, owner: &str, repo: &str, number: u64) -> String {
    client.route(&["repos", owner, repo, "issues", &number.to_string()], &[])
}

/// Open an issue.
pub async fn create_issue(
    client: &GitHubClient,
    params: &CreateIssueParams,
) -> Result<Issue, McpGithubError> {
    params.validate()?;

    let mut body = serde_json::json!({
        "title": params.title,
        "body": params.body.clone().unwrap_or_default(),
    });
    if let Some(assignees) = params.assignees.as_ref().filter(|a| !a.is_empty()) {
        body["assignees"] = assignees.clone().into();
    }
    if let Some(labels) = params.labels.as_ref().filter(|l| !l.is_empty()) {
        body["labels"] = labels.clone().into();
    }

    let route = client.route(&["repos", &params.owner, &params.repo, "issues"], &[]);
    let issue: Issue = client
        .call(Method::Post, &route, Some(&body), "issue")
        .await?;
    tracing::info!(
        owner = %params.owner,
        repo = %params.repo,
        number = issue.number,
        "Created issue"
    );
    Ok(issue)
}

/// Fetch one issue by number.
pub async fn get_issue(
    client: &GitHubClient,
    params: &GetIssueParams,
) -> Result<Issue, McpGithubError> {
    params.validate()?;
    let route = issue_route(client, &params.owner, &params.repo, params.number);
    client.call(Method::Get, &route, None, "issue").await
}

/// List issues (and pull requests) of a repository.
pub async fn list_issues(
    client: &GitHubClient,
    params: &ListIssuesParams,
) -> Result<Vec<Issue>, McpGithubError> {
    params.validate()?;

    let [page, per_page] = page_query(client, params.page, params.per_page);
    let route = client.route(
        &["repos", &params.owner, &params.repo, "issues"],
        &[
            ("state", params.state.clone()),
            ("sort", params.sort.clone()),
            ("direction", params.direction.clone()),
            page,
            per_page,
        ],
    );
    client.call(Method::Get, &route, None, "issue list").await
}

/// Edit an issue. Only the fields that are set are sent.
pub async fn update_issue(
    client: &GitHubClient,
    params: &UpdateIssueParams,
) -> Result<Issue, McpGithubError> {
    params.validate()?;

    let route = issue_route(client, &params.owner, &params.repo, params.number);
    let issue: Issue = client
        .call(Method::Patch, &route, Some(&params.body()), "issue")
        .await?;
    tracing::info!(
        owner = %params.owner,
        repo = %params.repo,
        number = issue.number,
        "Updated issue"
    );
    Ok(issue)
}

/// Comment on an issue.
pub async fn add_issue_comment(
    client: &GitHubClient,
    params: &AddIssueCommentParams,
) -> Result<IssueComment, McpGithubError> {
    params.validate()?;

    let body = serde_json::json!({ "body": params.body });
    let route = client.route(
        &[
            "repos",
            &params.owner,
            &params.repo,
            "issues",
            &params.number.to_string(),
            "comments",
        ],
        &[],
    );
    client
        .call(Method::Post, &route, Some(&body), "issue comment")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(number: u64) -> UpdateIssueParams {
        UpdateIssueParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            number,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_requires_title() {
        let params = CreateIssueParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            ..Default::default()
        };
        assert_eq!(params.validate().unwrap_err().to_string(), "title is required");
    }

    #[test]
    fn test_number_must_be_positive() {
        let params = GetIssueParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            number: 0,
        };
        assert!(params.validate().unwrap_err().to_string().contains("positive"));
        assert!(update(0).validate().is_err());
        assert!(update(7).validate().is_ok());
    }

    #[test]
    fn test_list_choices() {
        let mut params = ListIssuesParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            state: Some("all".to_string()),
            sort: Some("comments".to_string()),
            direction: Some("asc".to_string()),
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.state = Some("merged".to_string());
        assert_eq!(
            params.validate().unwrap_err().to_string(),
            "state must be one of: open, closed, all"
        );

        params.state = Some(String::new());
        params.sort = Some("popularity".to_string());
        assert!(params.validate().unwrap_err().to_string().starts_with("sort"));

        params.sort = None;
        params.direction = Some("up".to_string());
        assert!(params.validate().unwrap_err().to_string().starts_with("direction"));
    }

    #[test]
    fn test_update_rejects_all_state() {
        let mut params = update(1);
        params.state = Some("all".to_string());
        assert_eq!(
            params.validate().unwrap_err().to_string(),
            "state must be one of: open, closed"
        );
    }

    #[test]
    fn test_update_body_empty_lists_clear() {
        let mut params = update(1);
        params.title = Some("New title".to_string());
        params.body = Some(String::new());
        params.assignees = Some(vec![]);
        assert_eq!(params.body(), json!({"title": "New title", "assignees": []}));
    }

    #[test]
    fn test_update_body_omits_absent_fields() {
        let mut params = update(1);
        params.state = Some("closed".to_string());
        params.labels = Some(vec!["bug".to_string()]);
        assert_eq!(params.body(), json!({"state": "closed", "labels": ["bug"]}));
    }

    #[test]
    fn test_comment_requires_body() {
        let params = AddIssueCommentParams {
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            number: 3,
            body: " ".to_string(),
        };
        assert_eq!(params.validate().unwrap_err().to_string(), "comment body is required");
    }
}
