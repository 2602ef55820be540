//! Serde mirrors of the GitHub REST resources returned by the tools.
//!
//! Only the fields worth surfacing are declared; anything else in the
//! upstream payload is ignored. Nullable fields are `Option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub site_admin: bool,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<u64>,
    pub public_gists: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pull: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub owner: User,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    pub url: String,
    pub clone_url: Option<String>,
    pub ssh_url: Option<String>,
    pub git_url: Option<String>,
    pub homepage: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    pub license: Option<License>,
    pub default_branch: Option<String>,
    pub permissions: Option<Permissions>,
    pub parent: Option<Box<Repository>>,
    pub source: Option<Box<Repository>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub protected: bool,
}

/// A file or directory entry from the contents API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub encoding: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub name: String,
    pub path: String,
    /// Present for files only; decoded to text when it is valid UTF-8.
    pub content: Option<String>,
    pub sha: String,
    pub url: Option<String>,
    pub git_url: Option<String>,
    pub html_url: Option<String>,
    pub download_url: Option<String>,
}

/// Result of reading a path: one file, or the entries of a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Contents {
    File(FileContent),
    Directory(Vec<FileContent>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub default: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub creator: Option<User>,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub closed_issues: u64,
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub due_on: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Marker present on issues that are really pull requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub diff_url: Option<String>,
    pub patch_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    pub number: u64,
    pub title: String,
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub state: String,
    #[serde(default)]
    pub locked: bool,
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub author_association: Option<String>,
    pub body: Option<String>,
    pub url: String,
    pub html_url: String,
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub node_id: String,
    pub url: String,
    pub html_url: String,
    pub body: Option<String>,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_association: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    pub reason: String,
    pub signature: Option<String>,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitData {
    pub author: Option<CommitAuthor>,
    pub committer: Option<CommitAuthor>,
    pub message: String,
    pub tree: CommitRef,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub comment_count: u64,
    pub verification: Option<Verification>,
}

/// A commit as listed by `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub node_id: String,
    pub commit: CommitData,
    pub url: String,
    pub html_url: Option<String>,
    pub author: Option<User>,
    pub committer: Option<User>,
    #[serde(default)]
    pub parents: Vec<CommitRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeResult {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub url: String,
    pub git_url: Option<String>,
    pub html_url: String,
    pub repository: Repository,
    #[serde(default)]
    pub score: f64,
}

/// Target of a git reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub url: String,
    pub object: GitObject,
}

/// A raw git commit object from the git database API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub url: String,
    pub html_url: Option<String>,
    pub author: Option<CommitAuthor>,
    pub committer: Option<CommitAuthor>,
    #[serde(default)]
    pub message: String,
    pub tree: CommitRef,
    #[serde(default)]
    pub parents: Vec<CommitRef>,
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitTree {
    pub sha: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub truncated: bool,
}

/// Response of a contents create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCommit {
    pub content: FileContent,
    pub commit: GitCommit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_ignores_unknown_fields_and_nulls() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 1,
            "number": 42,
            "title": "Broken build",
            "user": {"login": "octocat", "id": 1},
            "labels": [{"name": "bug", "color": "d73a4a"}],
            "state": "open",
            "assignee": null,
            "milestone": null,
            "comments": 3,
            "created_at": "2024-01-01T00:00:00Z",
            "closed_at": null,
            "body": null,
            "url": "https://api.github.com/repos/o/r/issues/42",
            "html_url": "https://github.com/o/r/issues/42",
            "reactions": {"total_count": 0}
        }))
        .unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.labels[0].name, "bug");
        assert!(issue.assignees.is_empty());
        assert!(issue.pull_request.is_none());
    }

    #[test]
    fn test_git_ref_field_names() {
        let r: GitRef = serde_json::from_value(json!({
            "ref": "refs/heads/main",
            "object": {"sha": "abc123", "type": "commit"}
        }))
        .unwrap();
        assert_eq!(r.git_ref, "refs/heads/main");
        assert_eq!(r.object.sha, "abc123");
        assert_eq!(r.object.object_type, "commit");
    }

    #[test]
    fn test_contents_serializes_untagged() {
        let entry = FileContent {
            content_type: "dir".to_string(),
            encoding: None,
            size: 0,
            name: "src".to_string(),
            path: "src".to_string(),
            content: None,
            sha: "def".to_string(),
            url: None,
            git_url: None,
            html_url: None,
            download_url: None,
        };
        let value = serde_json::to_value(Contents::Directory(vec![entry])).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["type"], "dir");
    }
}
