use base64::Engine;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{decode, GitHubClient, Method};
use crate::error::{McpGithubError, PushStep};
use crate::models::{Contents, FileCommit, FileContent, GitCommit, GitRef, GitTree};
use crate::ops::{path_segments, validate_repo};
use crate::validation::{require_non_empty, validate_branch_name, ValidationError};

/// Mode of a regular, non-executable file in a git tree.
const BLOB_MODE: &str = "100644";

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct GetFileContentsParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Path to the file or directory within the repository")]
    pub path: String,

    #[schemars(description = "Branch, tag or commit SHA (default: the repository's default branch)")]
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

impl GetFileContentsParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        require_non_empty(&self.path, "path is required")?;
        path_segments(&self.path)?;
        Ok(())
    }
}

/// Name and email recorded on a commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CommitterInfo {
    #[schemars(description = "Name of the author or committer")]
    pub name: String,

    #[schemars(description = "Email of the author or committer")]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateOrUpdateFileParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Path of the file within the repository")]
    pub path: String,

    #[schemars(description = "Commit message")]
    pub message: String,

    #[schemars(description = "New file content as plain text")]
    pub content: String,

    #[schemars(description = "Branch to commit to (default: the repository's default branch)")]
    #[serde(default)]
    pub branch: Option<String>,

    #[schemars(description = "Blob SHA of the file being replaced; looked up automatically when omitted")]
    #[serde(default)]
    pub sha: Option<String>,

    #[schemars(description = "Committer (default: the authenticated user)")]
    #[serde(default)]
    pub committer: Option<CommitterInfo>,

    #[schemars(description = "Author (default: the committer)")]
    #[serde(default)]
    pub author: Option<CommitterInfo>,
}

impl CreateOrUpdateFileParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        require_non_empty(&self.path, "path is required")?;
        path_segments(&self.path)?;
        require_non_empty(&self.message, "commit message is required")?;
        if self.content.is_empty() {
            return Err(ValidationError::new("content is required"));
        }
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            validate_branch_name(branch)?;
        }
        Ok(())
    }
}

/// One change in a multi-file commit.
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct PushFileEntry {
    #[schemars(description = "Path of the file within the repository")]
    pub path: String,

    #[schemars(description = "File content as plain text; required unless delete is true")]
    #[serde(default)]
    pub content: String,

    #[schemars(description = "Delete this file instead of writing it")]
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct PushFilesParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Branch to commit to")]
    pub branch: String,

    #[schemars(description = "Commit message")]
    pub message: String,

    #[schemars(description = "Files to create, update or delete in this commit")]
    pub files: Vec<PushFileEntry>,

    #[schemars(description = "Commit to build on (default: the current head of the branch)")]
    #[serde(default)]
    pub base_sha: Option<String>,
}

impl PushFilesParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_repo(&self.owner, &self.repo)?;
        validate_branch_name(&self.branch)?;
        require_non_empty(&self.message, "commit message is required")?;
        if self.files.is_empty() {
            return Err(ValidationError::new("at least one file is required"));
        }
        for (i, file) in self.files.iter().enumerate() {
            if file.path.trim().is_empty() {
                return Err(ValidationError::new(format!(
                    "path is required for file at index {i}"
                )));
            }
            path_segments(&file.path)?;
            if !file.delete && file.content.is_empty() {
                return Err(ValidationError::new(format!(
                    "content is required for non-deleted file at index {i}"
                )));
            }
        }
        Ok(())
    }
}

fn contents_route(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    path: &str,
    git_ref: Option<String>,
) -> Result<String, ValidationError> {
    let mut segments = vec!["repos", owner, repo, "contents"];
    segments.extend(path_segments(path)?);
    Ok(client.route(&segments, &[("ref", git_ref)]))
}

/// Replace base64 content with its text when it decodes to UTF-8. Binary
/// blobs keep their base64 form.
fn decode_file(mut file: FileContent) -> Result<FileContent, McpGithubError> {
    if file.encoding.as_deref() != Some("base64") {
        return Ok(file);
    }
    let Some(encoded) = file.content.as_deref() else {
        return Ok(file);
    };

    // GitHub wraps the payload at 60 columns.
    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
    if let Ok(text) = String::from_utf8(bytes) {
        file.content = Some(text);
        file.encoding = Some("utf-8".to_string());
    }
    Ok(file)
}

/// Read a file (decoded) or list a directory.
pub async fn get_file_contents(
    client: &GitHubClient,
    params: &GetFileContentsParams,
) -> Result<Contents, McpGithubError> {
    params.validate()?;

    let route = contents_route(
        client,
        &params.owner,
        &params.repo,
        &params.path,
        params.git_ref.clone(),
    )?;
    let value = client.send(Method::Get, &route, None).await?;

    match value {
        Value::Array(_) => Ok(Contents::Directory(decode(value, "directory listing")?)),
        Value::Object(_) => {
            let file: FileContent = decode(value, "file content")?;
            Ok(Contents::File(decode_file(file)?))
        }
        other => Err(McpGithubError::malformed(
            "file content",
            format!("expected an object or array, got {other}"),
        )),
    }
}

/// Create a file, or replace it when it already exists.
pub async fn create_or_update_file(
    client: &GitHubClient,
    params: &CreateOrUpdateFileParams,
) -> Result<FileCommit, McpGithubError> {
    params.validate()?;

    let sha = match params.sha.clone().filter(|s| !s.is_empty()) {
        Some(sha) => Some(sha),
        None => existing_sha(client, params).await?,
    };

    let mut body = serde_json::json!({
        "message": params.message,
        "content": base64::engine::general_purpose::STANDARD.encode(params.content.as_bytes()),
    });
    if let Some(branch) = params.branch.as_deref().filter(|b| !b.is_empty()) {
        body["branch"] = branch.into();
    }
    if let Some(sha) = sha {
        body["sha"] = sha.into();
    }
    if let Some(ref committer) = params.committer {
        body["committer"] = serde_json::to_value(committer)
            .map_err(|e| McpGithubError::malformed("committer", e))?;
    }
    if let Some(ref author) = params.author {
        body["author"] =
            serde_json::to_value(author).map_err(|e| McpGithubError::malformed("author", e))?;
    }

    let route = contents_route(client, &params.owner, &params.repo, &params.path, None)?;
    let result: FileCommit = client
        .call(Method::Put, &route, Some(&body), "file commit")
        .await?;
    tracing::info!(
        path = %params.path,
        commit = %result.commit.sha,
        "Wrote file"
    );
    Ok(result)
}

/// SHA of the file currently at `params.path`, or `None` when there is none.
async fn existing_sha(
    client: &GitHubClient,
    params: &CreateOrUpdateFileParams,
) -> Result<Option<String>, McpGithubError> {
    let route = contents_route(
        client,
        &params.owner,
        &params.repo,
        &params.path,
        params.branch.clone(),
    )?;
    match client.send(Method::Get, &route, None).await {
        Ok(value @ Value::Object(_)) => {
            let file: FileContent = decode(value, "file content")?;
            Ok(Some(file.sha))
        }
        Ok(_) => Ok(None),
        Err(e) if e.is_not_found() => {
            tracing::debug!(path = %params.path, "File does not exist yet, creating it");
            Ok(None)
        }
        Err(e) => Err(e.context("error checking for an existing file")),
    }
}

fn tree_entry(file: &PushFileEntry) -> Value {
    if file.delete {
        serde_json::json!({
            "path": file.path,
            "mode": BLOB_MODE,
            "type": "blob",
            "sha": Value::Null,
        })
    } else {
        serde_json::json!({
            "path": file.path,
            "mode": BLOB_MODE,
            "type": "blob",
            "content": file.content,
        })
    }
}

fn at(step: PushStep) -> impl FnOnce(McpGithubError) -> McpGithubError {
    move |source| McpGithubError::PushStep {
        step,
        source: Box::new(source),
    }
}

/// Commit several file writes and deletions at once through the git
/// database API.
///
/// Runs ref → commit → tree → commit → ref. The first failing step aborts
/// the rest; objects created by earlier steps are left in place.
pub async fn push_files(
    client: &GitHubClient,
    params: &PushFilesParams,
) -> Result<GitCommit, McpGithubError> {
    params.validate()?;
    let (owner, repo) = (params.owner.as_str(), params.repo.as_str());

    let mut ref_segments = vec!["repos", owner, repo, "git", "refs", "heads"];
    ref_segments.extend(path_segments(&params.branch)?);
    let ref_route = client.route(&ref_segments, &[]);

    let base_sha = match params.base_sha.as_deref().filter(|s| !s.is_empty()) {
        Some(sha) => sha.to_string(),
        None => {
            let head: GitRef = client
                .call(Method::Get, &ref_route, None, "git ref")
                .await
                .map_err(at(PushStep::GetBranchRef))?;
            head.object.sha
        }
    };
    tracing::info!(owner, repo, branch = %params.branch, base = %base_sha, "Pushing files");

    let route = client.route(&["repos", owner, repo, "git", "commits", &base_sha], &[]);
    let base: GitCommit = client
        .call(Method::Get, &route, None, "git commit")
        .await
        .map_err(at(PushStep::GetBaseCommit))?;

    let body = serde_json::json!({
        "base_tree": base.tree.sha,
        "tree": params.files.iter().map(tree_entry).collect::<Vec<_>>(),
    });
    let route = client.route(&["repos", owner, repo, "git", "trees"], &[]);
    let tree: GitTree = client
        .call(Method::Post, &route, Some(&body), "git tree")
        .await
        .map_err(at(PushStep::CreateTree))?;
    tracing::info!(tree = %tree.sha, "Created tree");

    let body = serde_json::json!({
        "message": params.message,
        "tree": tree.sha,
        "parents": [base_sha],
    });
    let route = client.route(&["repos", owner, repo, "git", "commits"], &[]);
    let commit: GitCommit = client
        .call(Method::Post, &route, Some(&body), "git commit")
        .await
        .map_err(at(PushStep::CreateCommit))?;
    tracing::info!(commit = %commit.sha, "Created commit");

    let body = serde_json::json!({ "sha": commit.sha });
    let _: GitRef = client
        .call(Method::Patch, &ref_route, Some(&body), "git ref")
        .await
        .map_err(at(PushStep::UpdateRef))?;

    tracing::info!(
        branch = %params.branch,
        commit = %commit.sha,
        files = params.files.len(),
        "Pushed files"
    );
    Ok(commit)
}
