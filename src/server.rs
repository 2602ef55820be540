use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;

use crate::client::GitHubClient;
use crate::error::McpGithubError;
use crate::ops::branches::{self, CreateBranchParams};
use crate::ops::commits::{self, ListCommitsParams};
use crate::ops::files::{self, CreateOrUpdateFileParams, GetFileContentsParams, PushFilesParams};
use crate::ops::issues::{
    self, AddIssueCommentParams, CreateIssueParams, GetIssueParams, ListIssuesParams,
    UpdateIssueParams,
};
use crate::ops::repository::{
    self, CreateRepositoryParams, ForkRepositoryParams, SearchRepositoriesParams,
};
use crate::ops::search::{self, SearchParams};
use crate::ops::tags::{self, ListTagsParams};

#[derive(Clone)]
pub struct McpGithubServer {
    client: GitHubClient,
    tool_router: ToolRouter<Self>,
}

impl McpGithubServer {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Render an operation's result as pretty JSON tool output.
    fn respond<T: Serialize>(
        &self,
        result: Result<T, McpGithubError>,
    ) -> Result<CallToolResult, ErrorData> {
        let value = result.map_err(|e| e.to_mcp_error())?;
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| ErrorData::internal_error(format!("failed to encode result: {e}"), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// -- MCP tool handlers (thin wrappers over crate::ops) --

#[tool_router]
impl McpGithubServer {
    #[tool(
        name = "search_repositories",
        description = "Search GitHub repositories using GitHub search syntax"
    )]
    async fn search_repositories(
        &self,
        Parameters(params): Parameters<SearchRepositoriesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(repository::search_repositories(&self.client, &params).await)
    }

    #[tool(
        name = "create_repository",
        description = "Create a new repository in the authenticated user's account"
    )]
    async fn create_repository(
        &self,
        Parameters(params): Parameters<CreateRepositoryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(repository::create_repository(&self.client, &params).await)
    }

    #[tool(
        name = "fork_repository",
        description = "Fork a repository into the authenticated user's account or an organization"
    )]
    async fn fork_repository(
        &self,
        Parameters(params): Parameters<ForkRepositoryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(repository::fork_repository(&self.client, &params).await)
    }

    #[tool(
        name = "create_branch",
        description = "Create a new branch from the head of an existing branch"
    )]
    async fn create_branch(
        &self,
        Parameters(params): Parameters<CreateBranchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(branches::create_branch(&self.client, &params).await)
    }

    #[tool(
        name = "get_file_contents",
        description = "Get the contents of a file (decoded to text when possible) or list a directory"
    )]
    async fn get_file_contents(
        &self,
        Parameters(params): Parameters<GetFileContentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(files::get_file_contents(&self.client, &params).await)
    }

    #[tool(
        name = "create_or_update_file",
        description = "Create a file or replace an existing one with a single commit"
    )]
    async fn create_or_update_file(
        &self,
        Parameters(params): Parameters<CreateOrUpdateFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(files::create_or_update_file(&self.client, &params).await)
    }

    #[tool(
        name = "push_files",
        description = "Write and delete several files in one commit on a branch"
    )]
    async fn push_files(
        &self,
        Parameters(params): Parameters<PushFilesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(files::push_files(&self.client, &params).await)
    }

    #[tool(name = "create_issue", description = "Open a new issue in a repository")]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(issues::create_issue(&self.client, &params).await)
    }

    #[tool(name = "get_issue", description = "Get a single issue by number")]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(issues::get_issue(&self.client, &params).await)
    }

    #[tool(
        name = "list_issues",
        description = "List issues in a repository, filtered by state and sorted"
    )]
    async fn list_issues(
        &self,
        Parameters(params): Parameters<ListIssuesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(issues::list_issues(&self.client, &params).await)
    }

    #[tool(
        name = "update_issue",
        description = "Update an issue's title, body, state, assignees or labels"
    )]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<UpdateIssueParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(issues::update_issue(&self.client, &params).await)
    }

    #[tool(name = "add_issue_comment", description = "Add a comment to an issue")]
    async fn add_issue_comment(
        &self,
        Parameters(params): Parameters<AddIssueCommentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(issues::add_issue_comment(&self.client, &params).await)
    }

    #[tool(
        name = "list_commits",
        description = "List commits of a branch, optionally limited to a path or time range"
    )]
    async fn list_commits(
        &self,
        Parameters(params): Parameters<ListCommitsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(commits::list_commits(&self.client, &params).await)
    }

    #[tool(
        name = "list_tags",
        description = "List tag names of a repository, optionally filtered by a search string"
    )]
    async fn list_tags(
        &self,
        Parameters(params): Parameters<ListTagsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(tags::list_tags(&self.client, &params).await)
    }

    #[tool(name = "search_code", description = "Search code across GitHub repositories")]
    async fn search_code(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(search::search_code(&self.client, &params).await)
    }

    #[tool(
        name = "search_issues",
        description = "Search issues and pull requests across GitHub repositories"
    )]
    async fn search_issues(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(search::search_issues(&self.client, &params).await)
    }

    #[tool(name = "search_users", description = "Search GitHub users and organizations")]
    async fn search_users(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.respond(search::search_users(&self.client, &params).await)
    }
}

#[tool_handler]
impl ServerHandler for McpGithubServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-github-ops".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub server. Use search_repositories, create_repository and fork_repository \
                 for repositories, create_branch for branches, get_file_contents, \
                 create_or_update_file and push_files for files, create_issue, get_issue, \
                 list_issues, update_issue and add_issue_comment for issues, list_commits \
                 and list_tags for history, and search_code, search_issues and search_users \
                 to search GitHub."
                    .to_string(),
            ),
        }
    }
}
