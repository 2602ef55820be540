use anyhow::{Context, Result};
use clap::Parser;
use mcp_github_ops::client::{ClientConfig, GitHubClient, DEFAULT_API_URL};
use mcp_github_ops::server;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

const DEFAULT_TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
const FALLBACK_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// MCP server for GitHub: repositories, branches, files, issues, commits and search
#[derive(Parser)]
#[command(name = "mcp-github-ops", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_PERSONAL_ACCESS_TOKEN or GITHUB_TOKEN.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from this environment variable.
    /// Default: GITHUB_PERSONAL_ACCESS_TOKEN, then GITHUB_TOKEN
    #[arg(long = "token-env")]
    token_env: Option<String>,

    /// GitHub REST API base URL (for GitHub Enterprise or testing)
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Default results per page when a tool call does not set one (max 100)
    #[arg(long, default_value = "30")]
    max_results: u32,
}

fn read_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(t) if !t.trim().is_empty() => {
            tracing::info!(env = name, "Read GitHub token from environment variable");
            Some(t)
        }
        _ => None,
    }
}

/// --token > --token-env > GITHUB_PERSONAL_ACCESS_TOKEN > GITHUB_TOKEN
fn resolve_token(cli: &Cli) -> Option<String> {
    if let Some(ref t) = cli.token {
        return Some(t.clone());
    }
    match cli.token_env.as_deref() {
        Some(name) => read_env(name),
        None => read_env(DEFAULT_TOKEN_ENV).or_else(|| read_env(FALLBACK_TOKEN_ENV)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let token = resolve_token(&cli).with_context(|| {
        format!(
            "no GitHub token: pass --token or set {} (or {})",
            cli.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV),
            FALLBACK_TOKEN_ENV
        )
    })?;

    let config = ClientConfig::new(token)
        .with_base_url(cli.api_url.clone())
        .with_max_results(cli.max_results);
    let client = GitHubClient::new(config)?;

    tracing::info!(
        api_url = %cli.api_url,
        max_results = cli.max_results,
        "Starting mcp-github-ops server"
    );

    let service = server::McpGithubServer::new(client);
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
