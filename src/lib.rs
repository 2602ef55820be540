//! MCP server that lets LLMs operate on GitHub: repositories, branches, files,
//! issues, commits, tags and search.
//!
//! Every operation validates its inputs locally before calling the REST API
//! through an explicitly authenticated [`client::GitHubClient`].

pub mod client;
pub mod error;
pub mod models;
pub mod ops;
pub mod server;
pub mod validation;
