//! GitHub operations behind the MCP tools.
//!
//! Each operation validates its parameters locally, then issues one request
//! (or a short fixed sequence) through [`GitHubClient`](crate::client::GitHubClient).

pub mod branches;
pub mod commits;
pub mod files;
pub mod issues;
pub mod repository;
pub mod search;
pub mod tags;

use crate::client::GitHubClient;
use crate::validation::{validate_owner_name, validate_repository_name, ValidationError};

/// Validate the owner/repo pair every repository-scoped operation takes.
pub(crate) fn validate_repo(owner: &str, repo: &str) -> Result<(), ValidationError> {
    validate_owner_name(owner)?;
    validate_repository_name(repo)?;
    Ok(())
}

/// `page` / `per_page` query pairs. `per_page` is always sent, defaulted and
/// capped by the client.
pub(crate) fn page_query(
    client: &GitHubClient,
    page: Option<u32>,
    per_page: Option<u32>,
) -> [(&'static str, Option<String>); 2] {
    [
        ("page", page.filter(|p| *p > 0).map(|p| p.to_string())),
        ("per_page", Some(client.per_page(per_page).to_string())),
    ]
}

/// Split a repository path into route segments, ignoring stray slashes.
///
/// `.` and `..` are rejected: URL normalization would drop or resolve them
/// and the request would reach a different path.
pub(crate) fn path_segments(path: &str) -> Result<Vec<&str>, ValidationError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(ValidationError::new(format!(
            "path '{path}' cannot contain '.' or '..' segments"
        )));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_drops_stray_slashes() {
        assert_eq!(
            path_segments("/docs//guide/intro.md/").unwrap(),
            vec!["docs", "guide", "intro.md"]
        );
        assert_eq!(path_segments("feature/login").unwrap(), vec!["feature", "login"]);
    }

    #[test]
    fn test_path_segments_rejects_dot_segments() {
        let err = path_segments("docs/../secrets.txt").unwrap_err();
        assert!(err.to_string().contains("'..'"));
        assert!(path_segments("./README.md").is_err());
        assert!(path_segments("src/./lib.rs").is_err());
    }

    #[test]
    fn test_path_segments_allows_dotted_names() {
        assert_eq!(
            path_segments(".github/workflows/ci.yml").unwrap(),
            vec![".github", "workflows", "ci.yml"]
        );
        assert!(path_segments("notes/...md").is_ok());
    }
}
