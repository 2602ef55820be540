//! Syntactic rules for GitHub owner, repository and branch names.
//!
//! These checks run before any request is built, so a bad name never reaches
//! the network.

/// Longest login GitHub accepts for users and organizations.
pub const MAX_OWNER_LEN: usize = 39;

const BRANCH_FORBIDDEN: [char; 8] = ['~', '^', ':', '?', '*', '[', '\\', ']'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Validate a user or organization login.
pub fn validate_owner_name(owner: &str) -> Result<&str, ValidationError> {
    if owner.is_empty() {
        return Err(ValidationError::new("owner name cannot be empty"));
    }

    let allowed = owner
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-');
    let bounded = owner.starts_with(|c: char| c.is_ascii_alphanumeric())
        && owner.ends_with(|c: char| c.is_ascii_alphanumeric());

    if !allowed || !bounded || owner.contains("--") {
        // Single alphanumeric logins pass; this only catches a lone '-' or symbol.
        if owner.len() == 1 {
            return Err(ValidationError::new("owner name must be alphanumeric"));
        }
        return Err(ValidationError::new(format!(
            "owner name must start and end with a letter or number, can contain hyphens \
             (but not consecutive ones), and can be up to {MAX_OWNER_LEN} characters"
        )));
    }

    if owner.len() > MAX_OWNER_LEN {
        return Err(ValidationError::new(format!(
            "owner name is too long (max {MAX_OWNER_LEN} characters)"
        )));
    }

    Ok(owner)
}

/// Validate a repository name.
pub fn validate_repository_name(name: &str) -> Result<&str, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("repository name cannot be empty"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::new(
            "repository name can only contain letters, numbers, hyphens, periods, and underscores",
        ));
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(ValidationError::new(
            "repository name cannot start or end with a period",
        ));
    }

    Ok(name)
}

/// Validate a branch name against the subset of git ref rules GitHub enforces.
pub fn validate_branch_name(branch: &str) -> Result<&str, ValidationError> {
    if branch.is_empty() {
        return Err(ValidationError::new("branch name cannot be empty"));
    }
    if branch.contains("..") {
        return Err(ValidationError::new("branch name cannot contain '..'"));
    }
    if branch
        .chars()
        .any(|c| c.is_whitespace() || BRANCH_FORBIDDEN.contains(&c))
    {
        return Err(ValidationError::new(
            "branch name contains invalid characters",
        ));
    }
    if branch.starts_with('/') || branch.ends_with('/') {
        return Err(ValidationError::new(
            "branch name cannot start or end with '/'",
        ));
    }
    if branch.ends_with(".lock") {
        return Err(ValidationError::new("branch name cannot end with '.lock'"));
    }
    Ok(branch)
}

/// Reject empty or whitespace-only required text fields.
pub fn require_non_empty(value: &str, message: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(message));
    }
    Ok(())
}
