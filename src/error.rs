use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rmcp::model::ErrorData;
use serde_json::Value;

use crate::validation::ValidationError;

const FALLBACK_MESSAGE: &str = "GitHub API error";

#[derive(Debug, thiserror::Error)]
pub enum McpGithubError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("unexpected {resource} response from GitHub: {detail}")]
    Malformed { resource: String, detail: String },

    #[error("error decoding base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub request failed: {0}")]
    Transport(#[from] octocrab::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<McpGithubError>,
    },

    #[error("error {step}: {source}")]
    PushStep {
        step: PushStep,
        #[source]
        source: Box<McpGithubError>,
    },
}

impl McpGithubError {
    pub fn malformed(resource: impl Into<String>, detail: impl fmt::Display) -> Self {
        McpGithubError::Malformed {
            resource: resource.into(),
            detail: detail.to_string(),
        }
    }

    /// Wrap this error with a description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        McpGithubError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The upstream API error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            McpGithubError::Api(e) => Some(e),
            McpGithubError::Context { source, .. } | McpGithubError::PushStep { source, .. } => {
                source.api_error()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error()
            .is_some_and(|e| matches!(e.kind, ApiErrorKind::NotFound))
    }

    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            McpGithubError::Validation(_) => ErrorData::invalid_params(self.to_string(), None),
            McpGithubError::Api(e) if matches!(e.kind, ApiErrorKind::Validation) => {
                ErrorData::invalid_params(self.to_string(), Some(e.response.clone()))
            }
            _ => ErrorData::internal_error(self.to_string(), None),
        }
    }
}

/// One step of the multi-file commit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStep {
    GetBranchRef,
    GetBaseCommit,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

impl fmt::Display for PushStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            PushStep::GetBranchRef => "getting branch reference",
            PushStep::GetBaseCommit => "getting commit",
            PushStep::CreateTree => "creating tree",
            PushStep::CreateCommit => "creating commit",
            PushStep::UpdateRef => "updating reference",
        };
        f.write_str(step)
    }
}

/// Classification of an upstream failure, keyed by HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    Authentication,
    Permission,
    NotFound,
    Conflict,
    Validation,
    RateLimited { reset_at: DateTime<Utc> },
    Other,
}

/// An error response returned by the GitHub API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: u16,
    pub message: String,
    /// Decoded error payload, `Null` when the body was empty.
    pub response: Value,
}

impl ApiError {
    /// Build an error from a non-success status and its decoded body.
    ///
    /// `reset_header` is the raw `x-ratelimit-reset` value (epoch seconds),
    /// consulted only for 429 responses whose payload has no `reset_at`.
    pub fn from_response(status: u16, response: Value, reset_header: Option<&str>) -> Self {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string();

        let kind = match status {
            401 => ApiErrorKind::Authentication,
            403 => ApiErrorKind::Permission,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            422 => ApiErrorKind::Validation,
            429 => ApiErrorKind::RateLimited {
                reset_at: rate_limit_reset(&response, reset_header),
            },
            _ => ApiErrorKind::Other,
        };

        Self {
            kind,
            status,
            message,
            response,
        }
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            ApiErrorKind::RateLimited { reset_at } => Some(reset_at),
            _ => None,
        }
    }
}

fn rate_limit_reset(response: &Value, reset_header: Option<&str>) -> DateTime<Utc> {
    let from_payload = response
        .get("reset_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));

    let from_header = || {
        reset_header
            .and_then(|h| h.trim().parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    };

    from_payload
        .or_else(from_header)
        .unwrap_or_else(|| Utc::now() + Duration::minutes(1))
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Authentication => write!(f, "Authentication Failed: {}", self.message),
            ApiErrorKind::Permission => write!(f, "Permission Denied: {}", self.message),
            ApiErrorKind::NotFound => write!(f, "Not Found: {}", self.message),
            ApiErrorKind::Conflict => write!(f, "Conflict: {}", self.message),
            ApiErrorKind::Validation => {
                write!(f, "Validation Error: {}", self.message)?;
                if !self.response.is_null() {
                    write!(f, "\nDetails: {}", self.response)?;
                }
                Ok(())
            }
            ApiErrorKind::RateLimited { reset_at } => write!(
                f,
                "Rate Limit Exceeded: {}\nResets at: {}",
                self.message,
                reset_at.to_rfc3339()
            ),
            ApiErrorKind::Other => write!(f, "GitHub API Error: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}
