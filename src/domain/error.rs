//! Boundary error taxonomy and validation failure types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A single field-level problem found while checking a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    #[error("{field}: field is required")]
    Missing { field: String },
    #[error("{field}: {message}")]
    Shape { field: String, message: String },
}

impl FieldIssue {
    pub fn missing(field: impl Into<String>) -> Self {
        FieldIssue::Missing {
            field: field.into(),
        }
    }

    pub fn shape(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldIssue::Shape {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, path-qualified for nested entries.
    pub fn field(&self) -> &str {
        match self {
            FieldIssue::Missing { field } | FieldIssue::Shape { field, .. } => field,
        }
    }
}

/// Validation failure carrying every offending field, not just the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// True when `field` is among the offending fields.
    pub fn names_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field() == field)
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    let parts: Vec<String> = issues.iter().map(ToString::to_string).collect();
    parts.join("; ")
}

/// The closed set of failure classifications the boundary can emit.
///
/// Every failure condition leaving the boundary resolves to exactly one of
/// these kinds; there is no open-ended subclassing and no silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::BadRequest,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::ServerError,
    ];

    pub const fn status(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::ServerError => 500,
        }
    }

    pub const fn default_detail(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Not authenticated",
            ErrorKind::Forbidden => "The user doesn't have enough privileges",
            ErrorKind::NotFound => "Item not found",
            ErrorKind::ServerError => "Internal server error",
        }
    }
}

/// A classified boundary failure: one closed kind plus a human-readable detail.
///
/// The detail defaults per kind and may be overridden at the call site; an
/// empty or whitespace override falls back to the default so that no failure
/// ever leaves the boundary without a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct ApiError {
    kind: ErrorKind,
    detail: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            detail: kind.default_detail().to_string(),
        }
    }

    pub fn with_detail(kind: ErrorKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let trimmed = detail.trim();
        if trimmed.is_empty() {
            Self::new(kind)
        } else {
            Self {
                kind,
                detail: trimmed.to_string(),
            }
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::BadRequest, detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::with_detail(ErrorKind::NotFound, detail)
    }

    /// Unclassified internal conditions; never exposes implementation detail.
    pub fn internal() -> Self {
        Self::new(ErrorKind::ServerError)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn into_detail(self) -> String {
        self.detail
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::with_detail(ErrorKind::BadRequest, err.to_string())
    }
}

/// Wire shape of a failure response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wire shape of a rate-limited response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateLimitResponse {
    pub detail: String,
    pub retry_after: u64,
}
