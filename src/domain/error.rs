//! Error records kept in the store and typed errors raised while converting
//! API responses.
//!
//! Failures of remote operations are data: reducers store them and the
//! rendering layer reads them back through selectors. Only response
//! conversion produces a real `Result::Err`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::request::{Operation, RequestInformation};

/// Raw and user-facing text of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub pretty_error: String,
    #[serde(default)]
    pub unauthorized: bool,
}

impl Failure {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        let error = error.into();
        let pretty_error = prettify_error(&error);
        Self {
            error,
            details,
            pretty_error,
            unauthorized: false,
        }
    }

    pub fn unauthorized(mut self) -> Self {
        self.unauthorized = true;
        self
    }
}

/// An id-scoped read failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub operation: Operation,
    pub id: String,
    #[serde(flatten)]
    pub failure: Failure,
}

impl FetchError {
    pub fn new(operation: Operation, id: impl Into<String>, failure: Failure) -> Self {
        Self {
            operation,
            id: id.into(),
            failure,
        }
    }
}

/// A failure to read a whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchCollectionError {
    pub operation: Operation,
    #[serde(flatten)]
    pub failure: Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateError {
    pub operation: Operation,
    /// Name or scope of the thing being created, when the form has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub failure: Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditError {
    pub operation: Operation,
    pub id: String,
    #[serde(flatten)]
    pub failure: Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteError {
    pub operation: Operation,
    pub id: String,
    #[serde(flatten)]
    pub failure: Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupError {
    #[serde(flatten)]
    pub failure: Failure,
}

/// Every failure record the store knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinardError {
    Fetch(FetchError),
    FetchCollection(FetchCollectionError),
    Create(CreateError),
    Edit(EditError),
    Delete(DeleteError),
    Signup(SignupError),
}

impl MinardError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Fetch(e) => e.operation,
            Self::FetchCollection(e) => e.operation,
            Self::Create(e) => e.operation,
            Self::Edit(e) => e.operation,
            Self::Delete(e) => e.operation,
            Self::Signup(_) => Operation::Signup,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Fetch(e) => Some(&e.id),
            Self::Edit(e) => Some(&e.id),
            Self::Delete(e) => Some(&e.id),
            Self::FetchCollection(_) | Self::Create(_) | Self::Signup(_) => None,
        }
    }

    pub fn failure(&self) -> &Failure {
        match self {
            Self::Fetch(e) => &e.failure,
            Self::FetchCollection(e) => &e.failure,
            Self::Create(e) => &e.failure,
            Self::Edit(e) => &e.failure,
            Self::Delete(e) => &e.failure,
            Self::Signup(e) => &e.failure,
        }
    }

    /// The request this failure completes.
    pub fn request(&self) -> RequestInformation {
        RequestInformation::new(self.operation(), self.id().map(str::to_string))
    }
}

static PRETTY_ERRORS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"Unexpected token",
            "The server returned an unexpected response.",
        ),
        (
            r"Failed to fetch|NetworkError|Network request failed",
            "Unable to connect to the server. Please check your network connection.",
        ),
        (
            r"(?i)\bunauthorized\b|\b401\b",
            "Your session has expired. Please log in again.",
        ),
        (r"(?i)\btimed? ?out\b", "The server took too long to respond."),
    ]
    .into_iter()
    .filter_map(|(pattern, message)| match Regex::new(pattern) {
        Ok(regex) => Some((regex, message)),
        Err(err) => {
            log::error!("Invalid error pattern {pattern}: {err}");
            None
        }
    })
    .collect()
});

/// Turns a raw error string into something fit to show a user.
///
/// Unrecognized errors are passed through unchanged.
pub fn prettify_error(raw: &str) -> String {
    PRETTY_ERRORS
        .iter()
        .find(|(regex, _)| regex.is_match(raw))
        .map(|(_, message)| (*message).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Errors raised while turning API responses into entities.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid deployment status: {0}")]
    InvalidDeploymentStatus(String),

    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),

    #[error("Unknown notification type: {0}")]
    UnknownNotificationType(String),

    #[error("Unexpected resource type: expected {expected}, found {found}")]
    UnexpectedResourceType { expected: String, found: String },

    #[error("Missing {field} on {kind} {id}")]
    MissingField {
        kind: String,
        id: String,
        field: &'static str,
    },

    #[error("Invalid attributes on {kind} {id}: {source}")]
    InvalidAttributes {
        kind: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid response document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prettify_known_errors() {
        assert_eq!(
            prettify_error("Unexpected token < in JSON at position 0"),
            "The server returned an unexpected response."
        );
        assert_eq!(
            prettify_error("TypeError: Failed to fetch"),
            "Unable to connect to the server. Please check your network connection."
        );
        assert_eq!(
            prettify_error("Request failed with status 401"),
            "Your session has expired. Please log in again."
        );
    }

    #[test]
    fn prettify_passes_through_unknown_errors() {
        assert_eq!(prettify_error("Project name taken"), "Project name taken");
    }

    #[test]
    fn error_request_carries_scope() {
        let err = MinardError::Delete(DeleteError {
            operation: Operation::DeleteProject,
            id: "7".into(),
            failure: Failure::new("boom", None),
        });
        assert_eq!(
            err.request(),
            RequestInformation::entity(Operation::DeleteProject, "7")
        );

        let err = MinardError::Signup(SignupError {
            failure: Failure::new("boom", None).unauthorized(),
        });
        assert_eq!(err.request(), RequestInformation::collection(Operation::Signup));
        assert!(err.failure().unauthorized);
    }
}
