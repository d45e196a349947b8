use crate::model::NodeId;
use thiserror::Error;

/// A single uploaded file the backend (or the pre-flight check) refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file_name: String,
    pub reason: String,
}

/// Errors returned by every gateway call.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The request never reached the backend or no response came back.
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Backend responded with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Deleting a step was refused because it still has child steps.
    #[error("Step {id} still has child steps; remove the child steps first")]
    HasChildren { id: NodeId, message: String },

    /// One or more files were rejected individually; the rest of the submission is intact.
    #[error("{} file(s) rejected: {}", .0.len(), format_rejections(.0))]
    FileValidation(Vec<FileRejection>),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn format_rejections(rejections: &[FileRejection]) -> String {
    rejections
        .iter()
        .map(|r| format!("{} ({})", r.file_name, r.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl GatewayError {
    pub fn is_has_children(&self) -> bool {
        matches!(self, GatewayError::HasChildren { .. })
    }

    /// Per-file rejections, empty for every other kind of failure.
    pub fn file_rejections(&self) -> &[FileRejection] {
        match self {
            GatewayError::FileValidation(rejections) => rejections,
            _ => &[],
        }
    }

    /// HTTP status when the backend answered, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message to put in front of a user.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            GatewayError::HasChildren { .. } => {
                "This step still has child steps. Remove the child steps first.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Errors raised by the drag-and-drop reorder protocol before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("A reorder is already being saved")]
    Busy,

    #[error("Position {index} is out of bounds for a group of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Sibling group of node {0} was not found in the tree")]
    GroupNotFound(NodeId),
}

/// Errors resolving the gateway configuration at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is not set")]
    Missing(String),

    #[error("'{value}' is not a usable backend URL: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Environment variable '{var}' has an invalid value '{value}'")]
    InvalidValue { var: String, value: String },
}
