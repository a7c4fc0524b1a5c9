//! Tool-call failures and their rendering.

use serde_json::{Value, json};
use thiserror::Error;

use crate::board::services::{BoardServiceError, ErrorKind};
use crate::story_sync::StorySyncError;

/// Failure of a single tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    /// A board operation failed.
    #[error(transparent)]
    Service(#[from] BoardServiceError),
    /// Story import failed.
    #[error(transparent)]
    StorySync(#[from] StorySyncError),
}

impl From<crate::board::domain::BoardDomainError> for ToolError {
    fn from(err: crate::board::domain::BoardDomainError) -> Self {
        Self::Service(err.into())
    }
}

impl ToolError {
    /// Classifies the failure for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArguments(_)
            | Self::StorySync(StorySyncError::Io { .. } | StorySyncError::Malformed { .. }) => {
                ErrorKind::InvalidArgument
            }
            Self::Service(err) | Self::StorySync(StorySyncError::Board(err)) => err.kind(),
        }
    }

    /// Renders the `{"error": {"code", "message"}}` payload.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "error": {
                "code": self.kind().as_str(),
                "message": self.to_string(),
            }
        })
    }
}
