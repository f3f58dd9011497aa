use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideGenError {
    #[error("All models failed. Errors: {}", .0.join("; "))]
    AllModelsFailed(Vec<String>),

    #[error("Invalid JSON format received from AI: {0}")]
    InvalidModelJson(String),

    #[error("No content generated")]
    EmptyResponse,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Content shape mismatch: {kind} expects {expected}, got {actual}")]
    ShapeMismatch {
        kind: String,
        expected: String,
        actual: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SlideGenError>;

/// Coarse outcome class a caller branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Ok,
    Created,
    BadRequest,
    Forbidden,
    NotFound,
    InternalError,
}

impl ActionStatus {
    pub fn code(self) -> u16 {
        match self {
            ActionStatus::Ok => 200,
            ActionStatus::Created => 201,
            ActionStatus::BadRequest => 400,
            ActionStatus::Forbidden => 403,
            ActionStatus::NotFound => 404,
            ActionStatus::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ActionStatus::Ok | ActionStatus::Created)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl SlideGenError {
    pub fn status(&self) -> ActionStatus {
        match self {
            SlideGenError::EmptyResponse
            | SlideGenError::InvalidInput(_)
            | SlideGenError::ShapeMismatch { .. } => ActionStatus::BadRequest,
            SlideGenError::Forbidden(_) => ActionStatus::Forbidden,
            SlideGenError::NotFound(_) => ActionStatus::NotFound,
            SlideGenError::AllModelsFailed(_)
            | SlideGenError::InvalidModelJson(_)
            | SlideGenError::Serialization(_)
            | SlideGenError::Config(_)
            | SlideGenError::Io(_) => ActionStatus::InternalError,
        }
    }

    /// Whether presenting a "try again" affordance makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SlideGenError::AllModelsFailed(_)
                | SlideGenError::InvalidModelJson(_)
                | SlideGenError::EmptyResponse
        )
    }
}

/// Tagged envelope handed to a UI layer: status plus data or error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: ActionStatus::Ok,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: &SlideGenError) -> Self {
        Self {
            status: error.status(),
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T>> for ActionResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => ActionResponse::ok(data),
            Err(e) => ActionResponse::failed(&e),
        }
    }
}
