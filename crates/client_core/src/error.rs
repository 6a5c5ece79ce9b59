use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures captured into controller state. None of these reach the view
/// layer as a returned error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{message}")]
    Network { code: Option<u16>, message: String },
    #[error("{reason}")]
    Upload { reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no session allowed to perform this action")]
    Authorization,
}

impl From<GatewayError> for ClientError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Network { code, message } => ClientError::Network { code, message },
            GatewayError::Upload { reason } => ClientError::Upload { reason },
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage key '{0}' is not a plain identifier")]
    InvalidKey(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
