pub const PREDICT_FALLBACK: &str = "Prediction failed. Try again.";
pub const HISTORY_FALLBACK: &str = "Could not load your detection history. Try again.";

/// Failure reported by a [`crate::PredictionService`] adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Service rejected the request ({status}): {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Unsupported image type `{0}`")]
    InvalidImage(String),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

/// User-facing failure recorded in workflow state. `Display` is the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("You are not identified. Please sign in to see your detections.")]
    IdentityMissing,
    #[error("{message}")]
    Service { message: String },
    #[error("{message}")]
    Transport { message: String },
    #[error("Re-detection failed: {reason}. Pick the image again to retry.")]
    ReDetect { reason: String },
}

impl WorkflowError {
    /// Keeps the service's own message when it sent one, otherwise falls
    /// back to `fallback`.
    pub fn from_service(err: ServiceError, fallback: &str) -> Self {
        match err {
            ServiceError::Rejected {
                message: Some(message),
                ..
            } => WorkflowError::Service { message },
            ServiceError::Rejected { message: None, .. } | ServiceError::Decode(_) => {
                WorkflowError::Service {
                    message: fallback.to_string(),
                }
            }
            ServiceError::InvalidImage(mime_type) => WorkflowError::Service {
                message: format!("This file type ({}) cannot be analyzed.", mime_type),
            },
            ServiceError::Transport(_) => WorkflowError::Transport {
                message: fallback.to_string(),
            },
        }
    }

    pub fn re_detect(reason: impl Into<String>) -> Self {
        WorkflowError::ReDetect {
            reason: reason.into(),
        }
    }
}
