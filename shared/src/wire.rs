use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PredictionId;

/// Body of a successful `POST /predict/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub prediction_id: Option<PredictionId>,
    pub predicted_label: String,
    pub confidence_score: f64,
    #[serde(default)]
    pub disease_description: Option<String>,
    #[serde(default)]
    pub disease_treatment: Option<String>,
}

/// Error envelope returned by the prediction service: `{"detail": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Items(Vec<Value>),
    Other(Value),
}

impl ErrorBody {
    /// Extracts a user-facing message from a raw error body, if the service
    /// supplied one.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.detail?.message()
    }
}

impl ErrorDetail {
    pub fn message(&self) -> Option<String> {
        let message = match self {
            ErrorDetail::Text(text) => text.trim().to_string(),
            ErrorDetail::Items(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.as_str()),
                    other => other.get("msg").and_then(Value::as_str),
                })
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Other(_) => String::new(),
        };

        (!message.is_empty()).then_some(message)
    }
}
