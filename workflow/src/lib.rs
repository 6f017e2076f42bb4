//! Client-side detection workflow for the CropGuard prediction service.

pub mod config;
pub mod error;
pub mod http;
pub mod ports;
mod workflow;

pub use config::{ConfigError, WorkflowConfig};
pub use error::{ServiceError, WorkflowError};
pub use http::HttpPredictionService;
pub use ports::{ImagePayload, PredictionService, SessionStore, StaticSession};
pub use workflow::{DetectionWorkflow, Outcome, Skip, WorkflowSnapshot};

pub use shared::{DetectionResult, HistoryEntry, LabelParts, Phase, PredictionId};
