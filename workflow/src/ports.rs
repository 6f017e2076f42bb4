use async_trait::async_trait;
use bytes::Bytes;
use shared::{HistoryEntry, PredictResponse};

use crate::error::ServiceError;

/// An image picked by the user (or re-fetched from the service), held in
/// memory until it is cleared or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// The remote classification backend.
///
/// Futures are `?Send`: the workflow runs on a single-threaded executor.
#[async_trait(?Send)]
pub trait PredictionService {
    async fn predict(
        &self,
        token: Option<&str>,
        image: &ImagePayload,
    ) -> Result<PredictResponse, ServiceError>;

    async fn history(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<HistoryEntry>, ServiceError>;

    /// Downloads a previously uploaded image from `url`.
    async fn fetch_image(&self, url: &str, file_name: &str) -> Result<ImagePayload, ServiceError>;
}

/// Read-only view of the credential the sign-in flow stored.
pub trait SessionStore {
    fn token(&self) -> Option<String>;

    /// User id decoded from the token's claims, without signature checks.
    /// Display-only; never an authorization decision.
    fn display_user_id(&self) -> Option<String> {
        self.token()
            .as_deref()
            .and_then(shared::display_user_id)
    }
}

/// Session backed by a fixed token, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl SessionStore for StaticSession {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
