use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{ErrorBody, HistoryEntry, PredictResponse, guess_mime_type};

use crate::config::WorkflowConfig;
use crate::error::ServiceError;
use crate::ports::{ImagePayload, PredictionService};

/// [`PredictionService`] over HTTP.
#[derive(Clone)]
pub struct HttpPredictionService {
    client: Client,
    config: WorkflowConfig,
}

impl HttpPredictionService {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("Prediction service answered {}: {}", status, body);
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message: ErrorBody::message_from(&body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        token: Option<&str>,
        image: &ImagePayload,
    ) -> Result<PredictResponse, ServiceError> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|_| ServiceError::InvalidImage(image.mime_type.clone()))?;
        let form = Form::new().part(self.config.upload_field.clone(), part);

        let url = self.config.endpoint(&self.config.predict_path);
        log::debug!("POST {} ({} bytes)", url, image.bytes.len());

        let request = Self::authorize(self.client.post(&url), token).multipart(form);
        read_json(request.send().await?).await
    }

    async fn history(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<HistoryEntry>, ServiceError> {
        let url = self
            .config
            .endpoint(&format!("user/{}/history", urlencoding::encode(user_id)));
        log::debug!("GET {}", url);

        let request = Self::authorize(self.client.get(&url), token);
        read_json(request.send().await?).await
    }

    async fn fetch_image(&self, url: &str, file_name: &str) -> Result<ImagePayload, ServiceError> {
        log::debug!("GET {}", url);
        let response = ensure_success(self.client.get(url).send().await?).await?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| guess_mime_type(file_name).to_string());
        let bytes = response.bytes().await?;

        Ok(ImagePayload::new(file_name, mime_type, bytes))
    }
}
