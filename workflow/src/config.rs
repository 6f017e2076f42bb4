use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Failed to read env file: {0}")]
    EnvFile(#[from] dotenv::Error),
    #[error("Invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Config field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Where the prediction service lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub base_url: String,
    pub predict_path: String,
    /// Multipart field carrying the image.
    pub upload_field: String,
    /// Browser storage key the sign-in flow writes the bearer token under.
    pub token_key: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: "/predict/".to_string(),
            upload_field: "file".to_string(),
            token_key: "token".to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: WorkflowConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Defaults overridden by `CROPGUARD_*` variables. A `.env` found in the
    /// working directory or its parents fills in what the process lacks.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenv::dotenv_iter() {
            Ok(entries) => Self::from_env_entries(entries),
            Err(e) => {
                log::debug!("No .env loaded: {}", e);
                Self::from_lookup(|key| env::var(key).ok())
            }
        }
    }

    /// Like [`Self::from_env`] with an explicit env file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let entries = dotenv::from_path_iter(path.as_ref())?;
        Self::from_env_entries(entries)
    }

    // Process variables win over file entries, as with `dotenv::dotenv`.
    fn from_env_entries(
        entries: impl IntoIterator<Item = Result<(String, String), dotenv::Error>>,
    ) -> Result<Self, ConfigError> {
        let mut file = HashMap::new();
        for entry in entries {
            let (key, value) = entry?;
            file.insert(key, value);
        }
        Self::from_lookup(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup("CROPGUARD_API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(predict_path) = lookup("CROPGUARD_PREDICT_PATH") {
            config.predict_path = predict_path;
        }
        if let Some(upload_field) = lookup("CROPGUARD_UPLOAD_FIELD") {
            config.upload_field = upload_field;
        }
        if let Some(token_key) = lookup("CROPGUARD_TOKEN_KEY") {
            config.token_key = token_key;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        if self.predict_path.trim().is_empty() {
            return Err(ConfigError::Empty("predict_path"));
        }
        if self.upload_field.trim().is_empty() {
            return Err(ConfigError::Empty("upload_field"));
        }
        if self.token_key.trim().is_empty() {
            return Err(ConfigError::Empty("token_key"));
        }
        Ok(())
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
