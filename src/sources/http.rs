//! Required version fetched from an HTTP endpoint serving a JSON document

use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::config::{DEFAULT_REMOTE_VERSION_FIELD, FETCH_TIMEOUT_MS};
use crate::prompt::effects::RequiredVersionSource;
use crate::prompt::error::FetchError;

/// Reads the required version from a field of a remote JSON object.
///
/// A 404, a missing field or a `null` value means no version is configured.
pub struct HttpVersionSource {
    client: reqwest::Client,
    url: String,
    field: String,
}

impl HttpVersionSource {
    pub fn new(url: &str) -> Self {
        Self::with_field(url, DEFAULT_REMOTE_VERSION_FIELD)
    }

    pub fn with_field(url: &str, field: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("update-gate")
                .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
            field: field.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl RequiredVersionSource for HttpVersionSource {
    async fn fetch_required_version(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(String::new());
        }

        if !status.is_success() {
            warn!("Remote version endpoint returned status {}: {}", status, self.url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let document: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse remote version document: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        let Value::Object(fields) = document else {
            return Err(FetchError::InvalidResponse(
                "Expected a JSON object".to_string(),
            ));
        };

        match fields.get(&self.field) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(version)) => Ok(version.clone()),
            Some(other) => Err(FetchError::InvalidResponse(format!(
                "Field {} is not a string: {}",
                self.field, other
            ))),
        }
    }
}

/// Source returning a fixed version string
pub struct StaticVersionSource {
    version: String,
}

impl StaticVersionSource {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

#[async_trait::async_trait]
impl RequiredVersionSource for StaticVersionSource {
    async fn fetch_required_version(&self) -> Result<String, FetchError> {
        Ok(self.version.clone())
    }
}
