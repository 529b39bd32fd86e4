//! Reqwest-backed photo upload adapter.
//!
//! The upload API accepts one multipart request with `file` and `folder`
//! fields and answers `{"url": "..."}`. Transport and 5xx failures are
//! retried a bounded number of times with a short backoff; 4xx responses
//! fail immediately since a retry cannot change the outcome.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::{PhotoStore, PhotoStoreError};
use crate::domain::PhotoUpload;

const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    url: String,
}

/// Upload store adapter performing multipart POSTs against one endpoint.
pub struct UploadHttpStore {
    client: Client,
    endpoint: Url,
    max_attempts: u32,
}

impl UploadHttpStore {
    /// Build an adapter with the default timeout and retry budget.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_settings(endpoint, DEFAULT_UPLOAD_TIMEOUT, DEFAULT_MAX_ATTEMPTS)
    }

    /// Build an adapter with an explicit timeout and retry budget.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_settings(
        endpoint: Url,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            max_attempts: max_attempts.max(1),
        })
    }

    fn build_form(photo: &PhotoUpload, folder: &str) -> Result<multipart::Form, PhotoStoreError> {
        // Part is not Clone, so the form is rebuilt per attempt.
        let part = multipart::Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(|error| {
                PhotoStoreError::transport(format!("invalid photo content type: {error}"))
            })?;
        Ok(multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_owned()))
    }

    async fn attempt(
        &self,
        photo: &PhotoUpload,
        folder: &str,
    ) -> Result<String, PhotoStoreError> {
        let form = Self::build_form(photo, folder)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|error| PhotoStoreError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| PhotoStoreError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_upload_response(body.as_ref())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PhotoStoreError {
    let preview = String::from_utf8_lossy(body).chars().take(160).collect::<String>();
    PhotoStoreError::upstream_status(status.as_u16(), preview)
}

fn parse_upload_response(body: &[u8]) -> Result<String, PhotoStoreError> {
    let decoded: UploadResponseDto = serde_json::from_slice(body).map_err(|error| {
        PhotoStoreError::decode(format!("invalid upload JSON payload: {error}"))
    })?;
    if decoded.url.trim().is_empty() {
        return Err(PhotoStoreError::decode("upload response carried an empty url"));
    }
    Ok(decoded.url)
}

fn is_retryable(error: &PhotoStoreError) -> bool {
    match error {
        PhotoStoreError::Transport { .. } => true,
        PhotoStoreError::UpstreamStatus { status, .. } => *status >= 500,
        PhotoStoreError::Decode { .. } => false,
    }
}

#[async_trait]
impl PhotoStore for UploadHttpStore {
    async fn store(&self, photo: &PhotoUpload, folder: &str) -> Result<String, PhotoStoreError> {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.attempt(photo, folder).await {
                Ok(url) => return Ok(url),
                Err(error) => {
                    if !is_retryable(&error) {
                        return Err(error);
                    }
                    warn!(error = %error, attempt, "photo upload attempt failed");
                    last_error = Some(error);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    }
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| PhotoStoreError::transport("upload failed with no attempts")))
    }
}
