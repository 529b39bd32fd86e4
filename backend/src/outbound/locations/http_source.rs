//! Reqwest-backed location source adapter.
//!
//! This adapter owns transport details only: query-string construction,
//! timeout and HTTP error mapping, and JSON decoding into domain entries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::{CitiesDto, CountriesDto, LocationEntryDto, StatesDto};
use crate::domain::ports::{LocationSource, LocationSourceError};
use crate::domain::LocationEntry;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Location source adapter that performs GET requests against one endpoint.
pub struct LocationHttpSource {
    client: Client,
    endpoint: Url,
}

impl LocationHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    async fn fetch<D: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<D, LocationSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            LocationSourceError::decode(format!("invalid location JSON payload: {error}"))
        })
    }
}

fn into_entries(dtos: Vec<LocationEntryDto>) -> Vec<LocationEntry> {
    dtos.into_iter().map(LocationEntryDto::into_domain).collect()
}

#[async_trait]
impl LocationSource for LocationHttpSource {
    async fn list_countries(&self) -> Result<Vec<LocationEntry>, LocationSourceError> {
        let decoded: CountriesDto = self.fetch(&[]).await?;
        Ok(into_entries(decoded.countries))
    }

    async fn list_states(
        &self,
        country_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError> {
        let decoded: StatesDto = self.fetch(&[("countryId", country_id)]).await?;
        Ok(into_entries(decoded.states))
    }

    async fn list_cities(
        &self,
        country_id: &str,
        state_id: &str,
    ) -> Result<Vec<LocationEntry>, LocationSourceError> {
        let decoded: CitiesDto = self
            .fetch(&[("countryId", country_id), ("stateId", state_id)])
            .await?;
        Ok(into_entries(decoded.cities))
    }
}

fn map_transport_error(error: reqwest::Error) -> LocationSourceError {
    if error.is_timeout() {
        LocationSourceError::timeout(error.to_string())
    } else {
        LocationSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LocationSourceError {
    LocationSourceError::upstream_status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn status_errors_carry_code_and_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"upstream   exploded");
        match error {
            LocationSourceError::UpstreamStatus { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }
}
