//! HTTP client for the Wolt POS integration service.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::VenueConfig;
use crate::pos::error::PosApiError;
use crate::pos::types::{ItemsUpdate, MenuDocument, MenuJobResponse};

pub(crate) const API_BASE_URL: &str = "https://pos-integration-service.wolt.com";

pub struct PosClient {
    http: Client,
    base_url: String,
}

impl PosClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { http, base_url }
    }

    /// Submit the asynchronous menu retrieval job for a venue.
    ///
    /// The service answers 202 with the resource URL where the finished
    /// document will appear; any other status is a submission failure.
    pub async fn submit_menu_job(&self, venue: &VenueConfig) -> Result<String, PosApiError> {
        let url = format!("{}/v2/venues/{}/menu", self.base_url, venue.venue_id);
        let response = self
            .http
            .get(&url)
            .basic_auth(&venue.api_username, Some(&venue.api_password))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PosApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let job = response.json::<MenuJobResponse>().await?;
        job.resource_url
            .filter(|url| !url.is_empty())
            .ok_or(PosApiError::MissingResourceUrl)
    }

    /// Fetch the current state of a submitted menu job.
    ///
    /// The resource URL is pre-authorized, so no credentials are attached.
    pub async fn fetch_menu_document(&self, resource_url: &str) -> Result<MenuDocument, PosApiError> {
        let response = self.http.get(resource_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PosApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<MenuDocument>().await?)
    }

    /// Send the batch item update for a venue. 202 is the only success.
    pub async fn update_items(
        &self,
        venue: &VenueConfig,
        update: &ItemsUpdate,
    ) -> Result<(), PosApiError> {
        let url = format!("{}/venues/{}/items", self.base_url, venue.venue_id);
        let response = self
            .http
            .patch(&url)
            .basic_auth(&venue.api_username, Some(&venue.api_password))
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PosApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl Default for PosClient {
    fn default() -> Self {
        Self::new()
    }
}
