//! USDA FoodData Central client
//!
//! Thin reqwest wrapper around the /foods/search endpoint with bounded
//! retries and linear backoff. A 404 means "no foods", not an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{FoodRecord, SearchResponse};

use super::{FoodSearch, ProviderError};

/// Backoff step between retry attempts
const BACKOFF_STEP: Duration = Duration::from_millis(300);

/// HTTP client for USDA FoodData Central search
#[derive(Debug, Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
    retries: u32,
}

impl UsdaClient {
    /// Build a client from settings
    pub fn new(settings: &Settings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.usda_timeout_s))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.usda_base_url.clone(),
            api_key: settings.usda_api_key.clone(),
            page_size: settings.usda_page_size,
            retries: settings.usda_retries,
        })
    }

    async fn search_once(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<Vec<FoodRecord>, reqwest::Error> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("query", query),
                ("api_key", self.api_key.as_str()),
                ("pageSize", page_size.to_string().as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body: SearchResponse = response.error_for_status()?.json().await?;
        Ok(body.foods)
    }
}

#[async_trait]
impl FoodSearch for UsdaClient {
    async fn search(
        &self,
        query: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<FoodRecord>, ProviderError> {
        let page_size = page_size.unwrap_or(self.page_size);
        let attempts = self.retries + 1;

        let mut last_error: reqwest::Error;
        let mut attempt = 0;
        loop {
            match self.search_once(query, page_size).await {
                Ok(foods) => {
                    debug!(query, count = foods.len(), "USDA search succeeded");
                    return Ok(foods);
                }
                Err(err) => {
                    warn!(
                        query,
                        attempt = attempt + 1,
                        attempts,
                        error = %err,
                        "USDA search attempt failed"
                    );
                    last_error = err;
                }
            }

            attempt += 1;
            if attempt >= attempts {
                break;
            }
            tokio::time::sleep(BACKOFF_STEP * attempt).await;
        }

        Err(ProviderError::RetriesExhausted {
            attempts,
            source: last_error,
        })
    }
}
