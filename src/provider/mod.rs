//! Food search providers
//!
//! The matching core consumes one capability from its environment: a search
//! function mapping free text to food records. USDA FoodData Central is the
//! only implementation; the trait keeps tests and future providers cheap.

pub mod usda;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::FoodRecord;

/// Upstream search failure. The engine and tool layer propagate these
/// unchanged; retries happen inside the client, never above it.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("food search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("food search failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Capability: free text in, candidate food records out
#[async_trait]
pub trait FoodSearch: Send + Sync {
    /// Search the provider. `page_size` of None uses the client default.
    async fn search(
        &self,
        query: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<FoodRecord>, ProviderError>;
}

pub use usda::UsdaClient;
