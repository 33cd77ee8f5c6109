//! Retrieval of the encrypted feeds.

use std::fmt;

use tracing::debug;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::http::HttpClient;

/// The encrypted datasets published by the map service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Live train positions
    Trains,
    /// Station list
    Stations,
}

impl Dataset {
    /// Endpoint serving this dataset.
    pub fn url<'a>(&self, config: &'a FeedConfig) -> &'a str {
        match self {
            Dataset::Trains => &config.trains_url,
            Dataset::Stations => &config.stations_url,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Trains => f.write_str("trains"),
            Dataset::Stations => f.write_str("stations"),
        }
    }
}

/// Response body of a feed endpoint, still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload(String);

impl EncryptedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Fetches encrypted payloads. One GET per call, body untouched.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    http: HttpClient,
    config: FeedConfig,
}

impl FeedFetcher {
    pub fn new(http: HttpClient, config: &FeedConfig) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    /// Fetch the payload for one of the known datasets.
    pub async fn fetch(&self, dataset: Dataset) -> Result<EncryptedPayload, FeedError> {
        let payload = self.fetch_url(dataset.url(&self.config)).await?;
        debug!(%dataset, bytes = payload.as_str().len(), "fetched encrypted payload");
        Ok(payload)
    }

    /// Fetch a payload from an arbitrary feed URL.
    pub async fn fetch_url(&self, url: &str) -> Result<EncryptedPayload, FeedError> {
        self.http.get_text(url).await.map(EncryptedPayload)
    }
}
