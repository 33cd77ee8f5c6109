//! Top-level feed client.
//!
//! Composes parameter resolution, payload retrieval, decryption, and feature
//! extraction. Each call is an independent session: parameters are resolved
//! afresh unless the caller supplies them.

use serde_json::Value;
use tracing::info;

use crate::config::FeedConfig;
use crate::crypto;
use crate::error::FeedError;
use crate::features::{Properties, extract_features};
use crate::fetch::{Dataset, EncryptedPayload, FeedFetcher};
use crate::http::HttpClient;
use crate::params::{CryptoParameters, ParameterResolver};

/// Client for the encrypted train map feeds.
///
/// Cheap to clone; clones share one connection pool. Holds no mutable state,
/// so concurrent calls never share parameters or cipher state.
#[derive(Debug, Clone)]
pub struct FeedClient {
    resolver: ParameterResolver,
    fetcher: FeedFetcher,
}

impl FeedClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = HttpClient::new(config.timeout)?;

        Ok(Self {
            resolver: ParameterResolver::new(http.clone(), &config),
            fetcher: FeedFetcher::new(http, &config),
        })
    }

    /// Resolve the current session parameters.
    ///
    /// Callers that want to amortize the two parameter requests can hold on to
    /// the result and pass it to [`FeedClient::fetch_with`].
    pub async fn resolve_parameters(&self) -> Result<CryptoParameters, FeedError> {
        self.resolver.resolve().await
    }

    /// Fetch and decrypt a dataset, returning the whole GeoJSON document.
    ///
    /// Parameters and payload are fetched concurrently.
    pub async fn fetch_document(&self, dataset: Dataset) -> Result<Value, FeedError> {
        let (params, payload) =
            futures::try_join!(self.resolver.resolve(), self.fetcher.fetch(dataset))?;

        crypto::decrypt(payload.as_str(), &params)
    }

    /// Fetch and decrypt a dataset, returning each feature's properties.
    pub async fn fetch_dataset(&self, dataset: Dataset) -> Result<Vec<Properties>, FeedError> {
        let document = self.fetch_document(dataset).await?;
        features_of(document, dataset)
    }

    /// Fetch and decrypt a dataset using parameters the caller already holds.
    ///
    /// Makes a single request. If upstream has rotated its parameters this
    /// fails with `DecryptionFailed`; resolve again and retry.
    pub async fn fetch_with(
        &self,
        dataset: Dataset,
        params: &CryptoParameters,
    ) -> Result<Vec<Properties>, FeedError> {
        let payload = self.fetcher.fetch(dataset).await?;
        decode(&payload, dataset, params)
    }

    /// Live train properties.
    pub async fn trains(&self) -> Result<Vec<Properties>, FeedError> {
        self.fetch_dataset(Dataset::Trains).await
    }

    /// Station properties.
    pub async fn stations(&self) -> Result<Vec<Properties>, FeedError> {
        self.fetch_dataset(Dataset::Stations).await
    }
}

fn decode(
    payload: &EncryptedPayload,
    dataset: Dataset,
    params: &CryptoParameters,
) -> Result<Vec<Properties>, FeedError> {
    let document = crypto::decrypt(payload.as_str(), params)?;
    features_of(document, dataset)
}

fn features_of(document: Value, dataset: Dataset) -> Result<Vec<Properties>, FeedError> {
    let features = extract_features(document, dataset)?;
    info!(%dataset, features = features.len(), "decrypted feed");
    Ok(features)
}
