//! Resolution of the day's public key, salt, and IV.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::http::HttpClient;

use super::types::{CryptoParameters, RouteEntry, RoutesListVersioned};

/// Fetches the two routes-list documents and picks the session parameters.
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    http: HttpClient,
    routes_list_versioned_url: String,
    routes_list_url: String,
}

impl ParameterResolver {
    pub fn new(http: HttpClient, config: &FeedConfig) -> Self {
        Self {
            http,
            routes_list_versioned_url: config.routes_list_versioned_url.clone(),
            routes_list_url: config.routes_list_url.clone(),
        }
    }

    /// Fetch both documents and derive the parameters.
    ///
    /// Makes two GET requests on every call; nothing is cached.
    pub async fn resolve(&self) -> Result<CryptoParameters, FeedError> {
        let (versioned, routes) = futures::try_join!(
            self.fetch_document::<RoutesListVersioned>(&self.routes_list_versioned_url),
            self.fetch_document::<Vec<RouteEntry>>(&self.routes_list_url),
        )?;

        select_parameters(&versioned, &routes)
    }

    async fn fetch_document<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let value = self.http.get_json(url).await?;

        serde_json::from_value(value)
            .map_err(|e| FeedError::ProtocolShape(format!("{url}: {e}")))
    }
}

/// Sum of every route's zoom level, missing levels counting as zero.
///
/// This is the index into `arr` for the public key.
pub fn master_index(routes: &[RouteEntry]) -> Result<usize, FeedError> {
    let sum = routes
        .iter()
        .try_fold(0i64, |acc, route| acc.checked_add(route.zoom_level.unwrap_or(0)))
        .ok_or_else(|| FeedError::ProtocolShape("zoom level sum overflows".to_string()))?;

    usize::try_from(sum)
        .map_err(|_| FeedError::ProtocolShape(format!("zoom level sum {sum} is negative")))
}

/// Pick the public key, salt, and IV out of the versioned routes list.
pub fn select_parameters(
    versioned: &RoutesListVersioned,
    routes: &[RouteEntry],
) -> Result<CryptoParameters, FeedError> {
    let index = master_index(routes)?;
    let public_key = versioned.arr.get(index).ok_or_else(|| {
        FeedError::ProtocolShape(format!(
            "`arr` has {} entries, public key index {index} out of range",
            versioned.arr.len()
        ))
    })?;

    let salt = indirect(&versioned.s, "s")?;
    let iv = indirect(&versioned.v, "v")?;

    debug!(
        public_key_index = index,
        routes = routes.len(),
        "resolved crypto parameters"
    );

    Ok(CryptoParameters::new(public_key.as_str(), salt, iv))
}

/// `values[len(values[0])]`, with the length counted in characters.
fn indirect<'a>(values: &'a [String], field: &str) -> Result<&'a str, FeedError> {
    let first = values
        .first()
        .ok_or_else(|| FeedError::ProtocolShape(format!("`{field}` is empty")))?;

    let index = first.chars().count();
    values.get(index).map(String::as_str).ok_or_else(|| {
        FeedError::ProtocolShape(format!(
            "`{field}` has {} entries, index {index} out of range",
            values.len()
        ))
    })
}
