//! Endpoint and timeout configuration.

use std::time::Duration;

/// Host serving the live map and its parameter documents.
pub const DEFAULT_BASE_URL: &str = "https://maps.amtrak.com";

const ROUTES_LIST_VERSIONED_PATH: &str = "/rttl/js/RoutesList.v.json";
const ROUTES_LIST_PATH: &str = "/rttl/js/RoutesList.json";
const TRAINS_PATH: &str = "/services/MapDataService/trains/getTrainsData";
const STATIONS_PATH: &str = "/services/MapDataService/stations/trainStations";

/// Default timeout applied to every upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the feed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Versioned routes list (`arr`, `s`, `v` arrays)
    pub routes_list_versioned_url: String,
    /// Unversioned routes list (entries with `ZoomLevel`)
    pub routes_list_url: String,
    /// Encrypted trains feed
    pub trains_url: String,
    /// Encrypted stations feed
    pub stations_url: String,
    /// Timeout for each HTTP request
    pub timeout: Duration,
}

impl FeedConfig {
    /// Create a config pointing at the production map service.
    pub fn new() -> Self {
        Self::for_base_url(DEFAULT_BASE_URL)
    }

    fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            routes_list_versioned_url: format!("{base}{ROUTES_LIST_VERSIONED_PATH}"),
            routes_list_url: format!("{base}{ROUTES_LIST_PATH}"),
            trains_url: format!("{base}{TRAINS_PATH}"),
            stations_url: format!("{base}{STATIONS_PATH}"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point all four endpoints at a different host (mirrors, local fixtures).
    ///
    /// Keeps the configured timeout.
    pub fn with_base_url(self, base_url: &str) -> Self {
        Self {
            timeout: self.timeout,
            ..Self::for_base_url(base_url)
        }
    }

    pub fn with_routes_list_versioned_url(mut self, url: impl Into<String>) -> Self {
        self.routes_list_versioned_url = url.into();
        self
    }

    pub fn with_routes_list_url(mut self, url: impl Into<String>) -> Self {
        self.routes_list_url = url.into();
        self
    }

    pub fn with_trains_url(mut self, url: impl Into<String>) -> Self {
        self.trains_url = url.into();
        self
    }

    pub fn with_stations_url(mut self, url: impl Into<String>) -> Self {
        self.stations_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}
