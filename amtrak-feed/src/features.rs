//! GeoJSON feature extraction.
//!
//! The two feeds nest their feature collections differently:
//! - trains: `{ "features": [...] }`
//! - stations: `{ "StationsDataResponse": { "features": [...] } }`

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FeedError;
use crate::fetch::Dataset;

/// The `properties` object of one feature. Keys are feed-specific
/// (`TrainNum`, `RouteName`, `TrainState`, `StationName`, ...).
pub type Properties = Map<String, Value>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct StationsDocument {
    #[serde(rename = "StationsDataResponse")]
    stations_data_response: FeatureCollection,
}

/// Pull every feature's properties out of a decrypted document.
pub fn extract_features(document: Value, dataset: Dataset) -> Result<Vec<Properties>, FeedError> {
    let shape_error = |e: serde_json::Error| FeedError::ProtocolShape(format!("{dataset} feed: {e}"));

    let collection = match dataset {
        Dataset::Trains => serde_json::from_value::<FeatureCollection>(document).map_err(shape_error)?,
        Dataset::Stations => {
            serde_json::from_value::<StationsDocument>(document)
                .map_err(shape_error)?
                .stations_data_response
        }
    };

    Ok(collection
        .features
        .into_iter()
        .map(|feature| feature.properties)
        .collect())
}
