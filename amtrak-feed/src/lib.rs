//! Client for the Amtrak live train map feed.
//!
//! The map service publishes train positions and stations as encrypted
//! payloads. This crate resolves the day's key material, fetches a payload,
//! peels its two layers of AES-CBC, and hands back the GeoJSON feature
//! properties.

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod features;
pub mod fetch;
pub mod http;
pub mod params;
pub mod summary;

#[cfg(test)]
mod testing;

pub use client::FeedClient;
pub use config::FeedConfig;
pub use error::{FeedError, Layer, Unavailable};
pub use features::Properties;
pub use fetch::Dataset;
pub use params::CryptoParameters;
