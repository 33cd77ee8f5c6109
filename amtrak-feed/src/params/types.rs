//! Parameter endpoint DTOs.
//!
//! These map directly to the two routes-list JSON documents. Unknown fields
//! are ignored; missing required fields fail deserialization and surface as
//! `ProtocolShape` errors.

use serde::Deserialize;

/// `RoutesList.v.json`: the arrays the day's parameters are picked from.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesListVersioned {
    /// Candidate public keys, indexed by the zoom-level sum.
    pub arr: Vec<String>,

    /// Salt candidates. The one used sits at index `len(s[0])`.
    pub s: Vec<String>,

    /// IV candidates. The one used sits at index `len(v[0])`.
    pub v: Vec<String>,
}

/// One entry of `RoutesList.json`.
///
/// Only the zoom level matters here; the rest of the route metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "ZoomLevel", default)]
    pub zoom_level: Option<i64>,
}

/// Parameters for one decryption session.
///
/// Recomputed per session since upstream rotates them. Callers that want to
/// reuse them across requests hold on to this value themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoParameters {
    /// Passphrase for the key segment
    pub public_key: String,
    /// Hex-encoded PBKDF2 salt
    pub salt: String,
    /// Hex-encoded AES IV
    pub iv: String,
}

impl CryptoParameters {
    pub fn new(
        public_key: impl Into<String>,
        salt: impl Into<String>,
        iv: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            salt: salt.into(),
            iv: iv.into(),
        }
    }
}
