//! Two-layer envelope decryption.
//!
//! A payload is `content_segment ++ key_segment`, both base64. The key
//! segment always occupies the last [`FIXED_TAIL_LENGTH`] characters and
//! decrypts (under the day's public key) to `ephemeral_key|...`. The content
//! segment decrypts under the ephemeral key to the GeoJSON document.
//!
//! The key segment must be decrypted first: the content key is not known
//! until it has been.

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::error::{FeedError, Layer};
use crate::params::CryptoParameters;

use super::cipher::{Iv, decrypt_segment};
use super::kdf::derive;

/// Length of the base64 key segment at the end of every payload.
pub const FIXED_TAIL_LENGTH: usize = 88;

/// Separates the ephemeral key from trailing metadata in the key segment.
pub const KEY_DELIMITER: char = '|';

/// Content key recovered from the key segment.
///
/// Zeroized on drop and redacted in `Debug`.
pub struct EphemeralKey(String);

impl EphemeralKey {
    /// Parse the decrypted key segment: everything before the first `|`.
    ///
    /// Fields after the delimiter are discarded. An empty key is an error.
    pub fn parse(plaintext: &str) -> Result<Self, FeedError> {
        let key = plaintext
            .split_once(KEY_DELIMITER)
            .map_or(plaintext, |(key, _)| key);

        if key.is_empty() {
            return Err(FeedError::MalformedPayload(
                "ephemeral key is empty".to_string(),
            ));
        }

        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for EphemeralKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for EphemeralKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EphemeralKey").field(&"[REDACTED]").finish()
    }
}

/// The two segments of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments<'a> {
    pub content: &'a str,
    pub key: &'a str,
}

impl<'a> Segments<'a> {
    /// Split `payload` at `len - FIXED_TAIL_LENGTH`.
    pub fn split(payload: &'a str) -> Result<Self, FeedError> {
        if payload.len() <= FIXED_TAIL_LENGTH {
            return Err(FeedError::MalformedPayload(format!(
                "payload is {} bytes, must be longer than {FIXED_TAIL_LENGTH}",
                payload.len()
            )));
        }

        let boundary = payload.len() - FIXED_TAIL_LENGTH;
        if !payload.is_char_boundary(boundary) {
            return Err(FeedError::MalformedPayload(
                "segment boundary splits a character".to_string(),
            ));
        }

        let (content, key) = payload.split_at(boundary);
        Ok(Self { content, key })
    }
}

/// Decrypt the key segment and extract the ephemeral key.
pub fn recover_ephemeral_key(
    key_segment: &str,
    params: &CryptoParameters,
) -> Result<EphemeralKey, FeedError> {
    let key = derive(params.public_key.as_bytes(), &params.salt)?;
    let iv = Iv::from_hex(&params.iv)?;

    let plaintext = decrypt_segment(key_segment, &key, &iv, Layer::Key)?;
    let fields = plaintext.split(KEY_DELIMITER).count();
    trace!(fields, "key segment decrypted");

    EphemeralKey::parse(&plaintext)
}

/// Decrypt the content segment with a recovered ephemeral key.
pub fn decrypt_content(
    content_segment: &str,
    ephemeral_key: &EphemeralKey,
    params: &CryptoParameters,
) -> Result<String, FeedError> {
    let key = derive(ephemeral_key.as_str().as_bytes(), &params.salt)?;
    let iv = Iv::from_hex(&params.iv)?;

    decrypt_segment(content_segment, &key, &iv, Layer::Content)
}

/// Decrypt a full payload and parse the result as JSON.
///
/// Layout: `base64(content) ++ base64(ephemeral_key|...)`, the second part
/// always [`FIXED_TAIL_LENGTH`] characters long.
pub fn decrypt(payload: &str, params: &CryptoParameters) -> Result<serde_json::Value, FeedError> {
    let segments = Segments::split(payload)?;
    debug!(
        content_len = segments.content.len(),
        key_len = segments.key.len(),
        "decrypting payload"
    );

    let ephemeral_key = recover_ephemeral_key(segments.key, params)?;
    let plaintext = decrypt_content(segments.content, &ephemeral_key, params)?;

    serde_json::from_str(&plaintext).map_err(|e| FeedError::JsonParse {
        message: e.to_string(),
    })
}
