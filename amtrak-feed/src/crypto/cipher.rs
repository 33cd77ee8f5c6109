//! AES-128-CBC decryption of a single base64 segment.

use aes::Aes128;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use cbc::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::error::{FeedError, Layer};

use super::kdf::DerivedKey;

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES block size, and so the IV length.
pub const IV_SIZE: usize = 16;

/// A decoded initialization vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; IV_SIZE]);

impl Iv {
    /// Decode a hex IV. Must be exactly 16 bytes.
    pub fn from_hex(iv_hex: &str) -> Result<Self, FeedError> {
        let bytes =
            hex::decode(iv_hex).map_err(|e| FeedError::InvalidIv(format!("{iv_hex:?}: {e}")))?;

        let len = bytes.len();
        let bytes: [u8; IV_SIZE] = bytes.try_into().map_err(|_| {
            FeedError::InvalidIv(format!("expected {IV_SIZE} bytes, got {len}"))
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }
}

/// Base64-decode `segment`, decrypt it, strip PKCS#7 padding, decode UTF-8.
///
/// A new cipher instance is built for every call.
pub fn decrypt_segment(
    segment: &str,
    key: &DerivedKey,
    iv: &Iv,
    layer: Layer,
) -> Result<String, FeedError> {
    let ciphertext = B64
        .decode(segment)
        .map_err(|e| FeedError::MalformedPayload(format!("{layer} segment is not base64: {e}")))?;

    let plaintext = Aes128CbcDec::new(&(*key.as_bytes()).into(), &(*iv.as_bytes()).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| FeedError::DecryptionFailed {
            layer,
            reason: "invalid padding",
        })?;

    String::from_utf8(plaintext).map_err(|_| FeedError::DecryptionFailed {
        layer,
        reason: "plaintext is not UTF-8",
    })
}
