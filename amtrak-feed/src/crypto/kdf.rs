//! Key derivation: passphrase + hex salt → 128-bit AES key.
//!
//! The map service fixes PBKDF2-HMAC-SHA1 with 1000 iterations and a 16-byte
//! output. Changing any of these breaks interoperability with the live feed.

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroize;

use crate::error::FeedError;

/// Length of a derived AES-128 key.
pub const KEY_SIZE: usize = 16;

/// PBKDF2 iteration count used by the map service.
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// A derived AES-128 key.
///
/// Zeroized on drop. Not `Clone`: each decryption derives its own.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the AES key for `passphrase` under a hex-encoded salt.
///
/// Deterministic: the same inputs always give the same key.
pub fn derive(passphrase: &[u8], salt_hex: &str) -> Result<DerivedKey, FeedError> {
    let salt =
        hex::decode(salt_hex).map_err(|e| FeedError::InvalidSalt(format!("{salt_hex:?}: {e}")))?;

    Ok(derive_with_iterations(passphrase, &salt, PBKDF2_ITERATIONS))
}

fn derive_with_iterations(passphrase: &[u8], salt: &[u8], iterations: u32) -> DerivedKey {
    let mut bytes = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha1>(passphrase, salt, iterations, &mut bytes);
    DerivedKey { bytes }
}
