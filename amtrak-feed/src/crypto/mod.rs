//! Feed decryption.
//!
//! The map service protects its feeds with AES-128-CBC under keys derived by
//! PBKDF2-HMAC-SHA1. Each payload carries its own content key, encrypted under
//! the day's public key; see [`decrypt`] for the layout.

mod cipher;
mod envelope;
mod kdf;

pub use cipher::{IV_SIZE, Iv, decrypt_segment};
pub use envelope::{
    EphemeralKey, FIXED_TAIL_LENGTH, KEY_DELIMITER, Segments, decrypt, decrypt_content,
    recover_ephemeral_key,
};
pub use kdf::{DerivedKey, KEY_SIZE, PBKDF2_ITERATIONS, derive};
