//! Shared salt layout, byte-compatible with files sealed by the original
//! deployment. The salt is not stored.
//!
//! ```text
//! NONCE (16) | CIPHERTEXT | TAG (16)
//! ```

use super::{SaltMode, SealedFile};
use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::CryptoError;

pub fn parse(data: &[u8], salt: &[u8; SALT_LEN]) -> Result<SealedFile, CryptoError> {
    if data.len() < NONCE_LEN {
        return Err(CryptoError::MalformedBlob {
            len: data.len(),
            min: NONCE_LEN,
        });
    }

    Ok(SealedFile::new(SaltMode::Shared(*salt), *salt, data.to_vec()))
}

pub fn serialize(file: &SealedFile) -> Vec<u8> {
    file.blob().to_vec()
}
