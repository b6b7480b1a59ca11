//! Per-file salt layout.
//!
//! ```text
//! SALT (16) | NONCE (16) | CIPHERTEXT | TAG (16)
//! ```

use super::{SaltMode, SealedFile};
use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::CryptoError;

const PREFIX_LEN: usize = SALT_LEN + NONCE_LEN;

pub fn parse(data: &[u8]) -> Result<SealedFile, CryptoError> {
    if data.len() < PREFIX_LEN {
        return Err(CryptoError::MalformedBlob {
            len: data.len(),
            min: PREFIX_LEN,
        });
    }

    let (salt, blob) = data.split_at(SALT_LEN);
    let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| CryptoError::MalformedBlob {
        len: data.len(),
        min: PREFIX_LEN,
    })?;

    Ok(SealedFile::new(SaltMode::Embedded, salt, blob.to_vec()))
}

pub fn serialize(file: &SealedFile) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SALT_LEN + file.blob().len());
    buf.extend_from_slice(file.salt());
    buf.extend_from_slice(file.blob());
    buf
}
