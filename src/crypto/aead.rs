use super::{NONCE_LEN, SALT_LEN};
use crate::error::CryptoError;
use aes_gcm::{
    AesGcm, Nonce,
    aead::{Aead, KeyInit, consts::U16},
    aes::Aes256,
};
use getrandom::fill;
use zeroize::Zeroizing;

/// AES-256-GCM with a 128-bit nonce and the default 128-bit tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    fill(buf).map_err(|_| CryptoError::Encryption("OS random generator unavailable".into()))
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN], CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

fn cipher(key: &[u8]) -> Result<Aes256Gcm16, CryptoError> {
    Aes256Gcm16::new_from_slice(key)
        .map_err(|_| CryptoError::Encryption(format!("invalid key length {}", key.len())))
}

/// Encrypt plaintext under a fresh random nonce.
///
/// Returns `nonce || ciphertext || tag`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;

    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a `nonce || ciphertext || tag` blob.
///
/// Any tag mismatch yields [`CryptoError::Authentication`] and no plaintext.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if blob.len() < NONCE_LEN {
        return Err(CryptoError::MalformedBlob {
            len: blob.len(),
            min: NONCE_LEN,
        });
    }

    let cipher = cipher(key)?;
    let (nonce, payload) = blob.split_at(NONCE_LEN);

    let plaintext = cipher
        .decrypt(Nonce::<U16>::from_slice(nonce), payload)
        .map_err(|_| CryptoError::Authentication)?;
    Ok(Zeroizing::new(plaintext))
}
