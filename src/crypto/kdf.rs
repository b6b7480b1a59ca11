use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KEY_LEN, SALT_LEN};
use crate::error::CryptoError;

/// A derived AES-256 key, wiped on drop.
pub type Key = Zeroizing<[u8; KEY_LEN]>;

/// Lowest iteration count accepted from user input.
pub const MIN_ITERATIONS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // PBKDF2-HMAC-SHA256 rounds
            iterations: 100_000,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32) -> anyhow::Result<Self> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.iterations < MIN_ITERATIONS {
            anyhow::bail!("pbkdf2 iterations must be >= {MIN_ITERATIONS}");
        }
        Ok(())
    }
}

/// Derive an encryption key from a password with PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same password, salt and iteration count always give
/// the same key. The salt must be exactly [`SALT_LEN`] bytes.
pub fn derive_key(password: &[u8], salt: &[u8], kdf: KdfParams) -> Result<Key, CryptoError> {
    if salt.len() != SALT_LEN {
        return Err(CryptoError::KeyDerivation(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    if kdf.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be non-zero".into(),
        ));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, kdf.iterations, &mut key[..]);

    Ok(key)
}
