pub mod config;
mod crypto;
mod error;
pub mod format;
mod storage;

pub use crate::config::{Config, Settings};
pub use crate::crypto::{
    KEY_LEN, KdfParams, Key, NONCE_LEN, SALT_LEN, TAG_LEN, decrypt, derive_key, encrypt,
    generate_salt,
};
pub use crate::error::CryptoError;
pub use crate::format::{Layout, SaltMode, SealedFile};
pub use crate::storage::Storage;

use tracing::debug;
use zeroize::Zeroizing;

/// Password-based sealing of whole files held in memory.
///
/// A `Sealer` only holds its immutable [`Config`]; every call derives its own
/// key and draws its own nonce, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sealer {
    config: Config,
}

impl Sealer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encrypts `plaintext` under a key derived from `password`.
    ///
    /// With [`SaltMode::Embedded`] a fresh salt is generated and written in
    /// front of the blob; with [`SaltMode::Shared`] the output is the bare
    /// `nonce || ciphertext || tag` blob.
    pub fn seal(&self, password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mode = self.config.salt_mode();
        let salt = match mode {
            SaltMode::Embedded => generate_salt()?,
            SaltMode::Shared(salt) => salt,
        };

        let key = derive_key(password, &salt, self.config.kdf())?;
        let blob = encrypt(&key[..], plaintext)?;

        let sealed = format::serialize(&SealedFile::new(mode, salt, blob));
        debug!(
            layout = %mode.layout(),
            iterations = self.config.kdf().iterations(),
            plaintext_len = plaintext.len(),
            sealed_len = sealed.len(),
            "sealed"
        );
        Ok(sealed)
    }

    /// Verifies and decrypts a sealed file.
    ///
    /// Wrong passwords and corrupted input both fail with
    /// [`CryptoError::Authentication`]; nothing is returned in that case.
    pub fn open(
        &self,
        password: &[u8],
        sealed: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let file = self.inspect(sealed)?;
        let key = derive_key(password, file.salt(), self.config.kdf())?;
        let plaintext = decrypt(&key[..], file.blob())?;
        debug!(
            layout = %file.layout(),
            sealed_len = sealed.len(),
            plaintext_len = plaintext.len(),
            "opened"
        );
        Ok(plaintext)
    }

    /// Parses a sealed file without decrypting it.
    pub fn inspect(&self, sealed: &[u8]) -> Result<SealedFile, CryptoError> {
        format::parse(sealed, &self.config.salt_mode())
    }
}
