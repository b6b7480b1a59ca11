//! On-disk layout of sealed files.
//!
//! There is no magic or version header. The layout is selected by the
//! caller's [`SaltMode`]:
//!
//! ```text
//! Embedded: SALT (16) | NONCE (16) | CIPHERTEXT | TAG (16)
//! Shared:               NONCE (16) | CIPHERTEXT | TAG (16)
//! ```

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::CryptoError;

pub mod embedded;
pub mod shared;

/// The salt bytes used by the original deployment for every file.
pub const LEGACY_SALT: [u8; SALT_LEN] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Where the key-derivation salt comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaltMode {
    /// A fresh salt per file, stored in front of the nonce.
    #[default]
    Embedded,
    /// One salt for every file, supplied out of band.
    Shared([u8; SALT_LEN]),
}

impl SaltMode {
    pub fn layout(&self) -> Layout {
        match self {
            SaltMode::Embedded => Layout::Embedded,
            SaltMode::Shared(_) => Layout::Shared,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Embedded,
    Shared,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Embedded => write!(f, "embedded salt"),
            Layout::Shared => write!(f, "shared salt"),
        }
    }
}

/// A parsed sealed file: the salt it derives its key from and the
/// `nonce || ciphertext || tag` blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedFile {
    layout: Layout,
    salt: [u8; SALT_LEN],
    blob: Vec<u8>,
}

impl SealedFile {
    pub(crate) fn new(mode: SaltMode, salt: [u8; SALT_LEN], blob: Vec<u8>) -> Self {
        Self {
            layout: mode.layout(),
            salt,
            blob,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The `nonce || ciphertext || tag` part.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn nonce(&self) -> &[u8] {
        &self.blob[..NONCE_LEN.min(self.blob.len())]
    }

    /// Length of the encrypted payload, excluding nonce and tag.
    pub fn ciphertext_len(&self) -> usize {
        self.blob.len().saturating_sub(NONCE_LEN + TAG_LEN)
    }
}

/// Parses sealed bytes according to the salt mode.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedBlob`] if the input is shorter than the
/// fixed prefix of the layout.
pub fn parse(data: &[u8], mode: &SaltMode) -> Result<SealedFile, CryptoError> {
    match mode {
        SaltMode::Embedded => embedded::parse(data),
        SaltMode::Shared(salt) => shared::parse(data, salt),
    }
}

/// Serializes a sealed file to bytes.
pub fn serialize(file: &SealedFile) -> Vec<u8> {
    match file.layout() {
        Layout::Embedded => embedded::serialize(file),
        Layout::Shared => shared::serialize(file),
    }
}
