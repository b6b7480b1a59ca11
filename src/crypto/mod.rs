//! Cryptographic primitives for sealed files.
//!
//! Provides password-based key derivation and authenticated encryption.

pub mod aead;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_salt};
pub use kdf::{KdfParams, Key, derive_key};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (16 bytes, AES-GCM with a 128-bit IV).
pub const NONCE_LEN: usize = 16;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
