use thiserror::Error;

/// Failures of the sealing pipeline.
///
/// `Authentication` deliberately carries no detail: a wrong password and a
/// tampered file must look the same to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("malformed input: {len} bytes, need at least {min}")]
    MalformedBlob { len: usize, min: usize },

    #[error("decryption failed: incorrect password or corrupted file")]
    Authentication,

    #[error("encryption failed: {0}")]
    Encryption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_is_generic() {
        let msg = CryptoError::Authentication.to_string();
        assert!(msg.contains("incorrect password or corrupted file"));
    }

    #[test]
    fn malformed_reports_lengths() {
        let msg = CryptoError::MalformedBlob { len: 3, min: 16 }.to_string();
        assert!(msg.contains("3 bytes"));
        assert!(msg.contains("16"));
    }
}
