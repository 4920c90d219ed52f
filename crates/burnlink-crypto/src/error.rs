use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// Authentication failed or the envelope is malformed. Deliberately
    /// carries no plaintext.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
