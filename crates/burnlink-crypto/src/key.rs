//! Per-secret key generation and link-safe encoding

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::KEY_SIZE;

/// A per-secret 256-bit encryption key. Zeroized on drop.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// URL-safe base64 without padding (43 characters).
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes)
    }

    /// Inverse of [`SecretKey::encode`].
    pub fn decode(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidKey(format!("not url-safe base64: {e}")))?;

        if decoded.len() != KEY_SIZE {
            let len = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKey(format!(
                "wrong size: {len} bytes (expected {KEY_SIZE})"
            )));
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self::from_bytes(bytes))
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SecretKey {}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit secret key.
pub fn generate_key() -> SecretKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    SecretKey::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let k1 = generate_key();
        let k2 = generate_key();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let key = generate_key();
        let encoded = key.encode();
        assert_eq!(encoded.len(), 43);

        let decoded = SecretKey::decode(&encoded).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_encoding_is_url_safe() {
        let key = SecretKey::from_bytes([0xFF; KEY_SIZE]);
        let encoded = key.encode();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "encoded key must not need escaping in a URL: {encoded}"
        );
    }

    #[test]
    fn test_decode_wrong_length() {
        let short = URL_SAFE_NO_PAD.encode([1u8; 16]);
        assert!(matches!(
            SecretKey::decode(&short),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_decode_not_base64() {
        assert!(SecretKey::decode("not/base64+key==").is_err());
        assert!(SecretKey::decode("").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecretKey::from_bytes([7u8; KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));
    }
}
