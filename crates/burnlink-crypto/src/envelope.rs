//! XChaCha20-Poly1305 envelope encryption/decryption
//!
//! Encrypted envelope format (binary, base64 on the wire):
//! ```text
//! [1 byte: version][24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! AAD = version byte
//! ```
//!
//! Binding the version byte as AAD means a rewritten version fails the tag
//! check instead of selecting a different decoding path.

use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::error::CryptoError;
use crate::key::SecretKey;
use crate::{ENVELOPE_VERSION, NONCE_SIZE, TAG_SIZE};

const HEADER_SIZE: usize = 1 + NONCE_SIZE;

/// Serialized authenticated ciphertext, as produced by [`encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    bytes: Vec<u8>,
}

impl Envelope {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard padded base64, suitable for a JSON body.
    pub fn to_text(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Decode envelope text. Only the base64 layer is checked here; the
    /// structure is validated by [`decrypt`].
    pub fn from_text(text: &str) -> Result<Self, CryptoError> {
        STANDARD
            .decode(text.trim())
            .map(Self::from_bytes)
            .map_err(|e| CryptoError::Decrypt(format!("envelope is not base64: {e}")))
    }
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(plaintext: &[u8], key: &SecretKey) -> Result<Envelope, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let aad = [ENVELOPE_VERSION];
    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    bytes.push(ENVELOPE_VERSION);
    bytes.extend_from_slice(&nonce_bytes);
    bytes.extend_from_slice(&ciphertext);

    tracing::trace!(
        plaintext_len = plaintext.len(),
        envelope_len = bytes.len(),
        "sealed envelope"
    );
    Ok(Envelope::from_bytes(bytes))
}

/// Decrypt an envelope, verifying the tag before returning anything.
pub fn decrypt(envelope: &Envelope, key: &SecretKey) -> Result<Vec<u8>, CryptoError> {
    let bytes = envelope.as_bytes();
    if bytes.len() < HEADER_SIZE + TAG_SIZE {
        return Err(CryptoError::Decrypt(format!(
            "envelope too short: {} bytes (minimum {})",
            bytes.len(),
            HEADER_SIZE + TAG_SIZE
        )));
    }

    let version = bytes[0];
    if version != ENVELOPE_VERSION {
        return Err(CryptoError::Decrypt(format!(
            "unsupported envelope version {version}"
        )));
    }

    let (nonce_bytes, ciphertext) = bytes[1..].split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: &[version],
            },
        )
        .map_err(|_| CryptoError::Decrypt("invalid key or corrupted data".into()))
}
