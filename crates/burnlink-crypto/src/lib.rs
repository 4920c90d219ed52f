//! burnlink-crypto: client-side encryption for one-time secrets
//!
//! Every secret gets its own random 256-bit key. The key never leaves the
//! client except inside the fragment of the share link.
//!
//! Envelope format (version 1, base64 on the wire):
//! ```text
//! [1 byte: version][24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! AAD = version byte
//! ```

pub mod envelope;
pub mod error;
pub mod key;

pub use envelope::{decrypt, encrypt, Envelope};
pub use error::CryptoError;
pub use key::{generate_key, SecretKey};

/// Size of a secret key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Current envelope format version
pub const ENVELOPE_VERSION: u8 = 1;
