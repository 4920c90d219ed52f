//! Encrypt and decrypt pipelines
//!
//! ```text
//! encrypt: read plaintext → generate key → seal envelope → submit → build link
//! decrypt: parse link → fetch envelope → open envelope → plaintext
//! ```
//!
//! Each run is independent: a fresh key per encrypt, no shared local state,
//! no retries. A failed submission is never replayed, because a submission
//! that succeeded without us seeing the answer would leave an orphan.

use std::path::PathBuf;

use burnlink_core::config::BurnlinkConfig;
use burnlink_core::{BurnlinkError, BurnlinkResult, NewSecret, NO_EXPIRATION};
use burnlink_crypto::{decrypt, encrypt, generate_key, CryptoError, Envelope};
use tracing::{debug, info, warn};

use crate::link::{self, SecretReference};
use crate::store::{SecretStore, StoreError};

/// Settings every flow needs, passed in rather than read from globals.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL share links are built on
    pub link_base_url: String,
    pub default_one_time: bool,
    /// Used when a caller asks for [`NO_EXPIRATION`]
    pub default_expiration: i32,
}

impl ClientConfig {
    pub fn from_config(config: &BurnlinkConfig) -> Self {
        Self {
            link_base_url: config.link_base_url().to_string(),
            default_one_time: config.defaults.one_time,
            default_expiration: config.default_expiration_seconds(),
        }
    }
}

/// Where the plaintext comes from.
#[derive(Debug, Clone)]
pub enum PlaintextSource {
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl PlaintextSource {
    /// Pick the source. A file wins over stdin content when both are given.
    pub fn resolve(file: Option<PathBuf>, stdin: Option<Vec<u8>>) -> BurnlinkResult<Self> {
        match (file, stdin) {
            (Some(path), _) => Ok(PlaintextSource::File(path)),
            (None, Some(bytes)) => Ok(PlaintextSource::Bytes(bytes)),
            (None, None) => Err(BurnlinkError::Input(
                "no input: pipe a secret on stdin or pass a file".into(),
            )),
        }
    }

    pub async fn read(self) -> BurnlinkResult<Vec<u8>> {
        match self {
            PlaintextSource::Bytes(bytes) => Ok(bytes),
            PlaintextSource::File(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| BurnlinkError::Input(format!("reading {}: {e}", path.display()))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptOptions {
    /// Lifetime in seconds; [`NO_EXPIRATION`] means the configured default
    pub expiration_seconds: i32,
    pub one_time: bool,
}

impl EncryptOptions {
    pub fn defaults(config: &ClientConfig) -> Self {
        Self {
            expiration_seconds: config.default_expiration,
            one_time: config.default_one_time,
        }
    }
}

/// Result of a successful encrypt run.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    pub url: String,
    pub id: String,
    pub one_time: bool,
    pub expiration_seconds: i32,
}

pub struct EncryptFlow<S> {
    store: S,
    config: ClientConfig,
}

impl<S: SecretStore> EncryptFlow<S> {
    pub fn new(store: S, config: ClientConfig) -> Self {
        Self { store, config }
    }

    pub async fn run(
        &self,
        source: PlaintextSource,
        options: EncryptOptions,
    ) -> BurnlinkResult<SharedSecret> {
        debug!(stage = "reading", "encrypt");
        let plaintext = source.read().await?;
        if plaintext.is_empty() {
            return Err(BurnlinkError::Input("secret is empty".into()));
        }

        debug!(stage = "encrypting", plaintext_len = plaintext.len(), "encrypt");
        let key = generate_key();
        let envelope = encrypt(&plaintext, &key)
            .map_err(|e| BurnlinkError::Encryption(e.to_string()))?;
        drop(plaintext);

        let expiration_seconds = match options.expiration_seconds {
            NO_EXPIRATION => {
                warn!(
                    default = self.config.default_expiration,
                    "no valid expiration given, using default"
                );
                self.config.default_expiration
            }
            secs => secs,
        };

        debug!(stage = "submitting", expiration_seconds, one_time = options.one_time, "encrypt");
        let request = NewSecret {
            message: envelope.to_text(),
            expiration: expiration_seconds,
            one_time: options.one_time,
        };
        let id = self
            .store
            .submit(&request)
            .await
            .map_err(submission_error)?;

        let reference = SecretReference {
            id,
            key,
            one_time: options.one_time,
        };
        let url = reference
            .to_link(&self.config.link_base_url)
            .map_err(|e| BurnlinkError::Submission {
                status: None,
                detail: format!("store returned an unusable id: {e}"),
            })?;

        info!(id = %reference.id, one_time = reference.one_time, "secret stored");
        Ok(SharedSecret {
            url,
            id: reference.id,
            one_time: reference.one_time,
            expiration_seconds,
        })
    }
}

pub struct DecryptFlow<S> {
    store: S,
}

impl<S: SecretStore> DecryptFlow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn run(&self, link_text: &str) -> BurnlinkResult<Vec<u8>> {
        debug!(stage = "parsing", "decrypt");
        let parsed = link::parse(link_text).map_err(|e| BurnlinkError::Parse(e.to_string()))?;

        debug!(stage = "fetching", id = %parsed.id(), "decrypt");
        let text = self.store.fetch(parsed.id()).await.map_err(fetch_error)?;

        debug!(stage = "decrypting", envelope_len = text.len(), "decrypt");
        let envelope = Envelope::from_text(&text).map_err(decryption_error)?;
        let plaintext = decrypt(&envelope, parsed.key()).map_err(decryption_error)?;

        info!(id = %parsed.id(), "secret opened");
        Ok(plaintext)
    }
}

fn submission_error(e: StoreError) -> BurnlinkError {
    match e {
        StoreError::Rejected { status, detail } => BurnlinkError::Submission {
            status: Some(status),
            detail,
        },
        other => BurnlinkError::Submission {
            status: None,
            detail: other.to_string(),
        },
    }
}

fn fetch_error(e: StoreError) -> BurnlinkError {
    match e {
        StoreError::NotFound => BurnlinkError::SecretNotFoundOrExpired,
        other => BurnlinkError::Fetch(other.to_string()),
    }
}

fn decryption_error(e: CryptoError) -> BurnlinkError {
    debug!("decryption failed: {e}");
    BurnlinkError::Decryption
}
