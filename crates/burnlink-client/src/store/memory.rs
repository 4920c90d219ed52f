//! In-process secret store
//!
//! Mirrors the remote store's rules: only the three accepted lifetimes,
//! expiry checked on fetch, and one-time secrets removed by the fetch that
//! reads them. The removal happens under the lock, so of two racing
//! fetches exactly one gets the envelope. Expired secrets nobody fetched
//! are dropped on the next insert.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use burnlink_core::{Expiration, NewSecret};
use tracing::debug;

use super::{SecretStore, StoreError};

#[derive(Debug)]
struct Entry {
    message: String,
    one_time: bool,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Added to `Instant::now()` so callers can fast-forward expiry
    skew: Duration,
}

impl Inner {
    fn now(&self) -> Instant {
        Instant::now() + self.skew
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of secrets currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the store's clock forward.
    pub fn advance(&self, by: Duration) {
        self.lock().skew += by;
    }

    /// Stored envelope text for `id`, without consuming it.
    pub fn peek(&self, id: &str) -> Option<String> {
        self.lock().entries.get(id).map(|e| e.message.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, secret: &NewSecret) -> Result<String, StoreError> {
        let accepted = Expiration::ALL
            .iter()
            .any(|e| e.seconds() == secret.expiration);
        if !accepted {
            return Err(StoreError::Rejected {
                status: 400,
                detail: format!("invalid expiration {}", secret.expiration),
            });
        }
        if secret.message.is_empty() {
            return Err(StoreError::Rejected {
                status: 400,
                detail: "empty message".into(),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let mut inner = self.lock();
        let now = inner.now();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.expires_at > now);
        let pruned = before - inner.entries.len();
        if pruned > 0 {
            debug!(pruned, "dropped expired secrets");
        }

        let expires_at = now + Duration::from_secs(secret.expiration as u64);
        inner.entries.insert(
            id.clone(),
            Entry {
                message: secret.message.clone(),
                one_time: secret.one_time,
                expires_at,
            },
        );
        debug!(%id, one_time = secret.one_time, "stored secret");
        Ok(id)
    }

    fn take(&self, id: &str) -> Result<String, StoreError> {
        let mut inner = self.lock();
        let now = inner.now();

        let (expired, one_time) = match inner.entries.get(id) {
            Some(entry) => (entry.expires_at <= now, entry.one_time),
            None => return Err(StoreError::NotFound),
        };

        if expired || one_time {
            let entry = inner.entries.remove(id).ok_or(StoreError::NotFound)?;
            if expired {
                debug!(%id, "secret expired");
                return Err(StoreError::NotFound);
            }
            debug!(%id, "one-time secret consumed");
            return Ok(entry.message);
        }

        inner
            .entries
            .get(id)
            .map(|e| e.message.clone())
            .ok_or(StoreError::NotFound)
    }
}

impl SecretStore for MemoryStore {
    async fn submit(&self, secret: &NewSecret) -> Result<String, StoreError> {
        self.insert(secret)
    }

    async fn fetch(&self, id: &str) -> Result<String, StoreError> {
        self.take(id)
    }
}
