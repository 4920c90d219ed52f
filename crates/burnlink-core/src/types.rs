use serde::{Deserialize, Serialize};

/// Request body for creating a secret. `message` is envelope text; the
/// store never receives plaintext or the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSecret {
    pub message: String,
    /// Lifetime in seconds (3600, 86400 or 604800)
    pub expiration: i32,
    pub one_time: bool,
}

/// Response body shared by create (`message` = id) and fetch
/// (`message` = envelope text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretMessage {
    pub message: String,
}
