pub mod config;
pub mod error;
pub mod expiration;
pub mod types;

pub use error::{BurnlinkError, BurnlinkResult};
pub use expiration::{expiration, Expiration, NO_EXPIRATION};
pub use types::{NewSecret, SecretMessage};
