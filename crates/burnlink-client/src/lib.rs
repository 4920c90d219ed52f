//! burnlink-client: share links, secret store access, and the
//! encrypt/decrypt flows built on them

pub mod flow;
pub mod link;
pub mod store;

pub use flow::{
    ClientConfig, DecryptFlow, EncryptFlow, EncryptOptions, PlaintextSource, SharedSecret,
};
pub use link::{build, parse, LinkError, ParsedLink, SecretReference};
pub use store::{HttpStore, MemoryStore, SecretStore, StoreError};
