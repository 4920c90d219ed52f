//! Share links
//!
//! ```text
//! <base_url>/#/<tag>/<id>/<key>
//!   tag = "o"  one-time: deleted by the store after the first fetch
//!   tag = "s"  standard: kept until it expires
//!   key = url-safe base64 of the 32-byte secret key
//! ```
//!
//! Everything after `#` is a fragment, which HTTP clients never put on the
//! wire. The key therefore reaches nobody but the holder of the link.

use burnlink_crypto::{CryptoError, SecretKey};
use thiserror::Error;
use url::Url;

const ONE_TIME_TAG: &str = "o";
const STANDARD_TAG: &str = "s";

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("missing '#' fragment")]
    MissingFragment,

    #[error("invalid base URL {0:?}")]
    InvalidBase(String),

    #[error("fragment must look like /<tag>/<id>/<key>, got {0:?}")]
    BadShape(String),

    #[error("unknown link type {0:?}")]
    UnknownTag(String),

    #[error("invalid secret id {0:?}")]
    InvalidId(String),

    #[error("invalid key: {0}")]
    InvalidKey(#[from] CryptoError),
}

/// Everything needed to fetch and open one secret. Lives only in memory;
/// its durable form is the link text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    pub id: String,
    pub key: SecretKey,
    pub one_time: bool,
}

impl SecretReference {
    pub fn to_link(&self, base_url: &str) -> Result<String, LinkError> {
        build(base_url, &self.id, &self.key, self.one_time)
    }
}

/// A link split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// Base URL with any trailing `/` removed
    pub base_url: String,
    pub reference: SecretReference,
}

impl ParsedLink {
    pub fn id(&self) -> &str {
        &self.reference.id
    }

    pub fn key(&self) -> &SecretKey {
        &self.reference.key
    }
}

/// Build a share link for a stored secret.
pub fn build(
    base_url: &str,
    id: &str,
    key: &SecretKey,
    one_time: bool,
) -> Result<String, LinkError> {
    validate_id(id)?;
    let tag = if one_time { ONE_TIME_TAG } else { STANDARD_TAG };
    Ok(format!(
        "{}/#/{}/{}/{}",
        base_url.trim_end_matches('/'),
        tag,
        id,
        key.encode()
    ))
}

/// Parse a share link produced by [`build`].
pub fn parse(link: &str) -> Result<ParsedLink, LinkError> {
    let (base, fragment) = link.trim().split_once('#').ok_or(LinkError::MissingFragment)?;

    let base_url = base.trim_end_matches('/');
    let valid_base = Url::parse(base_url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid_base {
        return Err(LinkError::InvalidBase(base.to_string()));
    }

    let path = fragment
        .strip_prefix('/')
        .ok_or_else(|| LinkError::BadShape(fragment.to_string()))?;
    let path = path.strip_suffix('/').unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    let [tag, id, key] = segments.as_slice() else {
        return Err(LinkError::BadShape(fragment.to_string()));
    };

    let one_time = match *tag {
        ONE_TIME_TAG => true,
        STANDARD_TAG => false,
        other => return Err(LinkError::UnknownTag(other.to_string())),
    };
    validate_id(id)?;
    let key = SecretKey::decode(key)?;

    Ok(ParsedLink {
        base_url: base_url.to_string(),
        reference: SecretReference {
            id: id.to_string(),
            key,
            one_time,
        },
    })
}

/// Ids go into both a URL path and the fragment grammar, so they are
/// limited to RFC 3986 unreserved characters. `.` and `..` are dot-segments
/// that would move the fetch off `/secret/{id}`.
fn validate_id(id: &str) -> Result<(), LinkError> {
    let ok = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
    if ok {
        Ok(())
    } else {
        Err(LinkError::InvalidId(id.to_string()))
    }
}
