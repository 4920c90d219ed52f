//! Expiration tokens accepted for new secrets
//!
//! The store only honours three lifetimes, so the accepted tokens are a
//! closed set rather than a general `<n><unit>` grammar:
//!
//! ```text
//! 1h -> 3600      1d -> 86400      1w -> 604800
//! ```

use std::fmt;
use std::str::FromStr;

/// Returned by [`expiration`] for any token outside the accepted set.
/// Means "use the default lifetime", not a zero-second secret.
pub const NO_EXPIRATION: i32 = 0;

const HOUR: i32 = 3600;
const DAY: i32 = 24 * HOUR;
const WEEK: i32 = 7 * DAY;

/// Map an expiration token to seconds, or [`NO_EXPIRATION`] if the token
/// is not recognised. Never fails.
pub fn expiration(token: &str) -> i32 {
    Expiration::from_token(token)
        .map(Expiration::seconds)
        .unwrap_or(NO_EXPIRATION)
}

/// One of the lifetimes the store accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Expiration {
    #[default]
    Hour,
    Day,
    Week,
}

impl Expiration {
    pub const ALL: [Expiration; 3] = [Expiration::Hour, Expiration::Day, Expiration::Week];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1h" => Some(Expiration::Hour),
            "1d" => Some(Expiration::Day),
            "1w" => Some(Expiration::Week),
            _ => None,
        }
    }

    pub fn seconds(self) -> i32 {
        match self {
            Expiration::Hour => HOUR,
            Expiration::Day => DAY,
            Expiration::Week => WEEK,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Expiration::Hour => "1h",
            Expiration::Day => "1d",
            Expiration::Week => "1w",
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Expiration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expiration::from_token(s)
            .ok_or_else(|| format!("invalid expiration {s:?}: expected one of 1h, 1d, 1w"))
    }
}
