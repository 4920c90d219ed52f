use thiserror::Error;

pub type BurnlinkResult<T> = Result<T, BurnlinkError>;

#[derive(Debug, Error)]
pub enum BurnlinkError {
    #[error("input error: {0}")]
    Input(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("{}", submission_message(*status, detail))]
    Submission { status: Option<u16>, detail: String },

    #[error("secret not found: it has expired or was already viewed")]
    SecretNotFoundOrExpired,

    #[error("fetching secret failed: {0}")]
    Fetch(String),

    #[error("decryption failed: wrong key, or the secret was tampered with")]
    Decryption,

    #[error("not a valid secret link: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BurnlinkError {
    /// True for outcomes that are part of normal operation rather than a
    /// fault. Opening a one-time link a second time lands here.
    pub fn is_expected(&self) -> bool {
        matches!(self, BurnlinkError::SecretNotFoundOrExpired)
    }

    /// HTTP status carried by a failed submission, if the store answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BurnlinkError::Submission { status, .. } => *status,
            _ => None,
        }
    }
}

fn submission_message(status: Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("submitting secret failed with HTTP {code}: {detail}"),
        None => format!("submitting secret failed: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_message_with_status() {
        let err = BurnlinkError::Submission {
            status: Some(413),
            detail: "payload too large".into(),
        };
        assert_eq!(
            err.to_string(),
            "submitting secret failed with HTTP 413: payload too large"
        );
        assert_eq!(err.status(), Some(413));
    }

    #[test]
    fn test_submission_message_without_status() {
        let err = BurnlinkError::Submission {
            status: None,
            detail: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "submitting secret failed: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_only_not_found_is_expected() {
        assert!(BurnlinkError::SecretNotFoundOrExpired.is_expected());
        assert!(!BurnlinkError::Decryption.is_expected());
        assert!(!BurnlinkError::Fetch("timeout".into()).is_expected());
        assert!(!BurnlinkError::Parse("no fragment".into()).is_expected());
    }

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            BurnlinkError::Input("x".into()).to_string(),
            BurnlinkError::Encryption("x".into()).to_string(),
            BurnlinkError::Submission { status: None, detail: "x".into() }.to_string(),
            BurnlinkError::SecretNotFoundOrExpired.to_string(),
            BurnlinkError::Fetch("x".into()).to_string(),
            BurnlinkError::Decryption.to_string(),
            BurnlinkError::Parse("x".into()).to_string(),
        ];
        for (i, a) in errors.iter().enumerate() {
            for b in errors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
