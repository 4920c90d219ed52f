use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BurnlinkError, BurnlinkResult};
use crate::expiration::{expiration, Expiration, NO_EXPIRATION};

/// Top-level client configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnlinkConfig {
    pub api: ApiConfig,
    pub links: LinksConfig,
    pub defaults: DefaultsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Secret store API endpoint
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Refuse plaintext HTTP endpoints
    pub enforce_tls: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Public web URL that links are built on (empty = API endpoint)
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Expiration token: 1h, 1d or 1w
    pub expiration: String,
    /// Delete the secret after its first view
    pub one_time: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:1337".into(),
            timeout_secs: 30,
            enforce_tls: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            expiration: Expiration::default().token().into(),
            one_time: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl ApiConfig {
    /// Validate the API endpoint scheme against `enforce_tls`.
    ///
    /// Plaintext HTTP is an error when TLS is enforced and a warning otherwise.
    pub fn check_endpoint(&self) -> BurnlinkResult<()> {
        let endpoint = &self.endpoint;
        if endpoint.starts_with("http://") {
            if self.enforce_tls {
                return Err(BurnlinkError::Config(format!(
                    "API endpoint uses plaintext HTTP ({endpoint}), but enforce_tls is enabled"
                )));
            }
            tracing::warn!(
                endpoint = %endpoint,
                "API endpoint uses plaintext HTTP; ciphertext and ids travel unprotected"
            );
        } else if !endpoint.starts_with("https://") {
            return Err(BurnlinkError::Config(format!(
                "API endpoint must be an http:// or https:// URL, got {endpoint:?}"
            )));
        }
        Ok(())
    }
}

impl BurnlinkConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> BurnlinkResult<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| BurnlinkError::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Base URL that secret links are built on.
    pub fn link_base_url(&self) -> &str {
        if self.links.base_url.is_empty() {
            &self.api.endpoint
        } else {
            &self.links.base_url
        }
    }

    /// Default lifetime in seconds. An unrecognised token in the config
    /// falls back to one hour.
    pub fn default_expiration_seconds(&self) -> i32 {
        match expiration(&self.defaults.expiration) {
            NO_EXPIRATION => {
                tracing::warn!(
                    token = %self.defaults.expiration,
                    "unrecognised default expiration, using {}",
                    Expiration::default()
                );
                Expiration::default().seconds()
            }
            secs => secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[api]
endpoint = "https://api.secrets.example.com"
timeout_secs = 10
enforce_tls = true

[links]
base_url = "https://secrets.example.com"

[defaults]
expiration = "1w"
one_time = false

[log]
level = "debug"
format = "json"
"#;
        let config: BurnlinkConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api.endpoint, "https://api.secrets.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.enforce_tls);
        assert_eq!(config.link_base_url(), "https://secrets.example.com");
        assert_eq!(config.default_expiration_seconds(), 604800);
        assert!(!config.defaults.one_time);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_parse_defaults() {
        let config: BurnlinkConfig = toml::from_str("").unwrap();

        assert_eq!(config.api.endpoint, "http://localhost:1337");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(!config.api.enforce_tls);
        assert_eq!(config.defaults.expiration, "1h");
        assert!(config.defaults.one_time);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_link_base_falls_back_to_endpoint() {
        let toml_str = r#"
[api]
endpoint = "https://api.example.com"
"#;
        let config: BurnlinkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.link_base_url(), "https://api.example.com");
    }

    #[test]
    fn test_bad_default_expiration_falls_back() {
        let toml_str = r#"
[defaults]
expiration = "3d"
"#;
        let config: BurnlinkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_expiration_seconds(), 3600);
    }

    #[test]
    fn test_http_endpoint_with_enforce_tls() {
        let mut config = BurnlinkConfig::default();
        config.api.endpoint = "http://insecure:1337".into();
        config.api.enforce_tls = true;
        let err = config.api.check_endpoint().unwrap_err();
        assert!(err.to_string().contains("enforce_tls"), "got: {err}");
    }

    #[test]
    fn test_http_endpoint_without_enforce_tls() {
        let config = BurnlinkConfig::default();
        assert!(config.api.check_endpoint().is_ok());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = BurnlinkConfig::default();
        config.api.endpoint = "ftp://example.com".into();
        assert!(config.api.check_endpoint().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = BurnlinkConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.endpoint, "http://localhost:1337");
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[defaults]\none_time = false\n").unwrap();

        let config = BurnlinkConfig::load(&path).unwrap();
        assert!(!config.defaults.one_time);
        assert_eq!(config.defaults.expiration, "1h");
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[api\nendpoint = ").unwrap();

        let err = BurnlinkConfig::load(&path).unwrap_err();
        assert!(matches!(err, BurnlinkError::Config(_)));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = BurnlinkConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BurnlinkConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.api.endpoint, parsed.api.endpoint);
        assert_eq!(config.defaults.expiration, parsed.defaults.expiration);
    }
}
