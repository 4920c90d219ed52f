//! burnlink: share secrets through one-time links
//!
//! Encrypt (default):
//!   echo 'hunter2' | burnlink              - encrypt stdin, print a link
//!   burnlink --file id_rsa --expiration 1d - encrypt a file
//!
//! Decrypt:
//!   burnlink --decrypt '<link>'            - fetch, decrypt, print to stdout
//!
//! The key travels only in the link's `#` fragment; the store sees ciphertext.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use burnlink_client::{
    ClientConfig, DecryptFlow, EncryptFlow, EncryptOptions, HttpStore, PlaintextSource,
};
use burnlink_core::config::BurnlinkConfig;
use burnlink_core::{expiration, BurnlinkError};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "burnlink",
    version,
    about = "Burnlink - share secrets and files through self-destructing links",
    long_about = "Encrypts a message or file locally, uploads only the ciphertext, and prints \
                  a link carrying the decryption key in its #fragment. \
                  Pass --decrypt with a link to reverse the process."
)]
struct Cli {
    /// Path to config.toml
    #[arg(
        long,
        short = 'c',
        env = "BURNLINK_CONFIG",
        default_value = "~/.config/burnlink/config.toml"
    )]
    config: PathBuf,

    /// Secret store API endpoint (overrides [api] endpoint)
    #[arg(long, env = "BURNLINK_API")]
    api: Option<String>,

    /// Public URL links are built on (overrides [links] base_url)
    #[arg(long, env = "BURNLINK_URL")]
    url: Option<String>,

    /// Decrypt the secret behind this link
    #[arg(long, value_name = "LINK", conflicts_with_all = ["file", "expiration", "one_time"])]
    decrypt: Option<String>,

    /// Write the decrypted secret here instead of stdout
    #[arg(long, short = 'o', requires = "decrypt")]
    output: Option<PathBuf>,

    /// Encrypt this file instead of reading stdin
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Lifetime of the secret: 1h, 1d or 1w
    #[arg(long, short = 'e')]
    expiration: Option<String>,

    /// Delete the secret after its first view (--one-time=false to keep it)
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    one_time: Option<bool>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BURNLINK_LOG")]
    log: Option<String>,

    /// Log format
    #[arg(long, env = "BURNLINK_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_format = match &cli.log_format {
        Some(format) => format.clone(),
        None => LogFormat::from_str(&config.log.format, true).unwrap_or(LogFormat::Text),
    };
    init_logging(cli.log.as_deref().unwrap_or(&config.log.level), &log_format);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.endpoint,
        config = %cli.config.display(),
        "burnlink starting"
    );

    let store = HttpStore::from_config(&config.api)?;

    match &cli.decrypt {
        Some(link) => cmd_decrypt(store, link, cli.output.as_deref()).await,
        None => cmd_encrypt(store, &config, &cli).await,
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Config file, then environment/flag overrides.
fn load_config(cli: &Cli) -> Result<BurnlinkConfig> {
    let path = expand_tilde(&cli.config);
    let mut config = BurnlinkConfig::load(&path)
        .with_context(|| format!("loading config: {}", path.display()))?;

    if let Some(api) = &cli.api {
        config.api.endpoint = api.clone();
    }
    if let Some(url) = &cli.url {
        config.links.base_url = url.clone();
    }
    Ok(config)
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_in(path, &std::env::var("HOME").unwrap_or_default())
}

fn expand_tilde_in(path: &Path, home: &str) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the link or the secret; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Progress helpers ──────────────────────────────────────────────────────────

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── encrypt ───────────────────────────────────────────────────────────────────

async fn cmd_encrypt(store: HttpStore, config: &BurnlinkConfig, cli: &Cli) -> Result<()> {
    let stdin = if cli.file.is_none() {
        read_stdin().await?
    } else {
        None
    };
    let source = PlaintextSource::resolve(cli.file.clone(), stdin)?;

    let client_config = ClientConfig::from_config(config);
    let mut options = EncryptOptions::defaults(&client_config);
    if let Some(token) = &cli.expiration {
        // Unknown tokens map to 0, which the flow replaces with the default
        options.expiration_seconds = expiration(token);
    }
    if let Some(one_time) = cli.one_time {
        options.one_time = one_time;
    }

    let spinner = make_spinner("encrypt");
    spinner.set_message("uploading ciphertext");
    let result = EncryptFlow::new(store, client_config).run(source, options).await;
    spinner.finish_and_clear();

    let shared = result?;
    println!("{}", shared.url);
    Ok(())
}

/// Read all of stdin unless it is an interactive terminal.
async fn read_stdin() -> Result<Option<Vec<u8>>> {
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buf = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .context("reading stdin")?;
    Ok(Some(buf))
}

// ── decrypt ───────────────────────────────────────────────────────────────────

async fn cmd_decrypt(store: HttpStore, link: &str, output: Option<&Path>) -> Result<()> {
    let spinner = make_spinner("decrypt");
    spinner.set_message("fetching ciphertext");
    let result = DecryptFlow::new(store).run(link).await;
    spinner.finish_and_clear();

    let plaintext = match result {
        Ok(plaintext) => plaintext,
        Err(e @ BurnlinkError::SecretNotFoundOrExpired) => {
            return Err(anyhow::Error::new(e)
                .context("this link has expired or was already opened (one-time links work once)"));
        }
        Err(e) => return Err(e.into()),
    };

    match output {
        Some(path) => tokio::fs::write(path, &plaintext)
            .await
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&plaintext).await.context("writing stdout")?;
            stdout.flush().await.context("writing stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("burnlink").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_encrypt_mode() {
        let cli = parse(&[]).unwrap();
        assert!(cli.decrypt.is_none());
        assert!(cli.one_time.is_none());
    }

    #[test]
    fn test_one_time_flag_forms() {
        assert_eq!(parse(&["--one-time"]).unwrap().one_time, Some(true));
        assert_eq!(parse(&["--one-time=false"]).unwrap().one_time, Some(false));
        assert_eq!(parse(&["--one-time=true"]).unwrap().one_time, Some(true));
    }

    #[test]
    fn test_decrypt_needs_argument() {
        assert!(parse(&["--decrypt"]).is_err());
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse(&["--unknown"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("Burnlink - share secrets"));
    }

    #[test]
    fn test_decrypt_conflicts_with_file() {
        let err = parse(&["--decrypt", "https://x/#/o/a/b", "--file", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_output_requires_decrypt() {
        assert!(parse(&["--output", "out.txt"]).is_err());
        assert!(parse(&["--decrypt", "https://x/#/o/a/b", "--output", "out.txt"]).is_ok());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(
            expand_tilde_in(Path::new("~/.config/burnlink/config.toml"), "/home/tester"),
            PathBuf::from("/home/tester/.config/burnlink/config.toml")
        );
        assert_eq!(
            expand_tilde_in(Path::new("/etc/x.toml"), "/home/tester"),
            PathBuf::from("/etc/x.toml")
        );
    }

    #[test]
    fn test_flag_overrides_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            concat!(
                "[api]\nendpoint = \"https://api.example.com\"\n",
                "[links]\nbase_url = \"https://example.com\"\n",
            ),
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let cli = parse(&["--config", &path_str, "--api", "https://other.example.com"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api.endpoint, "https://other.example.com");
        assert_eq!(config.link_base_url(), "https://example.com");
    }
}
