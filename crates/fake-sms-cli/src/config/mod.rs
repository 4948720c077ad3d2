//! Configuration loading and resolution.
//!
//! Every setting resolves as: command-line flag, then environment variable,
//! then built-in default.

use std::path::{Path, PathBuf};

use anyhow::Context;
use fake_sms::fetch::DEFAULT_TIMEOUT_MS;
use fake_sms::FetchConfig;

/// Overrides the listing page URL.
pub const BASE_URL_ENV: &str = "FAKE_SMS_BASE_URL";

/// Overrides the per-request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "FAKE_SMS_TIMEOUT_MS";

/// Resolve how to reach the remote site.
pub fn resolve_fetch_config(base_url: Option<&str>, timeout_ms: Option<u64>) -> FetchConfig {
    resolve_fetch_config_from(
        base_url,
        timeout_ms,
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(TIMEOUT_ENV).ok(),
    )
}

fn resolve_fetch_config_from(
    base_url: Option<&str>,
    timeout_ms: Option<u64>,
    env_base_url: Option<String>,
    env_timeout: Option<String>,
) -> FetchConfig {
    let mut config = FetchConfig::default();

    if let Some(url) = base_url
        .map(str::to_string)
        .or(env_base_url)
        .filter(|u| !u.trim().is_empty())
    {
        config = config.with_base_url(url.trim());
    }

    let env_timeout = env_timeout.and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            tracing::warn!("Ignoring {TIMEOUT_ENV}={raw}: not a number of milliseconds");
            None
        }
    });
    let timeout = timeout_ms.or(env_timeout).unwrap_or(DEFAULT_TIMEOUT_MS);
    config.with_timeout_ms(timeout)
}

/// Resolve the store directory (flag, `FAKE_SMS_DB_DIR`, `~/.fake-sms`).
pub fn resolve_store_dir(explicit: Option<&str>) -> anyhow::Result<PathBuf> {
    fake_sms::resolve_store_dir(explicit.map(Path::new))
        .context("Failed to resolve the store directory")
}

/// Exports land in the working directory.
pub fn resolve_export_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("Failed to determine the working directory")
}
