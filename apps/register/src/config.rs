use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "register.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: Url,
    pub request_timeout: Option<Duration>,
    pub log_filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment, then `api_base_override`.
///
/// An explicit `config_path` must exist; the default `register.toml` is optional.
pub fn load_settings(
    config_path: Option<&Path>,
    api_base_override: Option<&str>,
) -> anyhow::Result<Settings> {
    let raw_file = match config_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };

    resolve_settings(
        raw_file.as_deref(),
        |key| std::env::var(key).ok(),
        api_base_override,
    )
}

fn resolve_settings(
    raw_file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    api_base_override: Option<&str>,
) -> anyhow::Result<Settings> {
    let file = match raw_file {
        Some(raw) => toml::from_str::<FileSettings>(raw).context("failed to parse register config")?,
        None => FileSettings::default(),
    };

    let mut api_base_url = file
        .api_base_url
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let mut request_timeout_secs = file.request_timeout_secs;
    let log_filter = file
        .log_filter
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    if let Some(v) = env("POS_API_URL") {
        api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let parsed = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS must be whole seconds, got '{v}'"))?;
        request_timeout_secs = Some(parsed);
    }

    if let Some(v) = api_base_override {
        api_base_url = v.to_string();
    }

    Ok(Settings {
        api_base_url: parse_api_base_url(&api_base_url)?,
        request_timeout: request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        log_filter,
    })
}

pub fn parse_api_base_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api base url must start with http:// or https://, got '{raw}'");
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
