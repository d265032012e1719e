use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "facilitator.toml";

const DEFAULT_API_URL: &str = match option_env!("FACILITATOR_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:3000",
};
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> anyhow::Result<Self> {
        self.api_url = normalize_api_url(&api_url.into())?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `facilitator.toml` in the working directory, then env.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    let raw = read_settings_file(Path::new(SETTINGS_FILE))?;
    settings_from_sources(raw.as_deref(), |name| std::env::var(name).ok())
}

fn read_settings_file(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))
}

pub(crate) fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings =
            toml::from_str(raw).with_context(|| format!("invalid {SETTINGS_FILE}"))?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    settings.api_url = normalize_api_url(&settings.api_url)?;
    Ok(settings)
}

fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("invalid api url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api url '{raw}' must use http or https");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
