use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "employee_hub.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint_url: String,
    pub request_timeout_ms: u64,
    pub auth_latency_ms: u64,
    pub session_path: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:3001".into(),
            request_timeout_ms: 10_000,
            auth_latency_ms: 800,
            session_path: PathBuf::from("./data/session.json"),
        }
    }
}

impl ClientSettings {
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint_url.trim())
            .with_context(|| format!("invalid endpoint url '{}'", self.endpoint_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint url '{}' must use http or https", self.endpoint_url);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    request_timeout_ms: Option<u64>,
    auth_latency_ms: Option<u64>,
    session_path: Option<PathBuf>,
}

/// Reads `employee_hub.toml` from the working directory, then applies
/// environment overrides.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read '{}'", config_path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", config_path.display()))?;
        if let Some(v) = file_cfg.endpoint_url {
            settings.endpoint_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_ms {
            settings.request_timeout_ms = v;
        }
        if let Some(v) = file_cfg.auth_latency_ms {
            settings.auth_latency_ms = v;
        }
        if let Some(v) = file_cfg.session_path {
            settings.session_path = v;
        }
    }

    if let Some(v) = env("EMPLOYEE_HUB_ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = env("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout_ms = parse_millis("APP__REQUEST_TIMEOUT_MS", &v)?;
    }
    if let Some(v) = env("APP__AUTH_LATENCY_MS") {
        settings.auth_latency_ms = parse_millis("APP__AUTH_LATENCY_MS", &v)?;
    }
    if let Some(v) = env("APP__SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }

    if settings.request_timeout_ms == 0 {
        bail!("request timeout must be greater than zero");
    }

    Ok(settings)
}

fn parse_millis(key: &str, raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of milliseconds, got '{raw}'"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
