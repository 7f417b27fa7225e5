use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::{ClientError, Result};

pub const SETTINGS_FILE: &str = "employee-desk.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub token_path: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            token_path: default_token_path(),
        }
    }
}

impl ClientSettings {
    pub fn api_base(&self) -> Result<ApiBase> {
        ApiBase::parse(&self.api_base_url)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    api_base_url: Option<String>,
    token_path: Option<PathBuf>,
}

pub fn default_token_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("data"))
        .join("employee_desk")
        .join("session.json")
}

pub fn load_settings() -> ClientSettings {
    load_settings_with(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file (when present), then environment overrides.
pub fn load_settings_with(file: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<SettingsFile>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.token_path {
                    settings.token_path = v;
                }
            }
            Err(err) => warn!(path = %file.display(), "ignoring malformed settings file: {err}"),
        }
    }

    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = env("EMPLOYEE_DESK_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("EMPLOYEE_DESK_TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }

    settings
}

/// Validated root of the directory service, e.g. `http://localhost:8080`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    url: Url,
}

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|err| ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: "expected an http(s) url".to_string(),
            });
        }

        Ok(Self { url })
    }

    /// Appends percent-encoded path segments to the base path.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn login_url(&self) -> Url {
        self.endpoint(&["login"])
    }

    pub fn employees_url(&self) -> Url {
        self.endpoint(&["api", "employees"])
    }

    pub fn employee_url(&self, id: &str) -> Url {
        self.endpoint(&["api", "employees", id])
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
