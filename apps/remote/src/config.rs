use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{DEFAULT_CONTROLLER_PATH, DEFAULT_HOLD, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "remote.toml";
pub const DEFAULT_DEVICE_ADDR: &str = "192.168.1.100";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub device_addr: String,
    pub endpoint_path: String,
    pub request_timeout: Duration,
    pub hold: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_addr: DEFAULT_DEVICE_ADDR.into(),
            endpoint_path: DEFAULT_CONTROLLER_PATH.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            hold: DEFAULT_HOLD,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    device_addr: Option<String>,
    endpoint_path: Option<String>,
    request_timeout_secs: Option<u64>,
    hold_ms: Option<u64>,
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub device_addr: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub hold_ms: Option<u64>,
}

impl Settings {
    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.device_addr {
            self.device_addr = v;
        }
        if let Some(v) = file.endpoint_path {
            self.endpoint_path = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.hold_ms {
            self.hold = Duration::from_millis(v);
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(v) = overrides.device_addr {
            self.device_addr = v;
        }
        if let Some(v) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = overrides.hold_ms {
            self.hold = Duration::from_millis(v);
        }
        self
    }
}

pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment. An explicitly named file
/// must exist; the default `remote.toml` is optional.
pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            settings.apply_file(file);
        }
        Err(error) if !required && error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    if let Some(v) = env("SWITCH_REMOTE_ADDR") {
        settings.device_addr = v;
    }
    if let Some(v) = env("APP__DEVICE_ADDR") {
        settings.device_addr = v;
    }
    if let Some(v) = env("APP__ENDPOINT_PATH") {
        settings.endpoint_path = v;
    }
    if let Some(v) = parse_env(&env, "APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = Duration::from_secs(v);
    }
    if let Some(v) = parse_env(&env, "APP__HOLD_MS") {
        settings.hold = Duration::from_millis(v);
    }

    Ok(settings)
}

fn parse_env(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(key, value = %raw, %error, "ignoring unparseable environment value");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
