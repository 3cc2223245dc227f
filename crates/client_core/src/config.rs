use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::field_binding::DEFAULT_DEBOUNCE;

pub const SETTINGS_FILE: &str = "farm.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub debounce_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl ClientSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    debounce_ms: Option<u64>,
}

/// Defaults, then `farm.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    match read_settings_file(Path::new(SETTINGS_FILE)) {
        Ok(Some(file_cfg)) => apply_file(&mut settings, file_cfg),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring unreadable settings file"),
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();
    let file_cfg = read_settings_file(path)?
        .with_context(|| format!("settings file '{}' not found", path.display()))?;
    apply_file(&mut settings, file_cfg);
    apply_env(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    toml::from_str(&raw)
        .map(Some)
        .with_context(|| format!("failed to parse '{}'", path.display()))
}

fn apply_file(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.debounce_ms {
        settings.debounce_ms = v;
    }
}

fn apply_env(settings: &mut ClientSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("FARM_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    for name in ["FARM_DEBOUNCE_MS", "APP__DEBOUNCE_MS"] {
        if let Some(v) = var(name) {
            match v.trim().parse::<u64>() {
                Ok(parsed) => settings.debounce_ms = parsed,
                Err(_) => warn!(variable = name, value = %v, "ignoring non-numeric debounce"),
            }
        }
    }
}
