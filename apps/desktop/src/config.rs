use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Http,
    Memory,
}

impl StoreKind {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(StoreKind::Http),
            "memory" => Ok(StoreKind::Memory),
            other => bail!("unknown store kind '{other}' (expected 'http' or 'memory')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub session_dir: PathBuf,
    pub store: StoreKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5678".into(),
            session_dir: PathBuf::from("./data/session"),
            store: StoreKind::Http,
        }
    }
}

/// Defaults, then `billed.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let file = match fs::read_to_string("billed.toml") {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(err).context("failed to read billed.toml"),
    };
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_settings(file.as_deref(), &env)
}

fn resolve_settings(
    file: Option<&str>,
    env: &HashMap<String, String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: HashMap<String, String> =
            toml::from_str(raw).context("billed.toml must hold string keys")?;
        if let Some(v) = file_cfg.get("api_url") {
            settings.api_url = v.clone();
        }
        if let Some(v) = file_cfg.get("session_dir") {
            settings.session_dir = PathBuf::from(v);
        }
        if let Some(v) = file_cfg.get("store") {
            settings.store = StoreKind::parse(v)?;
        }
    }

    for key in ["BILLED_API_URL", "APP__API_URL"] {
        if let Some(v) = env.get(key) {
            settings.api_url = v.clone();
        }
    }
    for key in ["BILLED_SESSION_DIR", "APP__SESSION_DIR"] {
        if let Some(v) = env.get(key) {
            settings.session_dir = PathBuf::from(v);
        }
    }
    for key in ["BILLED_STORE", "APP__STORE"] {
        if let Some(v) = env.get(key) {
            settings.store = StoreKind::parse(v).with_context(|| format!("invalid {key}"))?;
        }
    }

    Ok(settings)
}
