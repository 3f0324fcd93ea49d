use std::path::{Path, PathBuf};

use super::types::{AppConfig, RequestMode, ThirdPartyProtocol};

/// Get the default batchgen data directory: ~/.batchgen
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".batchgen"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.batchgen/config.toml (highest)
    let data_config = get_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if data_config.exists() {
        load_from_path(&data_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest). Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("BATCHGEN_API_KEY") {
        cfg.service.api_key = v.trim().to_string();
    }
    if let Some(v) = get("BATCHGEN_BASE_URL") {
        cfg.service.base_url = v.trim().to_string();
    }
    if let Some(v) = get("BATCHGEN_THIRD_PARTY_URL") {
        cfg.service.third_party_url = v.trim().to_string();
    }
    if let Some(v) = get("BATCHGEN_REQUEST_MODE") {
        cfg.service.mode = if v.trim() == "third_party" {
            RequestMode::ThirdParty
        } else {
            RequestMode::Official
        };
    }
    if let Some(v) = get("BATCHGEN_PROTOCOL") {
        cfg.service.protocol = if v.trim() == "openai" {
            ThirdPartyProtocol::Openai
        } else {
            ThirdPartyProtocol::Gemini
        };
    }
}
