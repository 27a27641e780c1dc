use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Prefix for environment overrides of config values (`APP_READ_ONLY`, ...).
pub const ENV_PREFIX: &str = "APP_";

/// Get the default data directory: ~/.github-mcp-server
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".github-mcp-server"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {}: {}", path.display(), e))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {}: {}", path.display(), e))?;
    Ok(cfg)
}

/// Loads the config file and applies `APP_*` environment overrides.
///
/// An explicit path must exist. Otherwise ~/.github-mcp-server/config.toml wins over
/// ./config.toml, and defaults are used when neither exists.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match explicit {
        Some(path) => load_from_path(path)?,
        None => load_discovered()?,
    };
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;
    Ok(cfg)
}

fn load_discovered() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.github-mcp-server/config.toml
    if let Ok(dir) = get_data_dir() {
        let home_config = dir.join("config.toml");
        if home_config.exists() {
            return load_from_path(&home_config);
        }
    }

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");
    if local_config.exists() {
        return load_from_path(local_config);
    }

    Ok(AppConfig::default())
}

/// Applies `APP_*` overrides. Empty values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(&format!("{ENV_PREFIX}{name}"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let get_bool = |name: &str| -> anyhow::Result<Option<bool>> {
        match get(name) {
            None => Ok(None),
            Some(v) => parse_bool(&v)
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("{ENV_PREFIX}{name}: invalid boolean '{v}'")),
        }
    };

    if let Some(v) = get_bool("READ_ONLY")? {
        cfg.server.read_only = v;
    }
    if let Some(v) = get_bool("ENABLE_COMMAND_LOGGING")? {
        cfg.server.enable_command_logging = v;
    }
    if let Some(v) = get_bool("EXPORT_TRANSLATIONS")? {
        cfg.server.export_translations = v;
    }
    if let Some(v) = get("LOG_FILE") {
        cfg.server.log_file = Some(v);
    }
    if let Some(v) = get("GH_HOST") {
        cfg.github.host = v;
    }
    Ok(())
}

/// `GH_HOST` takes precedence over every other host setting.
pub fn resolve_host<F>(configured: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("GH_HOST")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| configured.trim().to_string())
}

pub fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
