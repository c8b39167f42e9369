mod schema;

pub use schema::{AppSettings, Config, Defaults, Site};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::trigger::{IdType, TriggerContext, TypedId};

const CONFIG_ENV_VAR: &str = "THINGIF_CONFIG";

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    // ~/.thingif/config.json
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".thingif")
        .join("config.json"))
}

/// `--config` wins over the env var and the default location
pub fn get_config_path_with_override(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// load from the default location; a missing file gives the default config
pub fn load() -> Result<Config> {
    load_from(&get_config_path()?)
}

pub fn load_with_override(override_path: Option<&Path>) -> Result<Config> {
    load_from(&get_config_path_with_override(override_path)?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save(config: &Config) -> Result<()> {
    save_to(config, &get_config_path()?)
}

pub fn save_with_override(config: &Config, override_path: Option<&Path>) -> Result<()> {
    save_to(config, &get_config_path_with_override(override_path)?)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of problems
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    Ok(check(&config))
}

/// problems that would stop the config from producing a trigger context
pub fn check(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    if config.app.app_id.trim().is_empty() {
        errors.push("app.app_id: must not be empty".to_string());
    }
    if config.app.app_key.trim().is_empty() {
        errors.push("app.app_key: must not be empty".to_string());
    }
    if let Some(url) = &config.app.base_url {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            errors.push(format!(
                "app.base_url: '{}' must start with http:// or https://",
                url
            ));
        }
    }

    match &config.defaults.owner {
        None => errors.push("defaults.owner: not set".to_string()),
        Some(owner) if owner.id_type == IdType::Thing => {
            errors.push(format!("defaults.owner: '{}' must be a user or group", owner));
        }
        Some(_) => {}
    }
    if config.defaults.target.is_none() {
        errors.push("defaults.target: not set".to_string());
    }

    errors
}

/// build the trigger context, letting the caller override the target
pub fn trigger_context(config: &Config, target: Option<TypedId>) -> Result<TriggerContext> {
    if config.app.app_id.trim().is_empty() {
        return Err(anyhow!("app.app_id is not set"));
    }

    let owner = config
        .defaults
        .owner
        .clone()
        .ok_or_else(|| anyhow!("defaults.owner is not set"))?;

    let target = target
        .or_else(|| config.defaults.target.clone())
        .ok_or_else(|| anyhow!("no target given and defaults.target is not set"))?;

    Ok(
        TriggerContext::new(config.app.base_url(), &config.app.app_id, owner, target)
            .with_app_key(&config.app.app_key)
            .with_surface(config.defaults.api_surface),
    )
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["app", "app_id"] => {
            config.app.app_id = value.to_string();
        }
        ["app", "app_key"] => {
            config.app.app_key = value.to_string();
        }
        ["app", "site"] => {
            config.app.site = value.parse().map_err(|e: String| anyhow!(e))?;
        }
        ["app", "base_url"] => {
            config.app.base_url = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        ["defaults", "owner"] => {
            config.defaults.owner = parse_typed_id(value)?;
        }
        ["defaults", "target"] => {
            config.defaults.target = parse_typed_id(value)?;
        }
        ["defaults", "api_surface"] => {
            config.defaults.api_surface = value
                .parse()
                .with_context(|| format!("Invalid api surface: {}", value))?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: app.app_id, app.app_key, app.site, \
                 app.base_url, defaults.owner, defaults.target, defaults.api_surface",
                key
            ));
        }
    }

    Ok(())
}

/// empty clears the value
fn parse_typed_id(value: &str) -> Result<Option<TypedId>> {
    if value.is_empty() {
        return Ok(None);
    }
    let id = value
        .parse()
        .with_context(|| format!("Invalid typed id: {}", value))?;
    Ok(Some(id))
}
