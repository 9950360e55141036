//! Config loader (strict YAML parsing + environment overrides).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use propscope_core::error::{PropScopeError, Result};

pub use schema::{PayloadSizeSection, PropScopeConfig, ThrowExceptionSection};

pub const ENV_ENABLED: &str = "INERTIA_PAYLOAD_SIZE_MEASUREMENT_ENABLED";
pub const ENV_THRESHOLD_KB: &str = "INERTIA_PAYLOAD_SIZE_THRESHOLD_IN_KB";
pub const ENV_THROW_ON_DUPLICATE_KEYS: &str = "INERTIA_PROPS_THROW_EXCEPTION_ON_DUPLICATE_KEYS";
pub const ENV_THROW_WHEN_COMPONENT_EXCEEDS_TOTAL: &str =
    "INERTIA_PROPS_THROW_WHEN_COMPONENT_PROPS_EXCEED_TOTAL_PROPS_SIZE";
pub const ENV_MAX_TREE_DEPTH: &str = "INERTIA_PROPS_SIZE_TREE_MAX_DEPTH";
pub const ENV_APP_ENV: &str = "APP_ENV";

pub fn load_from_file(path: &str) -> Result<PropScopeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PropScopeError::InvalidConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like `load_from_file`, but a missing file yields the defaults.
pub fn load_from_file_or_default(path: &str) -> Result<PropScopeConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            Ok(PropScopeConfig::default())
        }
        Err(e) => Err(PropScopeError::InvalidConfig(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<PropScopeConfig> {
    let cfg: PropScopeConfig = serde_yaml::from_str(s)
        .map_err(|e| PropScopeError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply overrides from the process environment.
pub fn apply_process_env(cfg: &mut PropScopeConfig) -> Result<()> {
    apply_env_overrides(cfg, |k| std::env::var(k).ok())
}

/// Apply overrides from `lookup` (variable name -> value), then re-validate.
pub fn apply_env_overrides<F>(cfg: &mut PropScopeConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_ENABLED) {
        cfg.enabled = parse_bool(ENV_ENABLED, &v)?;
    }
    if let Some(v) = lookup(ENV_THRESHOLD_KB) {
        cfg.payload_size.threshold_in_kb = v.trim().parse().map_err(|_| {
            PropScopeError::InvalidConfig(format!("{ENV_THRESHOLD_KB} must be a number, got {v:?}"))
        })?;
    }
    if let Some(v) = lookup(ENV_THROW_ON_DUPLICATE_KEYS) {
        cfg.throw_exception.on_duplicate_keys = parse_bool(ENV_THROW_ON_DUPLICATE_KEYS, &v)?;
    }
    if let Some(v) = lookup(ENV_THROW_WHEN_COMPONENT_EXCEEDS_TOTAL) {
        cfg.throw_exception.when_component_props_size_exceed_total_props_size =
            parse_bool(ENV_THROW_WHEN_COMPONENT_EXCEEDS_TOTAL, &v)?;
    }
    if let Some(v) = lookup(ENV_MAX_TREE_DEPTH) {
        cfg.payload_size.max_tree_depth = v.trim().parse().map_err(|_| {
            PropScopeError::InvalidConfig(format!(
                "{ENV_MAX_TREE_DEPTH} must be a non-negative integer, got {v:?}"
            ))
        })?;
    }
    if let Some(v) = lookup(ENV_APP_ENV) {
        cfg.environment = v.trim().to_string();
    }

    cfg.validate()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(PropScopeError::InvalidConfig(format!(
            "{name} must be a boolean, got {raw:?}"
        ))),
    }
}
