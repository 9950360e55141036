use serde::Deserialize;

use propscope_core::error::{PropScopeError, Result};
use propscope_core::policy::config::{
    PolicyConfig, DEFAULT_MAX_TREE_DEPTH, DEFAULT_THRESHOLD_KB, MAX_TREE_DEPTH_LIMIT,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropScopeConfig {
    pub version: u32,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub skip_in_production: bool,

    #[serde(default)]
    pub payload_size: PayloadSizeSection,

    #[serde(default)]
    pub throw_exception: ThrowExceptionSection,
}

impl Default for PropScopeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            enabled: true,
            environment: default_environment(),
            skip_in_production: false,
            payload_size: PayloadSizeSection::default(),
            throw_exception: ThrowExceptionSection::default(),
        }
    }
}

impl PropScopeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PropScopeError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.environment.trim().is_empty() {
            return Err(PropScopeError::InvalidConfig("environment must not be empty".into()));
        }

        self.payload_size.validate()?;

        Ok(())
    }

    /// Immutable core policy, built once at startup.
    pub fn to_policy(&self) -> PolicyConfig {
        PolicyConfig {
            enabled: self.enabled,
            threshold_kb: self.payload_size.threshold_in_kb,
            throw_on_duplicate_keys: self.throw_exception.on_duplicate_keys,
            throw_when_component_exceeds_total: self
                .throw_exception
                .when_component_props_size_exceed_total_props_size,
            max_tree_depth: self.payload_size.max_tree_depth,
            skip_in_production: self.skip_in_production,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadSizeSection {
    /// Soft limit 100-200 KB, hard limit 500 KB.
    #[serde(default = "default_threshold_in_kb")]
    pub threshold_in_kb: f64,

    /// 0 = unlimited.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
}

impl Default for PayloadSizeSection {
    fn default() -> Self {
        Self {
            threshold_in_kb: default_threshold_in_kb(),
            max_tree_depth: default_max_tree_depth(),
        }
    }
}

impl PayloadSizeSection {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_in_kb.is_finite() || self.threshold_in_kb <= 0.0 {
            return Err(PropScopeError::InvalidConfig(
                "payload_size.threshold_in_kb must be a positive number".into(),
            ));
        }
        if self.max_tree_depth > MAX_TREE_DEPTH_LIMIT {
            return Err(PropScopeError::InvalidConfig(format!(
                "payload_size.max_tree_depth must be between 0 and {MAX_TREE_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThrowExceptionSection {
    #[serde(default = "default_true")]
    pub on_duplicate_keys: bool,

    #[serde(default = "default_true")]
    pub when_component_props_size_exceed_total_props_size: bool,
}

impl Default for ThrowExceptionSection {
    fn default() -> Self {
        Self {
            on_duplicate_keys: true,
            when_component_props_size_exceed_total_props_size: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_environment() -> String {
    "local".into()
}
fn default_threshold_in_kb() -> f64 {
    DEFAULT_THRESHOLD_KB
}
fn default_max_tree_depth() -> usize {
    DEFAULT_MAX_TREE_DEPTH
}
