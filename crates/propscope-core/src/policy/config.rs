//! Payload policy configuration (immutable after startup).

use crate::error::{PropScopeError, Result};

pub const DEFAULT_THRESHOLD_KB: f64 = 500.0;
pub const DEFAULT_MAX_TREE_DEPTH: usize = 10;
/// Upper bound accepted for `max_tree_depth` (0 still means unlimited).
pub const MAX_TREE_DEPTH_LIMIT: usize = 64;

/// Environment name that `skip_in_production` gates on.
pub const PRODUCTION_ENV: &str = "production";

/// Process-wide measurement policy.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    pub enabled: bool,
    pub threshold_kb: f64,
    pub throw_on_duplicate_keys: bool,
    pub throw_when_component_exceeds_total: bool,
    /// 0 = unlimited.
    pub max_tree_depth: usize,
    /// Opt-in: never measure when the host runs in `production`.
    pub skip_in_production: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_kb: DEFAULT_THRESHOLD_KB,
            throw_on_duplicate_keys: true,
            throw_when_component_exceeds_total: true,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            skip_in_production: false,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_kb.is_finite() || self.threshold_kb <= 0.0 {
            return Err(PropScopeError::InvalidConfig(
                "threshold_kb must be a positive number".into(),
            ));
        }
        if self.max_tree_depth > MAX_TREE_DEPTH_LIMIT {
            return Err(PropScopeError::InvalidConfig(format!(
                "max_tree_depth must be between 0 and {MAX_TREE_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Whether renders in `environment` should be measured at all.
    pub fn measures_in(&self, environment: &str) -> bool {
        if !self.enabled {
            return false;
        }
        !(self.skip_in_production && environment.eq_ignore_ascii_case(PRODUCTION_ENV))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PolicyConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.threshold_kb, 500.0);
        assert_eq!(cfg.max_tree_depth, 10);
        assert!(cfg.throw_on_duplicate_keys);
        assert!(cfg.throw_when_component_exceeds_total);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        for threshold_kb in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = PolicyConfig { threshold_kb, ..PolicyConfig::default() };
            let err = cfg.validate().unwrap_err();
            assert_eq!(err.code().as_str(), "INVALID_CONFIG");
        }
    }

    #[test]
    fn production_gate_is_opt_in() {
        let cfg = PolicyConfig::default();
        assert!(cfg.measures_in("production"));

        let gated = PolicyConfig { skip_in_production: true, ..PolicyConfig::default() };
        assert!(!gated.measures_in("production"));
        assert!(!gated.measures_in("Production"));
        assert!(gated.measures_in("local"));

        let off = PolicyConfig { enabled: false, ..PolicyConfig::default() };
        assert!(!off.measures_in("local"));
    }
}
