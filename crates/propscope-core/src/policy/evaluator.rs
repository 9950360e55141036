use std::sync::Arc;

use crate::error::{PropScopeError, Result};
use crate::report::{Evaluation, MeasurementResult, ThresholdExceededWarning};
use crate::sink::DiagnosticSink;
use crate::size::{build_props_tree, encode::bytes_to_kb, encoded_len, round_total_kb};
use crate::source::{MergedProps, PropSource};

use super::config::PolicyConfig;

/// Payload evaluator bound to a policy and a set of diagnostic sinks.
/// Construct once at startup, then share via Arc; evaluation never mutates it.
#[derive(Clone)]
pub struct PayloadEvaluator {
    config: Arc<PolicyConfig>,
    environment: String,
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl PayloadEvaluator {
    pub fn new(config: Arc<PolicyConfig>) -> Self {
        Self {
            config,
            environment: String::new(),
            sinks: Vec::new(),
        }
    }

    /// Host environment name, consulted by `skip_in_production`.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// False when measurement is switched off (or gated for this environment).
    pub fn is_active(&self) -> bool {
        self.config.measures_in(&self.environment)
    }

    /// Full pipeline. Returns `Ok(None)` without resolving anything when inactive.
    ///
    /// `Err` is reserved for resolution/serialization failures; policy
    /// violations are collected in `Evaluation::errors`.
    pub fn evaluate<S, C>(&self, component: &str, shared: &S, props: &C) -> Result<Option<Evaluation>>
    where
        S: PropSource + ?Sized,
        C: PropSource + ?Sized,
    {
        if !self.is_active() {
            tracing::trace!(component, env = %self.environment, "payload measurement skipped");
            return Ok(None);
        }
        let merged = MergedProps::resolve(shared, props)?;
        self.evaluate_merged(component, &merged, props).map(Some)
    }

    /// Measure an already merged prop set. `props` is resolved once more on
    /// its own: sizing the component set must not reuse the merged pass,
    /// since resolving again can observe side effects of the first pass.
    pub fn evaluate_merged<C>(
        &self,
        component: &str,
        merged: &MergedProps,
        props: &C,
    ) -> Result<Evaluation>
    where
        C: PropSource + ?Sized,
    {
        let cfg = &*self.config;
        let mut errors = Vec::new();

        if !merged.duplicate_keys.is_empty() && cfg.throw_on_duplicate_keys {
            errors.push(PropScopeError::DuplicateKeys {
                keys: merged.duplicate_keys.clone(),
            });
        }

        let component_props = props.resolve()?;
        let total_size_kb = round_total_kb(bytes_to_kb(encoded_len(&merged.props)?));
        let component_size_kb = round_total_kb(bytes_to_kb(encoded_len(&component_props)?));

        let exceeded_by_kb = if total_size_kb > cfg.threshold_kb {
            round_total_kb(total_size_kb - cfg.threshold_kb)
        } else {
            0.0
        };

        let size_tree = build_props_tree(&merged.props, cfg.max_tree_depth)?;

        if component_size_kb > total_size_kb && cfg.throw_when_component_exceeds_total {
            errors.push(PropScopeError::SizeInvariantViolation {
                component_kb: component_size_kb,
                total_kb: total_size_kb,
            });
        }

        let result = MeasurementResult {
            total_size_kb,
            component_size_kb,
            threshold_kb: cfg.threshold_kb,
            exceeded_by_kb,
            duplicate_keys: merged.duplicate_keys.clone(),
            size_tree,
        };

        tracing::debug!(
            component,
            total_kb = total_size_kb,
            component_kb = component_size_kb,
            nodes = result.size_tree.node_count(),
            duplicates = result.duplicate_keys.len(),
            "payload measured"
        );

        let mut warnings = Vec::new();
        if result.exceeds_threshold() {
            let warning = ThresholdExceededWarning::from_result(component, &result);
            for sink in &self.sinks {
                sink.report(&warning);
            }
            warnings.push(warning);
        }

        Ok(Evaluation {
            result,
            errors,
            warnings,
        })
    }
}

impl std::fmt::Debug for PayloadEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadEvaluator")
            .field("config", &self.config)
            .field("environment", &self.environment)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// One-shot evaluation against `config` with no sinks installed.
pub fn evaluate<S, C>(
    component: &str,
    shared: &S,
    props: &C,
    config: &PolicyConfig,
) -> Result<Option<Evaluation>>
where
    S: PropSource + ?Sized,
    C: PropSource + ?Sized,
{
    PayloadEvaluator::new(Arc::new(config.clone())).evaluate(component, shared, props)
}
