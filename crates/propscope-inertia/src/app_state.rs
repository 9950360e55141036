//! Shared application state for the demo server and integration tests.

use std::sync::Arc;

use propscope_core::error::Result;
use propscope_core::{PayloadEvaluator, TracingSink};

use crate::config::PropScopeConfig;
use crate::factory::ResponseFactory;
use crate::obs::PayloadMetrics;
use crate::props::PropBag;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: PropScopeConfig,
    factory: ResponseFactory,
    metrics: Arc<PayloadMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: PropScopeConfig, shared: PropBag, version: Option<String>) -> Result<Self> {
        cfg.validate()?;
        let policy = cfg.to_policy();
        policy.validate()?;

        let metrics = Arc::new(PayloadMetrics::new());
        let evaluator = PayloadEvaluator::new(Arc::new(policy))
            .with_environment(cfg.environment.clone())
            .with_sink(Arc::new(TracingSink))
            .with_sink(metrics.clone());

        let mut factory = ResponseFactory::new(evaluator)
            .with_shared(shared)
            .with_metrics(Arc::clone(&metrics));
        if let Some(v) = version {
            factory.set_version(v);
        }

        if !factory.evaluator().is_active() {
            tracing::info!(env = %cfg.environment, "payload measurement inactive");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, factory, metrics }),
        })
    }

    pub fn cfg(&self) -> &PropScopeConfig {
        &self.inner.cfg
    }

    pub fn factory(&self) -> &ResponseFactory {
        &self.inner.factory
    }

    pub fn metrics(&self) -> Arc<PayloadMetrics> {
        Arc::clone(&self.inner.metrics)
    }
}
