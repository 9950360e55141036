//! Pluggable diagnostic sinks for threshold warnings.
//!
//! Warnings are never raised. They are handed to every installed sink and
//! dropped when none is installed.

use std::sync::Mutex;

use crate::report::ThresholdExceededWarning;

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, warning: &ThresholdExceededWarning);
}

/// Logs warnings through `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, w: &ThresholdExceededWarning) {
        tracing::warn!(
            component = %w.component,
            total_kb = w.total_size_kb,
            component_kb = w.component_size_kb,
            threshold_kb = w.threshold_kb,
            exceeded_kb = w.exceeded_by_kb,
            "{}",
            ThresholdExceededWarning::LABEL
        );
    }
}

/// Keeps warnings in memory (local inspectors, tests).
#[derive(Debug, Default)]
pub struct CollectingSink {
    inner: Mutex<Vec<ThresholdExceededWarning>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn warnings(&self) -> Vec<ThresholdExceededWarning> {
        match self.inner.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn drain(&self) -> Vec<ThresholdExceededWarning> {
        match self.inner.lock() {
            Ok(mut g) => std::mem::take(&mut *g),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, warning: &ThresholdExceededWarning) {
        // A poisoned lock only means another reporter panicked; keep collecting.
        match self.inner.lock() {
            Ok(mut g) => g.push(warning.clone()),
            Err(poisoned) => poisoned.into_inner().push(warning.clone()),
        }
    }
}
