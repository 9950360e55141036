//! Lightweight in-process payload metrics.
//!
//! Counters and a size histogram stored as atomics, rendered in Prometheus
//! text format by the `/metrics` handler. Nothing is pushed to an external
//! backend.

pub mod metrics;

pub use metrics::PayloadMetrics;
