//! Payload policy (configuration + evaluator).
//!
//! The evaluator turns two prop sets into a `MeasurementResult` and classifies
//! what it found: duplicate keys and the size invariant are fatal when the
//! config says so, threshold overruns are warnings handed to sinks.

pub mod config;
pub mod evaluator;

pub use config::PolicyConfig;
pub use evaluator::{evaluate, PayloadEvaluator};
