//! propscope core: payload measurement for Inertia-style page props.
//!
//! Given the shared props and the component props of one render, this crate
//! detects colliding keys, sizes the merged and the component-only payload,
//! breaks the merged payload down into a per-path size tree, and classifies
//! the findings against a `PolicyConfig`. It carries no transport or runtime
//! dependencies; response glue lives in `propscope-inertia`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `PropScopeError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;
pub mod render;
pub mod report;
pub mod sink;
pub mod size;
pub mod source;

/// Shared result type.
pub use error::{ErrorCode, PropScopeError, Result};
pub use policy::{evaluate, PayloadEvaluator, PolicyConfig};
pub use render::{measure, Measured};
pub use report::{Evaluation, MeasurementResult, ThresholdExceededWarning};
pub use sink::{CollectingSink, DiagnosticSink, TracingSink};
pub use size::{build_props_tree, build_size_tree, NodeKind, SizeNode};
pub use source::{MergedProps, PropSource, Props};
