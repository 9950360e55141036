//! propscope Inertia glue.
//!
//! Wires the measurement core into an Inertia-style response factory: config
//! loading, shared and lazy props, page rendering with the measurement
//! attached, payload metrics, and the operational router. Intended to be
//! consumed by the demo binary (`main.rs`), host applications, and
//! integration tests.

pub mod app_state;
pub mod config;
pub mod factory;
pub mod obs;
pub mod ops;
pub mod props;
pub mod router;

pub use factory::{ErrorResponse, Page, ResponseFactory};
pub use props::{Prop, PropBag};
