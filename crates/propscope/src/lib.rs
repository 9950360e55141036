//! Top-level facade crate for propscope.
//!
//! Re-exports the measurement core and the Inertia response glue so users can depend on a single crate.

pub mod core {
    pub use propscope_core::*;
}

pub mod inertia {
    pub use propscope_inertia::*;
}
