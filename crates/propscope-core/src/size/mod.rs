//! Payload sizing (serialized byte length + per-path size tree).
//!
//! Sizes are always the byte length of the compact JSON encoding, expressed in
//! KB (1024 bytes). Tree nodes keep 4 decimals; totals handed to callers keep 2.

pub mod encode;
pub mod tree;

pub use encode::{encoded_len, round_node_kb, round_total_kb};
pub use tree::{build_props_tree, build_size_tree, NodeKind, SizeNode, ROOT_KEY};
