//! Size tree builder.
//!
//! Walks an already-decoded JSON value and attributes serialized bytes to every
//! path. A node's total is the encoded length of its subtree; its own size is
//! the structural overhead (brackets, commas, quoted keys) left after removing
//! the children's totals.
//!
//! Byte counts are computed bottom-up from the children, so each value is
//! encoded at most once per walk (truncated subtrees are encoded whole).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::encode::{bytes_to_kb, encoded_len, round_node_kb};
use crate::error::Result;

/// Key reported for the root node.
pub const ROOT_KEY: &str = "root";

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Scalar,
    Array,
    Object,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

/// One path of the payload with its size attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeNode {
    pub key: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub own_size_kb: f64,
    pub total_size_kb: f64,
    pub child_count: usize,
    /// Sorted by `total_size_kb`, largest first.
    pub children: Vec<SizeNode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl SizeNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SizeNode::node_count).sum::<usize>()
    }

    /// Look up a descendant (or `self`) by its full path.
    pub fn find(&self, path: &str) -> Option<&SizeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Deepest level present in this subtree (`self` is 0).
    pub fn depth(&self) -> usize {
        self.children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }
}

/// Build the size tree of any JSON value. `max_depth == 0` means unlimited.
pub fn build_size_tree(value: &Value, max_depth: usize) -> Result<SizeNode> {
    let walker = Walker { max_depth };
    let (node, _) = walker.visit(value, String::new(), 0)?;
    Ok(node)
}

/// Build the size tree of a prop set (the root is the props object itself).
pub fn build_props_tree(props: &Map<String, Value>, max_depth: usize) -> Result<SizeNode> {
    let walker = Walker { max_depth };
    let (node, _) = walker.visit_map(props, String::new(), 0)?;
    Ok(node)
}

struct Walker {
    max_depth: usize,
}

impl Walker {
    fn cut_off(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }

    /// Returns the node plus the exact byte length of its subtree.
    fn visit(&self, value: &Value, path: String, depth: usize) -> Result<(SizeNode, usize)> {
        match value {
            Value::Object(map) => self.visit_map(map, path, depth),
            Value::Array(items) => self.visit_seq(items, path, depth),
            scalar => {
                let bytes = encoded_len(scalar)?;
                let node = leaf(path, NodeKind::Scalar, bytes, 0, self.cut_off(depth));
                Ok((node, bytes))
            }
        }
    }

    fn visit_map(
        &self,
        map: &Map<String, Value>,
        path: String,
        depth: usize,
    ) -> Result<(SizeNode, usize)> {
        if self.cut_off(depth) {
            let bytes = encoded_len(map)?;
            return Ok((leaf(path, NodeKind::Object, bytes, map.len(), true), bytes));
        }

        // `{` `}` plus one comma between entries
        let mut bytes = 2 + map.len().saturating_sub(1);
        let mut children = Vec::with_capacity(map.len());
        for (key, child) in map {
            let (node, child_bytes) = self.visit(child, key_child_path(&path, key), depth + 1)?;
            // `"key":`
            bytes += encoded_len(key.as_str())? + 1 + child_bytes;
            children.push(node);
        }

        Ok((branch(path, NodeKind::Object, bytes, children), bytes))
    }

    fn visit_seq(&self, items: &[Value], path: String, depth: usize) -> Result<(SizeNode, usize)> {
        if self.cut_off(depth) {
            let bytes = encoded_len(items)?;
            return Ok((leaf(path, NodeKind::Array, bytes, items.len(), true), bytes));
        }

        let mut bytes = 2 + items.len().saturating_sub(1);
        let mut children = Vec::with_capacity(items.len());
        for (idx, child) in items.iter().enumerate() {
            let (node, child_bytes) = self.visit(child, index_child_path(&path, idx), depth + 1)?;
            bytes += child_bytes;
            children.push(node);
        }

        Ok((branch(path, NodeKind::Array, bytes, children), bytes))
    }
}

fn leaf(path: String, kind: NodeKind, bytes: usize, child_count: usize, truncated: bool) -> SizeNode {
    let total = round_node_kb(bytes_to_kb(bytes));
    SizeNode {
        key: key_from_path(&path),
        path,
        kind,
        own_size_kb: total,
        total_size_kb: total,
        child_count,
        children: Vec::new(),
        truncated,
    }
}

fn branch(path: String, kind: NodeKind, bytes: usize, mut children: Vec<SizeNode>) -> SizeNode {
    // stable: equal sizes keep traversal order
    children.sort_by(|a, b| b.total_size_kb.total_cmp(&a.total_size_kb));

    let total = round_node_kb(bytes_to_kb(bytes));
    let children_total: f64 = children.iter().map(|c| c.total_size_kb).sum();
    let own = round_node_kb(total - children_total);

    SizeNode {
        key: key_from_path(&path),
        path,
        kind,
        // rounding can push the difference below zero (or to -0.0)
        own_size_kb: if own > 0.0 { own } else { 0.0 },
        total_size_kb: total,
        child_count: children.len(),
        children,
        truncated: false,
    }
}

// --------------------
// Path helpers
// --------------------

pub(crate) fn key_child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn index_child_path(parent: &str, idx: usize) -> String {
    format!("{parent}[{idx}]")
}

/// Last segment of a path: `user.tickets[0]` -> `0`, `user.name` -> `name`.
pub(crate) fn key_from_path(path: &str) -> String {
    if path.is_empty() {
        return ROOT_KEY.to_owned();
    }
    if let Some(idx) = trailing_index(path) {
        return idx.to_owned();
    }
    path.rsplit('.').next().unwrap_or(path).to_owned()
}

fn trailing_index(path: &str) -> Option<&str> {
    let inner = path.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let digits = &inner[open + 1..];
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
