//! JSON test vector loader shared by evaluator tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

use propscope_core::{PolicyConfig, Props};

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub shared: Props,
    pub component: Props,
    #[serde(default)]
    pub config: ConfigOverrides,
    pub expect: Expect,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub threshold_kb: Option<f64>,
    pub throw_on_duplicate_keys: Option<bool>,
    pub throw_when_component_exceeds_total: Option<bool>,
    pub max_tree_depth: Option<usize>,
}

impl ConfigOverrides {
    pub fn to_policy(&self) -> PolicyConfig {
        let d = PolicyConfig::default();
        PolicyConfig {
            threshold_kb: self.threshold_kb.unwrap_or(d.threshold_kb),
            throw_on_duplicate_keys: self.throw_on_duplicate_keys.unwrap_or(d.throw_on_duplicate_keys),
            throw_when_component_exceeds_total: self
                .throw_when_component_exceeds_total
                .unwrap_or(d.throw_when_component_exceeds_total),
            max_tree_depth: self.max_tree_depth.unwrap_or(d.max_tree_depth),
            ..d
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Expect {
    pub total_size_kb: f64,
    pub component_size_kb: f64,
    pub exceeded_by_kb: f64,
    pub duplicate_keys: Vec<String>,
    pub warnings: usize,
    pub root_children: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
