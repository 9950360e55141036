//! Measurement output: the result record attached to the page, the warning
//! handed to diagnostic sinks, and the per-render evaluation bundle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PropScopeError, Result};
use crate::size::SizeNode;

/// Sizes of one render. Field names are the stable envelope names the client
/// reads, so the struct serializes straight into page props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    #[serde(rename = "_inertiaPayloadTotalSizeInKb")]
    pub total_size_kb: f64,
    #[serde(rename = "_inertiaPayloadComponentSizeInKb")]
    pub component_size_kb: f64,
    #[serde(rename = "_inertiaPayloadThresholdInKb")]
    pub threshold_kb: f64,
    /// 0 when the total is within the threshold.
    #[serde(rename = "_inertiaPayloadExceededInKb")]
    pub exceeded_by_kb: f64,
    /// Keys present in both shared and component props, in shared-prop order.
    #[serde(rename = "_inertiaPayloadDuplicateKeys")]
    pub duplicate_keys: Vec<String>,
    #[serde(rename = "_inertiaPayloadSizeTree")]
    pub size_tree: SizeNode,
}

impl MeasurementResult {
    pub fn exceeds_threshold(&self) -> bool {
        self.total_size_kb > self.threshold_kb
    }

    /// Envelope fields to merge into the outgoing page props.
    pub fn envelope_props(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(PropScopeError::Serialization(format!(
                "measurement encoded as {other}, expected an object"
            ))),
        }
    }
}

/// Non-fatal: the merged payload is larger than the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdExceededWarning {
    pub component: String,
    #[serde(rename = "_inertiaPayloadTotalSizeInKb")]
    pub total_size_kb: f64,
    #[serde(rename = "_inertiaPayloadComponentSizeInKb")]
    pub component_size_kb: f64,
    #[serde(rename = "_inertiaPayloadThresholdInKb")]
    pub threshold_kb: f64,
    #[serde(rename = "_inertiaPayloadExceededInKb")]
    pub exceeded_by_kb: f64,
}

impl ThresholdExceededWarning {
    pub const LABEL: &'static str = "Inertia Payload Size Warning";

    pub fn from_result(component: &str, result: &MeasurementResult) -> Self {
        Self {
            component: component.to_owned(),
            total_size_kb: result.total_size_kb,
            component_size_kb: result.component_size_kb,
            threshold_kb: result.threshold_kb,
            exceeded_by_kb: result.exceeded_by_kb,
        }
    }
}

/// Everything one evaluation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: MeasurementResult,
    /// Fatal policy violations, in detection order.
    pub errors: Vec<PropScopeError>,
    pub warnings: Vec<ThresholdExceededWarning>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Raise the first fatal error, or hand back the result.
    pub fn into_result(self) -> Result<MeasurementResult> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}
