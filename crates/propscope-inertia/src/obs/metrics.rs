//! Payload metrics registry.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Histogram buckets are fixed in bytes to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use propscope_core::size::encode::BYTES_PER_KB;
use propscope_core::{DiagnosticSink, Evaluation, ThresholdExceededWarning};

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Sorted snapshot so renders are stable across calls.
fn sorted_keys<V>(map: &DashMap<LabelKey, V>) -> Vec<LabelKey> {
    let mut keys: Vec<LabelKey> = map.iter().map(|r| r.key().clone()).collect();
    keys.sort();
    keys
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for key in sorted_keys(&self.map) {
            if let Some(r) = self.map.get(&key) {
                let _ = writeln!(out, "{}{{{}}} {}", name, label_str(&key), r.load(Ordering::Relaxed));
            }
        }
    }
}

// 1KB, 10KB, 50KB, 100KB, 200KB, 500KB, 1MB, 5MB
const BUCKETS_BYTES: [u64; 8] = [
    1_024, 10_240, 51_200, 102_400, 204_800, 512_000, 1_048_576, 5_242_880,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 8],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a payload size and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], bytes: u64) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(bytes, Ordering::Relaxed);

        for (i, &b) in BUCKETS_BYTES.iter().enumerate() {
            if bytes <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Render in Prometheus text exposition format (unit: bytes).
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for key in sorted_keys(&self.map) {
            let Some(hist) = self.map.get(&key) else { continue };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_BYTES.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// Per-component payload counters. Doubles as a diagnostic sink so threshold
/// warnings are counted wherever the evaluator reports them.
#[derive(Default)]
pub struct PayloadMetrics {
    pub renders_measured: CounterVec,
    pub threshold_warnings: CounterVec,
    pub policy_violations: CounterVec,
    pub payload_size: HistogramVec,
}

impl PayloadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluated render.
    pub fn record(&self, component: &str, eval: &Evaluation) {
        let labels = [("component", component)];
        self.renders_measured.inc(&labels);
        let bytes = (eval.result.total_size_kb * BYTES_PER_KB).round().max(0.0) as u64;
        self.payload_size.observe(&labels, bytes);
        for err in &eval.errors {
            self.policy_violations
                .inc(&[("component", component), ("code", err.code().as_str())]);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.renders_measured.render("propscope_renders_measured_total", &mut out);
        self.threshold_warnings.render("propscope_threshold_warnings_total", &mut out);
        self.policy_violations.render("propscope_policy_violations_total", &mut out);
        self.payload_size.render("propscope_payload_size_bytes", &mut out);
        out
    }
}

impl DiagnosticSink for PayloadMetrics {
    fn report(&self, warning: &ThresholdExceededWarning) {
        self.threshold_warnings.inc(&[("component", warning.component.as_str())]);
    }
}
