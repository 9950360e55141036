#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{json, Value};

use propscope_core::{PayloadEvaluator, PolicyConfig};
use propscope_inertia::{
    app_state::AppState, config::PropScopeConfig, obs::PayloadMetrics, ops, ErrorResponse,
    PropBag, ResponseFactory,
};

fn factory(policy: PolicyConfig) -> ResponseFactory {
    ResponseFactory::new(PayloadEvaluator::new(Arc::new(policy)))
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn render_attaches_measurement() {
    let mut f = factory(PolicyConfig::default());
    f.share("auth", json!({"user": {"id": 1}})).set_version("v1");

    let props = PropBag::new().with("title", "Home");
    let page = f.render("Home/Index", &props, "/home").unwrap();

    assert_eq!(page.component, "Home/Index");
    assert_eq!(page.url, "/home");
    assert_eq!(page.version.as_deref(), Some("v1"));
    assert_eq!(page.props["title"], "Home");
    assert_eq!(page.props["auth"]["user"]["id"], 1);
    assert_eq!(page.props["_inertiaPayloadThresholdInKb"], 500.0);
    assert_eq!(page.props["_inertiaPayloadExceededInKb"], 0.0);
    assert_eq!(page.props["_inertiaPayloadDuplicateKeys"], json!([]));

    let tree = &page.props["_inertiaPayloadSizeTree"];
    assert_eq!(tree["key"], "root");
    assert_eq!(tree["childCount"], 2);
    // auth is larger than title
    assert_eq!(tree["children"][0]["key"], "auth");
}

#[test]
fn disabled_renders_plain_page() {
    let mut f = factory(PolicyConfig { enabled: false, ..PolicyConfig::default() });
    f.share("title", "App");

    let props = PropBag::new().with("title", "Home");
    let page = f.render("Home/Index", &props, "/").unwrap();
    assert_eq!(page.props.len(), 1);
    assert_eq!(page.props["title"], "Home");
}

#[test]
fn duplicate_keys_abort_render() {
    let mut f = factory(PolicyConfig::default());
    f.share("title", "App");

    let err = f
        .render("Home/Index", &PropBag::new().with("title", "Home"), "/")
        .unwrap_err();
    assert_eq!(err.code().as_str(), "DUPLICATE_KEYS");
    assert!(err.to_string().contains("title"));
}

#[test]
fn lazy_component_props_resolve_per_pass() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let props = PropBag::new().with_lazy("stats", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"open": 3}))
    });

    factory(PolicyConfig::default()).render("Stats", &props, "/stats").unwrap();
    // merged pass + component-only pass
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    hits.store(0, Ordering::SeqCst);
    factory(PolicyConfig { enabled: false, ..PolicyConfig::default() })
        .render("Stats", &props, "/stats")
        .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn growing_lazy_prop_violates_size_invariant() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let props = PropBag::new().with_lazy("post", move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let comments: Vec<&str> = if n == 0 { vec![] } else { vec!["eager"; 200] };
        Ok(json!({"id": 1, "comments": comments}))
    });

    let err = factory(PolicyConfig::default()).render("Posts/Show", &props, "/posts/1").unwrap_err();
    assert_eq!(err.code().as_str(), "SIZE_INVARIANT_VIOLATION");
}

#[test]
fn metrics_count_renders_and_warnings() {
    let metrics = Arc::new(PayloadMetrics::new());
    let evaluator = PayloadEvaluator::new(Arc::new(PolicyConfig {
        threshold_kb: 0.01,
        ..PolicyConfig::default()
    }))
    .with_sink(metrics.clone());
    let f = ResponseFactory::new(evaluator).with_metrics(metrics.clone());

    let props = PropBag::new().with("rows", vec![1; 100]);
    f.render("Reports", &props, "/reports").unwrap();
    f.render("Reports", &props, "/reports").unwrap();

    assert_eq!(metrics.renders_measured.get(&[("component", "Reports")]), 2);
    assert_eq!(metrics.threshold_warnings.get(&[("component", "Reports")]), 2);
    let text = metrics.render();
    assert!(text.contains("propscope_renders_measured_total{component=\"Reports\"} 2"));
    assert!(text.contains("propscope_payload_size_bytes_count{component=\"Reports\"} 2"));
}

#[tokio::test]
async fn page_response_has_inertia_headers() {
    let page = factory(PolicyConfig::default())
        .render("Home", &PropBag::new().with("title", "Home"), "/")
        .unwrap();
    let resp = page.into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-inertia"], "true");
    assert_eq!(resp.headers()["vary"], "X-Inertia");

    let body = body_json(resp).await;
    assert_eq!(body["component"], "Home");
    assert_eq!(body["url"], "/");
    assert_eq!(body["version"], Value::Null);
    assert_eq!(body["props"]["title"], "Home");
    assert!(body["props"]["_inertiaPayloadTotalSizeInKb"].is_number());
}

#[tokio::test]
async fn error_response_carries_code() {
    let mut f = factory(PolicyConfig::default());
    f.share("title", "App");
    let err = f.render("Home", &PropBag::new().with("title", "x"), "/").unwrap_err();

    let resp = ErrorResponse::from(err).into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_KEYS");
}

#[tokio::test]
async fn app_state_wires_metrics_endpoint() {
    let cfg = PropScopeConfig {
        environment: "testing".into(),
        ..PropScopeConfig::default()
    };
    let state = AppState::new(cfg, PropBag::new().with("appName", "test"), None).unwrap();
    state
        .factory()
        .render("Home", &PropBag::new().with("title", "Home"), "/")
        .unwrap();

    let resp = ops::metrics(State(state.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("propscope_renders_measured_total{component=\"Home\"} 1"));
}

#[test]
fn production_gate_from_config() {
    let cfg = PropScopeConfig {
        environment: "production".into(),
        skip_in_production: true,
        ..PropScopeConfig::default()
    };
    let state = AppState::new(cfg, PropBag::new().with("title", "App"), None).unwrap();
    // duplicate key would be fatal if measured
    let page = state
        .factory()
        .render("Home", &PropBag::new().with("title", "Home"), "/")
        .unwrap();
    assert!(page.props.get("_inertiaPayloadSizeTree").is_none());
}
