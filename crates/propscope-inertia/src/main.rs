//! propscope demo server
//!
//! - `/`        : sample dashboard page (Inertia JSON with payload stats)
//! - `/healthz` : liveness
//! - `/metrics` : payload metrics
//!
//! Config: `propscope.yaml` (optional) + `INERTIA_*` / `APP_ENV` overrides.

use std::net::SocketAddr;

use axum::{extract::State, routing::get, Router};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use propscope_inertia::{app_state::AppState, config, router, ErrorResponse, Page, PropBag};

const LISTEN: &str = "127.0.0.1:8080";

async fn dashboard(State(state): State<AppState>) -> Result<Page, ErrorResponse> {
    let props = PropBag::new()
        .with("title", "Dashboard")
        .with_lazy("tickets", || {
            Ok(json!((1..=25)
                .map(|id| json!({"id": id, "subject": format!("Ticket #{id}"), "status": "open"}))
                .collect::<Vec<_>>()))
        });

    Ok(state.factory().render("Dashboard/Index", &props, "/")?)
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut cfg = config::load_from_file_or_default("propscope.yaml").expect("config load failed");
    config::apply_process_env(&mut cfg).expect("invalid environment overrides");

    let shared = PropBag::new()
        .with("appName", "propscope demo")
        .with_lazy("auth", || Ok(json!({"user": {"id": 1, "name": "Demo User"}})));

    let state = AppState::new(cfg, shared, Some("demo-1".into())).expect("state init failed");
    let app = Router::new()
        .route("/", get(dashboard))
        .with_state(state.clone())
        .merge(router::build_router(state));

    let listen: SocketAddr = LISTEN.parse().expect("listen address must be a valid SocketAddr");
    tracing::info!(%listen, "propscope-demo starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
