//! Inertia response factory.
//!
//! Renders a component into the Inertia page object. Rendering is wrapped by
//! the core `measure` decorator: merged props feed the page, the measurement
//! is attached to the page props under the `_inertiaPayload*` fields, and
//! fatal policy violations abort the render.

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use propscope_core::error::{PropScopeError, Result};
use propscope_core::{measure, Measured, PayloadEvaluator, PropSource, Props};

use crate::obs::PayloadMetrics;
use crate::props::PropBag;

pub const X_INERTIA: &str = "x-inertia";

/// Inertia page object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub component: String,
    pub props: Props,
    pub url: String,
    pub version: Option<String>,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (HeaderName::from_static(X_INERTIA), HeaderValue::from_static("true")),
                (header::VARY, HeaderValue::from_static("X-Inertia")),
            ],
            Json(self),
        )
            .into_response()
    }
}

/// HTTP face of a render failure.
#[derive(Debug)]
pub struct ErrorResponse(pub PropScopeError);

impl From<PropScopeError> for ErrorResponse {
    fn from(e: PropScopeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        tracing::error!(code = self.0.code().as_str(), error = %self.0, "render failed");
        let body = json!({
            "error": {
                "code": self.0.code().as_str(),
                "message": self.0.to_string(),
            }
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Holds the shared props and the evaluator. Built once at startup.
pub struct ResponseFactory {
    shared: PropBag,
    version: Option<String>,
    evaluator: PayloadEvaluator,
    metrics: Option<Arc<PayloadMetrics>>,
}

impl ResponseFactory {
    pub fn new(evaluator: PayloadEvaluator) -> Self {
        Self {
            shared: PropBag::new(),
            version: None,
            evaluator,
            metrics: None,
        }
    }

    /// Share a prop with every render.
    pub fn share(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> &mut Self {
        self.shared.insert(key, value);
        self
    }

    pub fn share_lazy<F>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Result<serde_json::Value> + Send + Sync + 'static,
    {
        self.shared.insert_lazy(key, f);
        self
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    /// Replace the shared prop set.
    pub fn with_shared(mut self, shared: PropBag) -> Self {
        self.shared = shared;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PayloadMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn shared(&self) -> &PropBag {
        &self.shared
    }

    pub fn evaluator(&self) -> &PayloadEvaluator {
        &self.evaluator
    }

    pub fn render<C>(&self, component: &str, props: &C, url: &str) -> Result<Page>
    where
        C: PropSource + ?Sized,
    {
        self.render_with_shared(&self.shared, component, props, url)
    }

    /// Render against a request-scoped shared set instead of the factory's own.
    pub fn render_with_shared<S, C>(
        &self,
        shared: &S,
        component: &str,
        props: &C,
        url: &str,
    ) -> Result<Page>
    where
        S: PropSource + ?Sized,
        C: PropSource + ?Sized,
    {
        let Measured { mut response, evaluation } =
            measure(&self.evaluator, component, shared, props, |merged| Page {
                component: component.to_owned(),
                props: merged,
                url: url.to_owned(),
                version: self.version.clone(),
            })?;

        if let Some(eval) = evaluation {
            if let Some(m) = &self.metrics {
                m.record(component, &eval);
            }
            let result = eval.into_result()?;
            response.props.extend(result.envelope_props()?);
        }

        Ok(response)
    }
}
