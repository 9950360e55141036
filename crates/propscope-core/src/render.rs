//! Render decorator.
//!
//! Wraps an opaque render capability: props are resolved and merged, handed to
//! `render`, and measured alongside when the evaluator is active.

use crate::error::Result;
use crate::policy::PayloadEvaluator;
use crate::report::Evaluation;
use crate::source::{MergedProps, PropSource, Props};

/// Rendered output plus the evaluation of its props (None when inactive).
#[derive(Debug)]
pub struct Measured<R> {
    pub response: R,
    pub evaluation: Option<Evaluation>,
}

impl<R> Measured<R> {
    /// Raise the first fatal policy error, otherwise return the response.
    pub fn into_result(self) -> Result<(R, Option<Evaluation>)> {
        if let Some(err) = self.evaluation.as_ref().and_then(|e| e.errors.first()) {
            return Err(err.clone());
        }
        Ok((self.response, self.evaluation))
    }
}

pub fn measure<S, C, R, F>(
    evaluator: &PayloadEvaluator,
    component: &str,
    shared: &S,
    props: &C,
    render: F,
) -> Result<Measured<R>>
where
    S: PropSource + ?Sized,
    C: PropSource + ?Sized,
    F: FnOnce(Props) -> R,
{
    let merged = MergedProps::resolve(shared, props)?;
    let evaluation = if evaluator.is_active() {
        Some(evaluator.evaluate_merged(component, &merged, props)?)
    } else {
        None
    };

    Ok(Measured {
        response: render(merged.props),
        evaluation,
    })
}
