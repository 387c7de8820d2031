#![allow(dead_code)]

use radix_calc::{EvalErrorKind, Evaluator};

/// Evaluate with a fresh evaluator, panicking on error.
pub fn eval(input: &str) -> f64 {
    Evaluator::new()
        .evaluate(input)
        .unwrap_or_else(|e| panic!("failed to evaluate {input:?}: {e}"))
}

/// Evaluate with a fresh evaluator and return the error kind.
pub fn eval_err(input: &str) -> EvalErrorKind {
    match Evaluator::new().evaluate(input) {
        Ok(value) => panic!("expected {input:?} to fail, got {value}"),
        Err(e) => e.kind,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}
