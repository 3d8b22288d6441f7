//! Output verification rendering.

use super::render::Render;
use crate::tensor::{Dtype, Tensor};

/// Relative tolerance applied to every numeric reduction statistic.
///
/// Applied in double precision before narrowing, so a statistic of 10.0
/// renders the accuracy literal 0.2 rather than a one-ulp neighbor.
pub const TOLERANCE: f64 = 0.02;

/// Render the assertion block for a named value.
///
/// Boolean arrays get their shape, dtype and the two logical reductions;
/// numeric arrays get shape, dtype and the mean/sum statistics, each with an
/// absolute accuracy of [`TOLERANCE`] times the statistic's magnitude. A
/// statistic of exactly zero therefore demands equality — catalogue entries
/// whose outputs are structurally zero-summing avoid this by verifying a
/// subset instead.
pub fn verify(backend: &dyn Render, expr: &str, value: &Tensor) -> String {
    let mut out = String::new();
    out += &backend.assert_shape(expr, value.shape());
    out += &backend.assert_dtype(expr, value.dtype());
    if value.dtype() == Dtype::Bool {
        out += &backend.assert_all(expr, value.all().item() != 0.0);
        out += &backend.assert_any(expr, value.any().item() != 0.0);
    } else {
        let mean = value.mean().item();
        out += &backend.assert_mean(expr, mean, accuracy_for(mean));
        let sum = value.sum().item();
        out += &backend.assert_sum(expr, sum, accuracy_for(sum));
    }
    out
}

/// Absolute accuracy for one reference statistic.
#[must_use]
pub fn accuracy_for(statistic: f32) -> f32 {
    (f64::from(statistic) * TOLERANCE).abs() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::render::RustBackend;

    #[test]
    fn test_numeric_block_has_four_assertions() {
        let backend = RustBackend::default();
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let block = verify(&backend, "result", &t);
        assert_eq!(block.lines().count(), 4);
        assert!(block.contains("shape"));
        assert!(block.contains("dtype"));
        assert!(block.contains("mean"));
        assert!(block.contains("sum"));
    }

    #[test]
    fn test_bool_block_has_no_statistics() {
        let backend = RustBackend::default();
        let bools = Tensor::with_dtype(vec![1.0, 0.0], &[2], Dtype::Bool);
        let block = verify(&backend, "result", &bools);
        assert!(block.contains(".all(), false"));
        assert!(block.contains(".any(), true"));
        assert!(!block.contains("mean"));
        assert!(!block.contains("sum"));
    }

    #[test]
    fn test_tolerance_is_two_percent_of_magnitude() {
        let backend = RustBackend::default();
        // Mean 10.0, sum 40.0 -> accuracies 0.2 and 0.8.
        let t = Tensor::full(&[2, 2], 10.0);
        let block = verify(&backend, "result", &t);
        assert!(block.contains("assert_close!(result.mean(), 10.0, 0.2);"), "{block}");
        assert!(block.contains("assert_close!(result.sum(), 40.0, 0.8);"), "{block}");
    }

    #[test]
    fn test_negative_statistic_gets_positive_accuracy() {
        let backend = RustBackend::default();
        let t = Tensor::full(&[2], -5.0);
        let block = verify(&backend, "result", &t);
        assert!(block.contains("assert_close!(result.mean(), -5.0, 0.1);"), "{block}");
    }
}
