//! Activation function modules.
//!
//! Elementwise activations are unit structs; the handful with shape effects
//! (GLU's gating split, the softmax pair) normalize along the last axis.

use super::Module;
use crate::tensor::ops::{erf, sigmoid, softplus};
use crate::tensor::{Dtype, RandomStream, Tensor};

/// Rectified linear unit: max(0, x).
#[derive(Debug, Clone, Copy, Default)]
pub struct Relu;

impl Relu {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Relu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v.max(0.0))
    }
}

/// ReLU clipped at six: min(max(0, x), 6).
#[derive(Debug, Clone, Copy, Default)]
pub struct Relu6;

impl Relu6 {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Relu6 {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v.max(0.0).min(6.0))
    }
}

/// Leaky ReLU with the conventional 0.01 negative slope.
#[derive(Debug, Clone, Copy)]
pub struct LeakyRelu {
    negative_slope: f32,
}

impl LeakyRelu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            negative_slope: 0.01,
        }
    }
}

impl Default for LeakyRelu {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for LeakyRelu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let slope = self.negative_slope;
        input.map(|v| if v > 0.0 { v } else { slope * v })
    }
}

/// Parametric ReLU with its weight at the conventional 0.25 start value.
#[derive(Debug, Clone, Copy)]
pub struct PRelu {
    alpha: f32,
}

impl PRelu {
    #[must_use]
    pub fn new() -> Self {
        Self { alpha: 0.25 }
    }
}

impl Default for PRelu {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for PRelu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let alpha = self.alpha;
        input.map(|v| v.max(0.0) + alpha * v.min(0.0))
    }
}

/// Logistic sigmoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Sigmoid {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(sigmoid)
    }
}

/// Hyperbolic tangent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl Tanh {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Tanh {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(f32::tanh)
    }
}

/// Gaussian error linear unit (erf formulation).
#[derive(Debug, Clone, Copy, Default)]
pub struct Gelu;

impl Gelu {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Gelu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| 0.5 * v * (1.0 + erf(v / std::f32::consts::SQRT_2)))
    }
}

/// SiLU / swish: x * sigmoid(x).
#[derive(Debug, Clone, Copy, Default)]
pub struct Silu;

impl Silu {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Silu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v * sigmoid(v))
    }
}

/// Mish: x * tanh(softplus(x)).
#[derive(Debug, Clone, Copy, Default)]
pub struct Mish;

impl Mish {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Mish {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v * softplus(v).tanh())
    }
}

/// Softplus: ln(1 + e^x).
#[derive(Debug, Clone, Copy, Default)]
pub struct Softplus;

impl Softplus {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Softplus {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(softplus)
    }
}

/// Softsign: x / (1 + |x|).
#[derive(Debug, Clone, Copy, Default)]
pub struct Softsign;

impl Softsign {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Softsign {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v / (1.0 + v.abs()))
    }
}

/// CELU with unit alpha: max(0, x) + min(0, e^x - 1).
#[derive(Debug, Clone, Copy)]
pub struct Celu {
    alpha: f32,
}

impl Celu {
    #[must_use]
    pub fn new() -> Self {
        Self { alpha: 1.0 }
    }
}

impl Default for Celu {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Celu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let alpha = self.alpha;
        input.map(|v| v.max(0.0) + (alpha * ((v / alpha).exp() - 1.0)).min(0.0))
    }
}

/// SELU (Klambauer et al., 2017) with the published constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selu;

impl Selu {
    const SCALE: f32 = 1.050_701;
    const ALPHA: f32 = 1.673_263_2;

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Selu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| Self::SCALE * (v.max(0.0) + (Self::ALPHA * (v.exp() - 1.0)).min(0.0)))
    }
}

/// Hard swish: x * min(max(x + 3, 0), 6) / 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardSwish;

impl HardSwish {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for HardSwish {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| v * (v + 3.0).max(0.0).min(6.0) / 6.0)
    }
}

/// Log-sigmoid: -softplus(-x).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSigmoid;

impl LogSigmoid {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for LogSigmoid {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| -softplus(-v))
    }
}

/// Heaviside step at zero. Output stays float-typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Step;

impl Step {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Step {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.map(|v| if v > 0.0 { 1.0 } else { 0.0 })
    }
}

/// Softmax along the last axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Softmax;

impl Softmax {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Softmax {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        input.softmax_axis(-1)
    }
}

/// Log-softmax along the last axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSoftmax;

impl LogSoftmax {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for LogSoftmax {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        let m = input.max_over(&[nd - 1], true);
        let shifted = input.zip(&m, Dtype::Float32, |x, mx| x - mx);
        let lse = shifted.map(f32::exp).sum_over(&[nd - 1], true).map(f32::ln);
        let total = m.zip(&lse, Dtype::Float32, |a, b| a + b);
        input.zip(&total, Dtype::Float32, |x, t| x - t)
    }
}

/// Gated linear unit: splits the last axis in half and gates the first half
/// with the sigmoid of the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct Glu;

impl Glu {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Module for Glu {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert!(nd > 0, "GLU needs at least one axis");
        let last = input.shape()[nd - 1];
        assert_eq!(last % 2, 0, "GLU last axis {} must be even", last);
        let half = last / 2;
        let mut shape = input.shape().to_vec();
        shape[nd - 1] = half;
        let mut data = Vec::with_capacity(input.numel() / 2);
        for lane in input.data().chunks(last) {
            for i in 0..half {
                data.push(lane[i] * sigmoid(lane[half + i]));
            }
        }
        Tensor::new(data, &shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> RandomStream {
        RandomStream::new(0)
    }

    #[test]
    fn test_relu_clamps_negatives() {
        let x = Tensor::new(vec![-1.0, 0.0, 2.0], &[3]);
        let y = Relu::new().forward(&mut rng(), &x);
        assert_eq!(y.data(), &[0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_relu6_upper_clip() {
        let x = Tensor::new(vec![-1.0, 3.0, 9.0], &[3]);
        let y = Relu6::new().forward(&mut rng(), &x);
        assert_eq!(y.data(), &[0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_sigmoid_midpoint() {
        let x = Tensor::scalar(0.0);
        let y = Sigmoid::new().forward(&mut rng(), &x);
        assert!((y.item() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gelu_fixed_points() {
        let x = Tensor::new(vec![0.0, 100.0], &[2]);
        let y = Gelu::new().forward(&mut rng(), &x);
        assert!(y.data()[0].abs() < 1e-6);
        assert!((y.data()[1] - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_step_is_binary() {
        let x = Tensor::new(vec![-0.5, 0.0, 0.5], &[3]);
        let y = Step::new().forward(&mut rng(), &x);
        assert_eq!(y.data(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_softmax_rows_normalize() {
        let x = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let y = Softmax::new().forward(&mut rng(), &x);
        let rows = y.sum_axis(-1);
        for &r in rows.data() {
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_log_softmax_exponentiates_to_softmax() {
        let x = Tensor::new(vec![0.3, -1.2, 0.8, 2.0], &[2, 2]);
        let ls = LogSoftmax::new().forward(&mut rng(), &x);
        let sm = Softmax::new().forward(&mut rng(), &x);
        for (a, b) in ls.data().iter().zip(sm.data().iter()) {
            assert!((a.exp() - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_glu_halves_last_axis() {
        let x = Tensor::new(vec![1.0, 2.0, 0.0, 0.0], &[1, 4]);
        let y = Glu::new().forward(&mut rng(), &x);
        assert_eq!(y.shape(), [1, 2]);
        assert!((y.data()[0] - 0.5).abs() < 1e-6);
        assert!((y.data()[1] - 1.0).abs() < 1e-6);
    }
}
