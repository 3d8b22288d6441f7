//! Fully connected (linear) layer.

use super::Module;
use crate::tensor::{RandomStream, Tensor};

/// Fully connected layer: y = xW^T + b.
///
/// Weight and bias are drawn uniformly from [-k, k) with k = 1/sqrt(fan_in),
/// weight first, so the rendered target case replays the identical
/// initialization from the pinned seed.
///
/// # Shape
///
/// - Input: `(*, in_features)`
/// - Output: `(*, out_features)`
pub struct Linear {
    /// Weight matrix, shape [out_features, in_features]
    weight: Tensor,
    /// Bias vector, shape [out_features]
    bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    #[must_use]
    pub fn new(rng: &mut RandomStream, in_features: usize, out_features: usize) -> Self {
        let k = (1.0 / in_features as f32).sqrt();
        let weight = rng.uniform(-k, k, &[out_features, in_features]);
        let bias = rng.uniform(-k, k, &[out_features]);
        Self {
            weight,
            bias,
            in_features,
            out_features,
        }
    }
}

impl Module for Linear {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert!(nd >= 1, "linear input needs a feature axis");
        assert_eq!(
            input.shape()[nd - 1],
            self.in_features,
            "linear expected {} input features, got {:?}",
            self.in_features,
            input.shape()
        );
        let rows = input.numel() / self.in_features;
        let xd = input.data();
        let wd = self.weight.data();
        let bd = self.bias.data();
        let mut out = Vec::with_capacity(rows * self.out_features);
        for r in 0..rows {
            let x = &xd[r * self.in_features..(r + 1) * self.in_features];
            for o in 0..self.out_features {
                let w = &wd[o * self.in_features..(o + 1) * self.in_features];
                let dot: f32 = x.iter().zip(w.iter()).map(|(a, b)| a * b).sum();
                out.push(dot + bd[o]);
            }
        }
        let mut shape = input.shape().to_vec();
        shape[nd - 1] = self.out_features;
        Tensor::new(out, &shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape() {
        let mut rng = RandomStream::new(11);
        let layer = Linear::new(&mut rng, 16, 5);
        let x = rng.uniform(0.0, 1.0, &[2, 8, 16]);
        let y = layer.forward(&mut rng, &x);
        assert_eq!(y.shape(), [2, 8, 5]);
    }

    #[test]
    fn test_same_seed_same_init() {
        let mut a = RandomStream::new(3);
        let mut b = RandomStream::new(3);
        let la = Linear::new(&mut a, 4, 2);
        let lb = Linear::new(&mut b, 4, 2);
        let x = Tensor::ones(&[1, 4]);
        assert_eq!(la.forward(&mut a, &x), lb.forward(&mut b, &x));
    }
}
