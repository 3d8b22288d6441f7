//! Normalization layers.
//!
//! All five layers normalize with population statistics and eps = 1e-5;
//! affine parameters start at identity (scale one, shift zero) and therefore
//! draw nothing from the engine stream. The whole-tensor mean of most of
//! these outputs is structurally near zero, which is why the layer catalogue
//! verifies them on a column or single-element subset.

use super::Module;
use crate::tensor::{Dtype, RandomStream, Tensor};

const EPS: f32 = 1e-5;

/// Layer normalization over the last axis.
#[derive(Debug, Clone)]
pub struct LayerNorm {
    dims: usize,
    weight: Tensor,
    bias: Tensor,
}

impl LayerNorm {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            weight: Tensor::ones(&[dims]),
            bias: Tensor::zeros(&[dims]),
        }
    }
}

impl Module for LayerNorm {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert_eq!(
            input.shape()[nd - 1],
            self.dims,
            "LayerNorm expected {} features, got {:?}",
            self.dims,
            input.shape()
        );
        let mean = input.mean_over(&[nd - 1], true);
        let var = input
            .zip(&mean, Dtype::Float32, |x, m| (x - m) * (x - m))
            .mean_over(&[nd - 1], true);
        let centered = input.zip(&mean, Dtype::Float32, |x, m| x - m);
        let normalized = centered.zip(&var, Dtype::Float32, |c, v| c / (v + EPS).sqrt());
        normalized
            .zip(&self.weight, Dtype::Float32, |n, w| n * w)
            .zip(&self.bias, Dtype::Float32, |n, b| n + b)
    }
}

/// Root-mean-square normalization over the last axis (Zhang & Sennrich, 2019).
#[derive(Debug, Clone)]
pub struct RmsNorm {
    dims: usize,
    weight: Tensor,
}

impl RmsNorm {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            weight: Tensor::ones(&[dims]),
        }
    }
}

impl Module for RmsNorm {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert_eq!(
            input.shape()[nd - 1],
            self.dims,
            "RmsNorm expected {} features, got {:?}",
            self.dims,
            input.shape()
        );
        let ms = input.map(|v| v * v).mean_over(&[nd - 1], true);
        let normalized = input.zip(&ms, Dtype::Float32, |x, m| x / (m + EPS).sqrt());
        normalized.zip(&self.weight, Dtype::Float32, |n, w| n * w)
    }
}

/// Instance normalization: statistics per (batch, channel) pair over the
/// interior axes. No affine parameters.
#[derive(Debug, Clone)]
pub struct InstanceNorm {
    #[allow(dead_code)]
    dims: usize,
}

impl InstanceNorm {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Module for InstanceNorm {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert!(nd >= 3, "InstanceNorm expects (N, ..., C) input, got {:?}", input.shape());
        let interior: Vec<usize> = (1..nd - 1).collect();
        let mean = input.mean_over(&interior, true);
        let var = input
            .zip(&mean, Dtype::Float32, |x, m| (x - m) * (x - m))
            .mean_over(&interior, true);
        let centered = input.zip(&mean, Dtype::Float32, |x, m| x - m);
        centered.zip(&var, Dtype::Float32, |c, v| c / (v + EPS).sqrt())
    }
}

/// Group normalization: channels split into groups, statistics per
/// (batch, group) over interior axes and in-group channels.
#[derive(Debug, Clone)]
pub struct GroupNorm {
    groups: usize,
    dims: usize,
}

impl GroupNorm {
    /// # Panics
    ///
    /// Panics if `dims` is not divisible by `groups`.
    #[must_use]
    pub fn new(groups: usize, dims: usize) -> Self {
        assert_eq!(
            dims % groups,
            0,
            "channel count {} not divisible by {} groups",
            dims,
            groups
        );
        Self { groups, dims }
    }
}

impl Module for GroupNorm {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert!(nd >= 2, "GroupNorm expects (N, ..., C) input, got {:?}", input.shape());
        assert_eq!(
            input.shape()[nd - 1],
            self.dims,
            "GroupNorm expected {} channels, got {:?}",
            self.dims,
            input.shape()
        );
        let n = input.shape()[0];
        let c = self.dims;
        let spatial = input.numel() / (n * c);
        let group_size = c / self.groups;
        let xd = input.data();
        let mut out = vec![0.0f32; input.numel()];
        for b in 0..n {
            for g in 0..self.groups {
                let mut sum = 0.0f32;
                let mut sq = 0.0f32;
                let count = (spatial * group_size) as f32;
                for s in 0..spatial {
                    for k in 0..group_size {
                        let v = xd[(b * spatial + s) * c + g * group_size + k];
                        sum += v;
                        sq += v * v;
                    }
                }
                let mean = sum / count;
                let var = sq / count - mean * mean;
                let denom = (var + EPS).sqrt();
                for s in 0..spatial {
                    for k in 0..group_size {
                        let idx = (b * spatial + s) * c + g * group_size + k;
                        out[idx] = (xd[idx] - mean) / denom;
                    }
                }
            }
        }
        Tensor::new(out, input.shape())
    }
}

/// Batch normalization in training mode: batch statistics per channel.
#[derive(Debug, Clone)]
pub struct BatchNorm {
    features: usize,
    weight: Tensor,
    bias: Tensor,
}

impl BatchNorm {
    #[must_use]
    pub fn new(features: usize) -> Self {
        Self {
            features,
            weight: Tensor::ones(&[features]),
            bias: Tensor::zeros(&[features]),
        }
    }
}

impl Module for BatchNorm {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert_eq!(
            input.shape()[nd - 1],
            self.features,
            "BatchNorm expected {} features, got {:?}",
            self.features,
            input.shape()
        );
        let leading: Vec<usize> = (0..nd - 1).collect();
        let mean = input.mean_over(&leading, true);
        let var = input
            .zip(&mean, Dtype::Float32, |x, m| (x - m) * (x - m))
            .mean_over(&leading, true);
        let centered = input.zip(&mean, Dtype::Float32, |x, m| x - m);
        let normalized = centered.zip(&var, Dtype::Float32, |c, v| c / (v + EPS).sqrt());
        normalized
            .zip(&self.weight, Dtype::Float32, |x, w| x * w)
            .zip(&self.bias, Dtype::Float32, |x, b| x + b)
    }
}

#[cfg(test)]
#[path = "normalization_tests.rs"]
mod tests;
