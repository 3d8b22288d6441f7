//! Convolution layers over channels-last inputs.

use super::Module;
use crate::tensor::{ops, RandomStream, Tensor};

/// 1-D convolution over (batch, length, channels) input.
pub struct Conv1d {
    /// Weight, shape [out_channels, kernel_size, in_channels]
    weight: Tensor,
    /// Bias, shape [out_channels]
    bias: Tensor,
}

impl Conv1d {
    #[must_use]
    pub fn new(
        rng: &mut RandomStream,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
    ) -> Self {
        let k = (1.0 / (in_channels * kernel_size) as f32).sqrt();
        let weight = rng.uniform(-k, k, &[out_channels, kernel_size, in_channels]);
        let bias = rng.uniform(-k, k, &[out_channels]);
        Self { weight, bias }
    }
}

impl Module for Conv1d {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let y = ops::conv1d(input, &self.weight);
        y.zip(&self.bias, crate::tensor::Dtype::Float32, |v, b| v + b)
    }
}

/// 2-D convolution over (batch, height, width, channels) input.
pub struct Conv2d {
    /// Weight, shape [out_channels, kernel, kernel, in_channels]
    weight: Tensor,
    /// Bias, shape [out_channels]
    bias: Tensor,
}

impl Conv2d {
    #[must_use]
    pub fn new(
        rng: &mut RandomStream,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
    ) -> Self {
        let k = (1.0 / (in_channels * kernel_size * kernel_size) as f32).sqrt();
        let weight = rng.uniform(-k, k, &[out_channels, kernel_size, kernel_size, in_channels]);
        let bias = rng.uniform(-k, k, &[out_channels]);
        Self { weight, bias }
    }
}

impl Module for Conv2d {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let y = ops::conv2d(input, &self.weight);
        y.zip(&self.bias, crate::tensor::Dtype::Float32, |v, b| v + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv1d_output_shape() {
        let mut rng = RandomStream::new(5);
        let layer = Conv1d::new(&mut rng, 16, 2, 8);
        let x = rng.uniform(0.0, 1.0, &[2, 8, 16]);
        let y = layer.forward(&mut rng, &x);
        assert_eq!(y.shape(), [2, 1, 2]);
    }

    #[test]
    fn test_conv2d_output_shape() {
        let mut rng = RandomStream::new(6);
        let layer = Conv2d::new(&mut rng, 4, 2, 8);
        let x = rng.uniform(0.0, 1.0, &[2, 8, 8, 4]);
        let y = layer.forward(&mut rng, &x);
        assert_eq!(y.shape(), [2, 1, 1, 2]);
    }
}
