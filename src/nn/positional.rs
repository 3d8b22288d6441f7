//! Position encoding layers.

use super::Module;
use crate::tensor::{RandomStream, Tensor};

/// Rotary position embedding (Su et al., 2021).
///
/// Rotates the first `dims` features of the last axis in half-split pairs
/// (x[i], x[i + dims/2]), with positions taken from the second-to-last axis;
/// features beyond `dims` pass through unchanged.
#[derive(Debug, Clone)]
pub struct Rope {
    dims: usize,
    base: f32,
}

impl Rope {
    /// # Panics
    ///
    /// Panics if `dims` is odd.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        assert_eq!(dims % 2, 0, "RoPE dims {} must be even", dims);
        Self {
            dims,
            base: 10000.0,
        }
    }
}

impl Module for Rope {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let nd = input.ndim();
        assert!(nd >= 2, "RoPE expects (..., L, D) input, got {:?}", input.shape());
        let d = input.shape()[nd - 1];
        let l = input.shape()[nd - 2];
        assert!(self.dims <= d, "RoPE dims {} exceed feature axis {}", self.dims, d);
        let half = self.dims / 2;
        let batch = input.numel() / (l * d);
        let xd = input.data();
        let mut out = xd.to_vec();
        for b in 0..batch {
            for pos in 0..l {
                let row = (b * l + pos) * d;
                for i in 0..half {
                    let theta = pos as f32 * self.base.powf(-(2.0 * i as f32) / self.dims as f32);
                    let (sin, cos) = theta.sin_cos();
                    let x1 = xd[row + i];
                    let x2 = xd[row + half + i];
                    out[row + i] = x1 * cos - x2 * sin;
                    out[row + half + i] = x1 * sin + x2 * cos;
                }
            }
        }
        Tensor::new(out, input.shape())
    }
}

/// Sinusoidal position encoding (Vaswani et al., 2017).
///
/// Treats the input values as positions: the output gains a trailing axis of
/// `dims`, the first half sine features, the second half cosine, over a
/// geometric frequency ladder from 1 down to `min_freq`.
#[derive(Debug, Clone)]
pub struct SinusoidalPositionalEncoding {
    dims: usize,
    min_freq: f32,
}

impl SinusoidalPositionalEncoding {
    /// # Panics
    ///
    /// Panics if `dims` is odd.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        assert_eq!(dims % 2, 0, "encoding dims {} must be even", dims);
        Self {
            dims,
            min_freq: 0.0001,
        }
    }

    fn frequencies(&self) -> Vec<f32> {
        let half = self.dims / 2;
        (0..half)
            .map(|k| {
                let exponent = if half > 1 {
                    k as f32 / (half - 1) as f32
                } else {
                    0.0
                };
                self.min_freq.powf(exponent)
            })
            .collect()
    }
}

impl Module for SinusoidalPositionalEncoding {
    fn forward(&self, _rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let freqs = self.frequencies();
        let half = self.dims / 2;
        let mut out = Vec::with_capacity(input.numel() * self.dims);
        for &pos in input.data() {
            for &f in &freqs {
                out.push((pos * f).sin());
            }
            for f in &freqs[..half] {
                out.push((pos * f).cos());
            }
        }
        let mut shape = input.shape().to_vec();
        shape.push(self.dims);
        Tensor::new(out, &shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::RandomStream;

    fn rng() -> RandomStream {
        RandomStream::new(0)
    }

    #[test]
    fn test_rope_preserves_shape_and_tail_features() {
        let mut r = RandomStream::new(30);
        let x = r.uniform(0.0, 1.0, &[2, 8, 16]);
        let y = Rope::new(8).forward(&mut rng(), &x);
        assert_eq!(y.shape(), [2, 8, 16]);
        // Features past `dims` are untouched.
        for row in 0..(2 * 8) {
            for i in 8..16 {
                assert_eq!(y.data()[row * 16 + i], x.data()[row * 16 + i]);
            }
        }
    }

    #[test]
    fn test_rope_position_zero_is_identity() {
        let mut r = RandomStream::new(31);
        let x = r.uniform(0.0, 1.0, &[1, 4, 8]);
        let y = Rope::new(8).forward(&mut rng(), &x);
        for i in 0..8 {
            assert!((y.data()[i] - x.data()[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sinusoidal_appends_dims_axis() {
        let mut r = RandomStream::new(32);
        let x = r.uniform(0.0, 1.0, &[2, 8, 16]);
        let y = SinusoidalPositionalEncoding::new(8).forward(&mut rng(), &x);
        assert_eq!(y.shape(), [2, 8, 16, 8]);
    }

    #[test]
    fn test_sinusoidal_zero_position() {
        let x = Tensor::zeros(&[1]);
        let y = SinusoidalPositionalEncoding::new(8).forward(&mut rng(), &x);
        // sin(0) = 0 for the first half, cos(0) = 1 for the second.
        assert_eq!(&y.data()[..4], &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(&y.data()[4..], &[1.0, 1.0, 1.0, 1.0]);
    }
}
