//! Dropout regularization family.
//!
//! Masks are drawn from the engine stream passed to `forward`, in row-major
//! order, so a target implementation replaying the pinned seed sees the same
//! mask. Outputs use inverted scaling (kept values multiplied by 1/(1-p)).

use super::Module;
use crate::tensor::{RandomStream, Tensor};

/// Elementwise dropout with probability `p`.
pub struct Dropout {
    p: f32,
}

impl Dropout {
    /// # Panics
    ///
    /// Panics if `p` is not in [0, 1).
    #[must_use]
    pub fn new() -> Self {
        Self::with_probability(0.5)
    }

    #[must_use]
    pub fn with_probability(p: f32) -> Self {
        assert!((0.0..1.0).contains(&p), "dropout probability must be in [0, 1), got {p}");
        Self { p }
    }
}

impl Default for Dropout {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Dropout {
    fn forward(&self, rng: &mut RandomStream, input: &Tensor) -> Tensor {
        let mask = rng.uniform(0.0, 1.0, input.shape());
        let scale = 1.0 / (1.0 - self.p);
        let p = self.p;
        input.zip(&mask, crate::tensor::Dtype::Float32, |x, u| {
            if u >= p {
                x * scale
            } else {
                0.0
            }
        })
    }
}

/// Channel dropout over (batch, length, channels) input: zeroes whole
/// per-channel lanes.
pub struct Dropout2d {
    p: f32,
}

impl Dropout2d {
    #[must_use]
    pub fn new() -> Self {
        Self { p: 0.5 }
    }
}

impl Default for Dropout2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Dropout2d {
    fn forward(&self, rng: &mut RandomStream, input: &Tensor) -> Tensor {
        assert_eq!(
            input.ndim(),
            3,
            "Dropout2d expects (N, L, C) input, got {:?}",
            input.shape()
        );
        let (n, l, c) = (input.shape()[0], input.shape()[1], input.shape()[2]);
        channel_dropout(rng, input, self.p, n, l, c)
    }
}

/// Channel dropout over (batch, height, width, channels) input.
pub struct Dropout3d {
    p: f32,
}

impl Dropout3d {
    #[must_use]
    pub fn new() -> Self {
        Self { p: 0.5 }
    }
}

impl Default for Dropout3d {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Dropout3d {
    fn forward(&self, rng: &mut RandomStream, input: &Tensor) -> Tensor {
        assert_eq!(
            input.ndim(),
            4,
            "Dropout3d expects (N, H, W, C) input, got {:?}",
            input.shape()
        );
        let (n, h, w, c) = (
            input.shape()[0],
            input.shape()[1],
            input.shape()[2],
            input.shape()[3],
        );
        channel_dropout(rng, input, self.p, n, h * w, c)
    }
}

/// Zero entire (batch, channel) lanes with probability `p`; `spatial` is the
/// flattened extent between batch and channel.
fn channel_dropout(
    rng: &mut RandomStream,
    input: &Tensor,
    p: f32,
    batch: usize,
    spatial: usize,
    channels: usize,
) -> Tensor {
    let mask = rng.uniform(0.0, 1.0, &[batch, channels]);
    let scale = 1.0 / (1.0 - p);
    let md = mask.data();
    let xd = input.data();
    let mut out = Vec::with_capacity(input.numel());
    for b in 0..batch {
        for s in 0..spatial {
            for ch in 0..channels {
                let keep = md[b * channels + ch] >= p;
                let x = xd[(b * spatial + s) * channels + ch];
                out.push(if keep { x * scale } else { 0.0 });
            }
        }
    }
    Tensor::new(out, input.shape())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropout_zeroes_or_scales() {
        let mut rng = RandomStream::new(9);
        let x = Tensor::ones(&[16, 16]);
        let y = Dropout::new().forward(&mut rng, &x);
        assert!(y.data().iter().all(|&v| v == 0.0 || (v - 2.0).abs() < 1e-6));
        assert!(y.data().iter().any(|&v| v == 0.0));
        assert!(y.data().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_dropout2d_zeroes_whole_channels() {
        let mut rng = RandomStream::new(12);
        let x = Tensor::ones(&[2, 8, 16]);
        let y = Dropout2d::new().forward(&mut rng, &x);
        // Each (batch, channel) lane is uniformly zero or uniformly scaled.
        for b in 0..2 {
            for ch in 0..16 {
                let lane: Vec<f32> = (0..8)
                    .map(|s| y.data()[(b * 8 + s) * 16 + ch])
                    .collect();
                assert!(lane.iter().all(|&v| v == lane[0]));
            }
        }
    }

    #[test]
    fn test_same_seed_same_mask() {
        let x = Tensor::ones(&[4, 4]);
        let mut a = RandomStream::new(21);
        let mut b = RandomStream::new(21);
        assert_eq!(
            Dropout::new().forward(&mut a, &x),
            Dropout::new().forward(&mut b, &x)
        );
    }
}
