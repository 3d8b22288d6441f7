//! Elementwise, linear-algebra and signal operations on tensors.
//!
//! Free functions here are what the operation catalogue points at: each
//! reference evaluation is a direct call, never a textual dispatch. Binary
//! operations accept [`Value`] operands so scalar literals broadcast the same
//! way the rendered target invocation does.

use super::{Dtype, Tensor, Value};

// ---------------------------------------------------------------------
// Scalar math helpers
// ---------------------------------------------------------------------

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7).
#[must_use]
pub fn erf(x: f32) -> f32 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592 + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Inverse error function, Giles (2012) single-precision approximation.
#[must_use]
pub fn erfinv(x: f32) -> f32 {
    let w = -((1.0 - x) * (1.0 + x)).ln();
    if w < 5.0 {
        let w = w - 2.5;
        let mut p = 2.81022636e-08;
        p = 3.43273939e-07 + p * w;
        p = -3.5233877e-06 + p * w;
        p = -4.39150654e-06 + p * w;
        p = 0.00021858087 + p * w;
        p = -0.00125372503 + p * w;
        p = -0.00417768164 + p * w;
        p = 0.246640727 + p * w;
        p = 1.50140941 + p * w;
        p * x
    } else {
        let w = w.sqrt() - 3.0;
        let mut p = -0.000200214257;
        p = 0.000100950558 + p * w;
        p = 0.00134934322 + p * w;
        p = -0.00367342844 + p * w;
        p = 0.00573950773 + p * w;
        p = -0.0076224613 + p * w;
        p = 0.00943887047 + p * w;
        p = 1.00167406 + p * w;
        p = 2.83297682 + p * w;
        p * x
    }
}

/// Numerically stable softplus: ln(1 + e^x).
#[must_use]
pub fn softplus(x: f32) -> f32 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// Logistic sigmoid.
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Floored modulo with the divisor's sign (Python `%` semantics).
#[must_use]
pub fn floor_mod(a: f32, b: f32) -> f32 {
    a - b * (a / b).floor()
}

/// Stable ln(e^a + e^b).
#[must_use]
pub fn logaddexp_scalar(a: f32, b: f32) -> f32 {
    let m = a.max(b);
    if m.is_infinite() && m < 0.0 {
        return f32::NEG_INFINITY;
    }
    m + (-(a - b).abs()).exp().ln_1p()
}

// ---------------------------------------------------------------------
// Value-level binary operations (catalogue entry points)
// ---------------------------------------------------------------------

fn zip_values<F: Fn(f32, f32) -> f32>(lhs: &Value, rhs: &Value, dtype: Dtype, f: F) -> Tensor {
    lhs.as_tensor().zip(&rhs.as_tensor(), dtype, f)
}

pub fn add(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, |a, b| a + b)
}

pub fn subtract(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, |a, b| a - b)
}

pub fn multiply(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, |a, b| a * b)
}

pub fn divide(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, |a, b| a / b)
}

pub fn remainder(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, floor_mod)
}

pub fn power(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, f32::powf)
}

pub fn maximum(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, f32::max)
}

pub fn minimum(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, f32::min)
}

pub fn logaddexp(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Float32, logaddexp_scalar)
}

fn flag(c: bool) -> f32 {
    if c {
        1.0
    } else {
        0.0
    }
}

pub fn eq(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a == b))
}

pub fn ne(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a != b))
}

pub fn lt(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a < b))
}

pub fn le(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a <= b))
}

pub fn gt(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a > b))
}

pub fn ge(lhs: &Value, rhs: &Value) -> Tensor {
    zip_values(lhs, rhs, Dtype::Bool, |a, b| flag(a >= b))
}

// ---------------------------------------------------------------------
// Linear algebra and signal operations
// ---------------------------------------------------------------------

/// 2-D matrix product: (m, k) x (k, n) -> (m, n).
///
/// # Panics
///
/// Panics on non-2-D operands or mismatched inner dimensions.
#[must_use]
pub fn matmul(a: &Tensor, b: &Tensor) -> Tensor {
    assert_eq!(a.ndim(), 2, "matmul lhs must be 2-D, got {:?}", a.shape());
    assert_eq!(b.ndim(), 2, "matmul rhs must be 2-D, got {:?}", b.shape());
    let (m, k) = (a.shape()[0], a.shape()[1]);
    let (k2, n) = (b.shape()[0], b.shape()[1]);
    assert_eq!(k, k2, "matmul inner dimensions {} and {} differ", k, k2);
    let ad = a.data();
    let bd = b.data();
    let mut out = vec![0.0f32; m * n];
    for i in 0..m {
        for p in 0..k {
            let av = ad[i * k + p];
            for j in 0..n {
                out[i * n + j] += av * bd[p * n + j];
            }
        }
    }
    Tensor::new(out, &[m, n])
}

/// Valid cross-correlation over (batch, length, channels) input with a
/// (out_channels, kernel, in_channels) weight.
#[must_use]
pub fn conv1d(x: &Tensor, w: &Tensor) -> Tensor {
    assert_eq!(x.ndim(), 3, "conv1d input must be (N, L, C), got {:?}", x.shape());
    assert_eq!(w.ndim(), 3, "conv1d weight must be (O, K, C), got {:?}", w.shape());
    let (n, l, c) = (x.shape()[0], x.shape()[1], x.shape()[2]);
    let (o, k, wc) = (w.shape()[0], w.shape()[1], w.shape()[2]);
    assert_eq!(c, wc, "conv1d channel mismatch: input {}, weight {}", c, wc);
    assert!(k <= l, "conv1d kernel {} longer than input {}", k, l);
    let lo = l - k + 1;
    let xd = x.data();
    let wd = w.data();
    let mut out = vec![0.0f32; n * lo * o];
    for b in 0..n {
        for pos in 0..lo {
            for oc in 0..o {
                let mut acc = 0.0;
                for t in 0..k {
                    for ch in 0..c {
                        acc += xd[(b * l + pos + t) * c + ch] * wd[(oc * k + t) * c + ch];
                    }
                }
                out[(b * lo + pos) * o + oc] = acc;
            }
        }
    }
    Tensor::new(out, &[n, lo, o])
}

/// Valid cross-correlation over (batch, height, width, channels) input with
/// a (out_channels, kh, kw, in_channels) weight.
#[must_use]
pub fn conv2d(x: &Tensor, w: &Tensor) -> Tensor {
    assert_eq!(x.ndim(), 4, "conv2d input must be (N, H, W, C), got {:?}", x.shape());
    assert_eq!(w.ndim(), 4, "conv2d weight must be (O, KH, KW, C), got {:?}", w.shape());
    let (n, h, wd_in, c) = (x.shape()[0], x.shape()[1], x.shape()[2], x.shape()[3]);
    let (o, kh, kw, wc) = (w.shape()[0], w.shape()[1], w.shape()[2], w.shape()[3]);
    assert_eq!(c, wc, "conv2d channel mismatch: input {}, weight {}", c, wc);
    assert!(kh <= h && kw <= wd_in, "conv2d kernel exceeds input extent");
    let ho = h - kh + 1;
    let wo = wd_in - kw + 1;
    let xd = x.data();
    let wv = w.data();
    let mut out = vec![0.0f32; n * ho * wo * o];
    for b in 0..n {
        for y in 0..ho {
            for xw in 0..wo {
                for oc in 0..o {
                    let mut acc = 0.0;
                    for dy in 0..kh {
                        for dx in 0..kw {
                            for ch in 0..c {
                                let xi = ((b * h + y + dy) * wd_in + xw + dx) * c + ch;
                                let wi = ((oc * kh + dy) * kw + dx) * c + ch;
                                acc += xd[xi] * wv[wi];
                            }
                        }
                    }
                    out[((b * ho + y) * wo + xw) * o + oc] = acc;
                }
            }
        }
    }
    Tensor::new(out, &[n, ho, wo, o])
}

/// 1-D discrete convolution in full mode with the kernel flipped.
#[must_use]
pub fn convolve(a: &Tensor, v: &Tensor) -> Tensor {
    assert_eq!(a.ndim(), 1, "convolve input must be 1-D, got {:?}", a.shape());
    assert_eq!(v.ndim(), 1, "convolve kernel must be 1-D, got {:?}", v.shape());
    let la = a.numel();
    let lv = v.numel();
    let lo = la + lv - 1;
    let ad = a.data();
    let vd = v.data();
    let mut out = vec![0.0f32; lo];
    for (k, slot) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (i, &av) in ad.iter().enumerate() {
            if k >= i && k - i < lv {
                acc += av * vd[k - i];
            }
        }
        *slot = acc;
    }
    Tensor::new(out, &[lo])
}

/// Affine per-group quantization along rows.
///
/// Each contiguous `group_size` run of a row is quantized to `bits`-bit
/// levels: `q = round((x - min) / scale)` with `scale = (max - min) / (2^bits
/// - 1)`. Returns the quantized values (Int32) plus per-group scales and
/// biases (the group minima).
#[must_use]
pub fn quantize(w: &Tensor, group_size: usize, bits: u32) -> (Tensor, Tensor, Tensor) {
    assert_eq!(w.ndim(), 2, "quantize expects a 2-D weight, got {:?}", w.shape());
    let (rows, cols) = (w.shape()[0], w.shape()[1]);
    assert!(
        group_size > 0 && cols % group_size == 0,
        "row length {} not divisible by group size {}",
        cols,
        group_size
    );
    let levels = ((1u32 << bits) - 1) as f32;
    let groups = cols / group_size;
    let wd = w.data();
    let mut q = vec![0.0f32; rows * cols];
    let mut scales = vec![0.0f32; rows * groups];
    let mut biases = vec![0.0f32; rows * groups];
    for r in 0..rows {
        for g in 0..groups {
            let start = r * cols + g * group_size;
            let slice = &wd[start..start + group_size];
            let lo = slice.iter().copied().fold(f32::INFINITY, f32::min);
            let hi = slice.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let scale = (hi - lo) / levels;
            scales[r * groups + g] = scale;
            biases[r * groups + g] = lo;
            for (i, &x) in slice.iter().enumerate() {
                let step = if scale > 0.0 {
                    ((x - lo) / scale).round().clamp(0.0, levels)
                } else {
                    0.0
                };
                q[start + i] = step;
            }
        }
    }
    (
        Tensor::with_dtype(q, &[rows, cols], Dtype::Int32),
        Tensor::new(scales, &[rows, groups]),
        Tensor::new(biases, &[rows, groups]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erf_bounds() {
        assert!((erf(0.0)).abs() < 1e-6);
        assert!((erf(10.0) - 1.0).abs() < 1e-6);
        assert!((erf(-10.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_erfinv_roundtrip() {
        for &x in &[-0.9f32, -0.5, -0.1, 0.0, 0.1, 0.5, 0.9] {
            let y = erf(erfinv(x));
            assert!((y - x).abs() < 1e-4, "erf(erfinv({x})) = {y}");
        }
    }

    #[test]
    fn test_floor_mod_follows_divisor_sign() {
        assert!((floor_mod(5.0, 3.0) - 2.0).abs() < 1e-6);
        assert!((floor_mod(-5.0, 3.0) - 1.0).abs() < 1e-6);
        assert!((floor_mod(5.0, -3.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scalar_broadcast_add() {
        let a = Value::Tensor(Tensor::new(vec![1.0, 2.0, 3.0], &[3]));
        let b = Value::Scalar(0.5);
        let c = add(&a, &b);
        assert_eq!(c.shape(), [3]);
        assert_eq!(c.data(), &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_comparison_dtype() {
        let a = Value::Tensor(Tensor::new(vec![1.0, 2.0], &[2]));
        let b = Value::Tensor(Tensor::new(vec![1.0, 0.0], &[2]));
        let c = eq(&a, &b);
        assert_eq!(c.dtype(), Dtype::Bool);
        assert_eq!(c.data(), &[1.0, 0.0]);
    }

    #[test]
    fn test_matmul_shape_and_values() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let b = Tensor::new(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]);
        let c = matmul(&a, &b);
        assert_eq!(c.shape(), [2, 2]);
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_convolve_full_length() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0], &[3]);
        let v = Tensor::new(vec![1.0, 1.0], &[2]);
        let c = convolve(&a, &v);
        assert_eq!(c.shape(), [4]);
        assert_eq!(c.data(), &[1.0, 3.0, 5.0, 3.0]);
    }

    #[test]
    fn test_conv1d_valid_extent() {
        let x = Tensor::ones(&[1, 5, 2]);
        let w = Tensor::ones(&[3, 2, 2]);
        let y = conv1d(&x, &w);
        assert_eq!(y.shape(), [1, 4, 3]);
        assert!((y.data()[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_quantize_shapes_and_range() {
        let w = Tensor::new((0..64).map(|i| i as f32 / 64.0).collect(), &[2, 32]);
        let (q, scales, biases) = quantize(&w, 16, 8);
        assert_eq!(q.shape(), [2, 32]);
        assert_eq!(q.dtype(), Dtype::Int32);
        assert_eq!(scales.shape(), [2, 2]);
        assert_eq!(biases.shape(), [2, 2]);
        assert!(q.data().iter().all(|&v| (0.0..=255.0).contains(&v)));
    }
}
