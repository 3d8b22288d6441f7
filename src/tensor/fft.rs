//! FFT transform family over complex tensors.
//!
//! Lane-wise transforms are delegated to `rustfft`; this module adds the
//! n-dimensional bookkeeping: axis resolution, truncate/zero-pad resizing,
//! NumPy-style `n`/`s`/`axis`/`axes` argument handling, inverse scaling, and
//! the half-spectrum conventions of the real-input transforms. Real-input
//! transforms fed a complex tensor use its real part.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::{normalize_axis, strides_for, Tensor};

/// A dense row-major tensor of `Complex<f32>` values.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexTensor {
    data: Vec<Complex<f32>>,
    shape: Vec<usize>,
}

/// Outcome of a transform: complex for the full-spectrum family, real for
/// the inverse-real family.
#[derive(Debug, Clone)]
pub enum FftOutput {
    Complex(ComplexTensor),
    Real(Tensor),
}

impl ComplexTensor {
    /// Combine two real tensors into `re + i * im`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn from_parts(re: &Tensor, im: &Tensor) -> Self {
        assert_eq!(
            re.shape(),
            im.shape(),
            "real part {:?} and imaginary part {:?} differ in shape",
            re.shape(),
            im.shape()
        );
        let data = re
            .data()
            .iter()
            .zip(im.data().iter())
            .map(|(&r, &i)| Complex::new(r, i))
            .collect();
        Self {
            data,
            shape: re.shape().to_vec(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The real component as a float tensor.
    #[must_use]
    pub fn real(&self) -> Tensor {
        Tensor::new(self.data.iter().map(|c| c.re).collect(), &self.shape)
    }

    /// The imaginary component as a float tensor.
    #[must_use]
    pub fn imag(&self) -> Tensor {
        Tensor::new(self.data.iter().map(|c| c.im).collect(), &self.shape)
    }

    /// Drop the imaginary component.
    fn real_only(&self) -> ComplexTensor {
        ComplexTensor {
            data: self.data.iter().map(|c| Complex::new(c.re, 0.0)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Truncate or zero-pad along `axis` to length `n`.
    fn resize_axis(&self, axis: usize, n: usize) -> ComplexTensor {
        let old = self.shape[axis];
        if old == n {
            return self.clone();
        }
        let mut shape = self.shape.clone();
        shape[axis] = n;
        let numel: usize = shape.iter().product();
        let mut data = vec![Complex::new(0.0, 0.0); numel];
        let src_strides = strides_for(&self.shape);
        let dst_strides = strides_for(&shape);
        for_each_lane(&self.shape, axis, |lane_coords| {
            let mut src_base = 0;
            let mut dst_base = 0;
            for (d, &coord) in lane_coords.iter().enumerate() {
                src_base += coord * src_strides[d];
                dst_base += coord * dst_strides[d];
            }
            for k in 0..old.min(n) {
                data[dst_base + k * dst_strides[axis]] =
                    self.data[src_base + k * src_strides[axis]];
            }
        });
        ComplexTensor { data, shape }
    }

    /// One complex transform along `axis`; inverse transforms carry the
    /// 1/n scale.
    fn transform_axis(&self, axis: usize, inverse: bool) -> ComplexTensor {
        let len = self.shape[axis];
        let mut planner = FftPlanner::new();
        let plan = if inverse {
            planner.plan_fft_inverse(len)
        } else {
            planner.plan_fft_forward(len)
        };
        let strides = strides_for(&self.shape);
        let stride = strides[axis];
        let mut data = self.data.clone();
        let scale = if inverse { 1.0 / len as f32 } else { 1.0 };
        let mut lane = vec![Complex::new(0.0, 0.0); len];
        for_each_lane_offsets(&self.shape, axis, |base| {
            for (k, slot) in lane.iter_mut().enumerate() {
                *slot = data[base + k * stride];
            }
            plan.process(&mut lane);
            for (k, &v) in lane.iter().enumerate() {
                data[base + k * stride] = v * scale;
            }
        });
        ComplexTensor {
            data,
            shape: self.shape.clone(),
        }
    }

    /// Reconstruct a full spectrum of length `n` along `axis` from a half
    /// spectrum, by Hermitian symmetry.
    fn hermitian_expand(&self, axis: usize, n: usize) -> ComplexTensor {
        let half = n / 2 + 1;
        let trimmed = self.resize_axis(axis, half);
        let mut shape = trimmed.shape.clone();
        shape[axis] = n;
        let numel: usize = shape.iter().product();
        let mut data = vec![Complex::new(0.0, 0.0); numel];
        let src_strides = strides_for(&trimmed.shape);
        let dst_strides = strides_for(&shape);
        for_each_lane(&trimmed.shape, axis, |lane_coords| {
            let mut src_base = 0;
            let mut dst_base = 0;
            for (d, &coord) in lane_coords.iter().enumerate() {
                src_base += coord * src_strides[d];
                dst_base += coord * dst_strides[d];
            }
            for k in 0..n {
                let v = if k < half {
                    trimmed.data[src_base + k * src_strides[axis]]
                } else {
                    trimmed.data[src_base + (n - k) * src_strides[axis]].conj()
                };
                data[dst_base + k * dst_strides[axis]] = v;
            }
        });
        ComplexTensor { data, shape }
    }
}

/// Invoke `f` with the coordinates of every lane perpendicular to `axis`
/// (the `axis` coordinate is always zero).
fn for_each_lane<F: FnMut(&[usize])>(shape: &[usize], axis: usize, mut f: F) {
    let nd = shape.len();
    let lanes: usize = shape
        .iter()
        .enumerate()
        .filter(|&(d, _)| d != axis)
        .map(|(_, &s)| s)
        .product();
    let mut coords = vec![0usize; nd];
    for _ in 0..lanes {
        f(&coords);
        // Odometer over the non-axis dimensions.
        for d in (0..nd).rev() {
            if d == axis {
                continue;
            }
            coords[d] += 1;
            if coords[d] < shape[d] {
                break;
            }
            coords[d] = 0;
        }
    }
}

fn for_each_lane_offsets<F: FnMut(usize)>(shape: &[usize], axis: usize, mut f: F) {
    let strides = strides_for(shape);
    for_each_lane(shape, axis, |coords| {
        let base: usize = coords
            .iter()
            .zip(strides.iter())
            .map(|(&c, &s)| c * s)
            .sum();
        f(base);
    });
}

fn resolve_1d(shape: &[usize], n: Option<usize>, axis: Option<isize>) -> (usize, usize) {
    let axis = normalize_axis(axis.unwrap_or(-1), shape.len());
    let n = n.unwrap_or(shape[axis]);
    (axis, n)
}

/// Resolve `s`/`axes` into (axis, size) pairs, NumPy style: `s` alone takes
/// the trailing axes, `axes` alone keeps current sizes.
fn resolve_nd(
    shape: &[usize],
    s: Option<&[usize]>,
    axes: Option<&[isize]>,
    default_last: usize,
) -> Vec<(usize, usize)> {
    let nd = shape.len();
    let resolved_axes: Vec<usize> = match (s, axes) {
        (_, Some(list)) => list.iter().map(|&a| normalize_axis(a, nd)).collect(),
        (Some(sizes), None) => (nd - sizes.len()..nd).collect(),
        (None, None) => (nd - default_last.min(nd)..nd).collect(),
    };
    match s {
        Some(sizes) => {
            assert_eq!(
                sizes.len(),
                resolved_axes.len(),
                "transform shape {:?} and axes {:?} differ in length",
                sizes,
                resolved_axes
            );
            resolved_axes.iter().copied().zip(sizes.iter().copied()).collect()
        }
        None => resolved_axes.iter().map(|&a| (a, shape[a])).collect(),
    }
}

// ---------------------------------------------------------------------
// One-dimensional transforms
// ---------------------------------------------------------------------

#[must_use]
pub fn fft(x: &ComplexTensor, n: Option<usize>, axis: Option<isize>) -> ComplexTensor {
    let (axis, n) = resolve_1d(x.shape(), n, axis);
    x.resize_axis(axis, n).transform_axis(axis, false)
}

#[must_use]
pub fn ifft(x: &ComplexTensor, n: Option<usize>, axis: Option<isize>) -> ComplexTensor {
    let (axis, n) = resolve_1d(x.shape(), n, axis);
    x.resize_axis(axis, n).transform_axis(axis, true)
}

/// Real-input transform: keeps the half spectrum of length n/2 + 1.
#[must_use]
pub fn rfft(x: &ComplexTensor, n: Option<usize>, axis: Option<isize>) -> ComplexTensor {
    let (axis, n) = resolve_1d(x.shape(), n, axis);
    x.real_only()
        .resize_axis(axis, n)
        .transform_axis(axis, false)
        .resize_axis(axis, n / 2 + 1)
}

/// Inverse of [`rfft`]: reconstructs by Hermitian symmetry, returns real.
#[must_use]
pub fn irfft(x: &ComplexTensor, n: Option<usize>, axis: Option<isize>) -> Tensor {
    let nd = x.ndim();
    let axis = normalize_axis(axis.map_or(-1, |a| a), nd);
    let n = n.unwrap_or(2 * (x.shape()[axis] - 1));
    x.hermitian_expand(axis, n).transform_axis(axis, true).real()
}

// ---------------------------------------------------------------------
// N-dimensional transforms
// ---------------------------------------------------------------------

fn fftn_over(x: &ComplexTensor, pairs: &[(usize, usize)], inverse: bool) -> ComplexTensor {
    let mut out = x.clone();
    for &(axis, n) in pairs {
        out = out.resize_axis(axis, n).transform_axis(axis, inverse);
    }
    out
}

#[must_use]
pub fn fft2(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    fftn_over(x, &resolve_nd(x.shape(), s, axes, 2), false)
}

#[must_use]
pub fn ifft2(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    fftn_over(x, &resolve_nd(x.shape(), s, axes, 2), true)
}

#[must_use]
pub fn fftn(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    let nd = x.ndim();
    fftn_over(x, &resolve_nd(x.shape(), s, axes, nd), false)
}

#[must_use]
pub fn ifftn(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    let nd = x.ndim();
    fftn_over(x, &resolve_nd(x.shape(), s, axes, nd), true)
}

/// Real-input n-dimensional transform: rfft along the last listed axis,
/// full complex transforms along the rest.
fn rfftn_over(x: &ComplexTensor, pairs: &[(usize, usize)]) -> ComplexTensor {
    let (&(last_axis, last_n), rest) = pairs.split_last().expect("rfft needs at least one axis");
    let mut out = x
        .real_only()
        .resize_axis(last_axis, last_n)
        .transform_axis(last_axis, false)
        .resize_axis(last_axis, last_n / 2 + 1);
    for &(axis, n) in rest {
        out = out.resize_axis(axis, n).transform_axis(axis, false);
    }
    out
}

/// Inverse of [`rfftn_over`]: inverse complex transforms first, Hermitian
/// reconstruction along the last listed axis, returns real.
fn irfftn_over(x: &ComplexTensor, pairs: &[(usize, usize)]) -> Tensor {
    let (&(last_axis, last_n), rest) = pairs.split_last().expect("irfft needs at least one axis");
    let mut out = x.clone();
    for &(axis, n) in rest {
        out = out.resize_axis(axis, n).transform_axis(axis, true);
    }
    out.hermitian_expand(last_axis, last_n)
        .transform_axis(last_axis, true)
        .real()
}

/// Output length along the reconstruction axis of an inverse-real transform.
fn irfft_size(shape: &[usize], pair: (usize, usize), explicit: bool) -> usize {
    if explicit {
        pair.1
    } else {
        2 * (shape[pair.0] - 1)
    }
}

#[must_use]
pub fn rfft2(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    rfftn_over(x, &resolve_nd(x.shape(), s, axes, 2))
}

#[must_use]
pub fn irfft2(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Tensor {
    let mut pairs = resolve_nd(x.shape(), s, axes, 2);
    let last = pairs.len() - 1;
    pairs[last].1 = irfft_size(x.shape(), pairs[last], s.is_some());
    irfftn_over(x, &pairs)
}

#[must_use]
pub fn rfftn(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> ComplexTensor {
    let nd = x.ndim();
    rfftn_over(x, &resolve_nd(x.shape(), s, axes, nd))
}

#[must_use]
pub fn irfftn(x: &ComplexTensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Tensor {
    let nd = x.ndim();
    let mut pairs = resolve_nd(x.shape(), s, axes, nd);
    let last = pairs.len() - 1;
    pairs[last].1 = irfft_size(x.shape(), pairs[last], s.is_some());
    irfftn_over(x, &pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complex_from(re: Vec<f32>, shape: &[usize]) -> ComplexTensor {
        let zeros = Tensor::zeros(shape);
        ComplexTensor::from_parts(&Tensor::new(re, shape), &zeros)
    }

    #[test]
    fn test_fft_impulse_is_flat() {
        let x = complex_from(vec![1.0, 0.0, 0.0, 0.0], &[4]);
        let y = fft(&x, None, None);
        for c in y.real().data() {
            assert!((c - 1.0).abs() < 1e-5);
        }
        for c in y.imag().data() {
            assert!(c.abs() < 1e-5);
        }
    }

    #[test]
    fn test_ifft_roundtrip() {
        let x = complex_from(vec![0.5, -1.0, 2.0, 3.0, -0.25, 1.5], &[6]);
        let y = ifft(&fft(&x, None, None), None, None);
        for (a, b) in x.real().data().iter().zip(y.real().data().iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_fft_truncates_to_n() {
        let x = complex_from((0..10).map(|i| i as f32).collect(), &[10]);
        let y = fft(&x, Some(6), None);
        assert_eq!(y.shape(), [6]);
        let z = fft(&x, Some(16), None);
        assert_eq!(z.shape(), [16]);
    }

    #[test]
    fn test_rfft_half_spectrum_length() {
        let x = complex_from(vec![1.0; 100], &[100]);
        let y = rfft(&x, None, None);
        assert_eq!(y.shape(), [51]);
    }

    #[test]
    fn test_irfft_roundtrip_real_signal() {
        let data: Vec<f32> = (0..16).map(|i| ((i as f32) * 0.7).sin()).collect();
        let x = complex_from(data.clone(), &[16]);
        let back = irfft(&rfft(&x, None, None), None, None);
        assert_eq!(back.shape(), [16]);
        for (a, b) in data.iter().zip(back.data().iter()) {
            assert!((a - b).abs() < 1e-4, "{a} vs {b}");
        }
    }

    #[test]
    fn test_fft2_shape_with_s() {
        let x = complex_from(vec![0.25; 8 * 8 * 8], &[8, 8, 8]);
        let y = fft2(&x, Some(&[3, 4]), None);
        assert_eq!(y.shape(), [8, 3, 4]);
    }

    #[test]
    fn test_fftn_axes_only_keeps_sizes() {
        let x = complex_from(vec![0.5; 8 * 8 * 8], &[8, 8, 8]);
        let y = fftn(&x, None, Some(&[0, 2]));
        assert_eq!(y.shape(), [8, 8, 8]);
    }

    #[test]
    fn test_rfft2_trims_last_listed_axis() {
        let x = complex_from(vec![1.0; 8 * 8 * 8], &[8, 8, 8]);
        let y = rfft2(&x, Some(&[10, 5]), Some(&[2, 1]));
        // axis 2 resized to 10, axis 1 rfft'd at length 5 -> 3.
        assert_eq!(y.shape(), [8, 3, 10]);
    }

    #[test]
    fn test_irfft2_returns_real() {
        let x = complex_from(vec![1.0; 8 * 8 * 8], &[8, 8, 8]);
        let y = irfft2(&x, None, None);
        assert_eq!(y.shape(), [8, 8, 14]);
    }
}
