//! Reference-engine tensor type and its operation surface.
//!
//! The generation engine treats this module as an oracle: catalogue entries
//! hold direct function pointers into it, call them with synthesized inputs,
//! and read back shapes, dtypes and reduction statistics. Values are stored
//! flat in row-major order with an explicit shape vector; a scalar tensor has
//! an empty shape.

pub mod fft;
pub mod ops;
pub mod random;

pub use fft::ComplexTensor;
pub use random::RandomStream;

/// Element type tag carried by every tensor.
///
/// Integer and boolean tensors share the `f32` backing store (the value
/// ranges the catalogue produces are exactly representable); the tag drives
/// assertion rendering and lookup semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Float32,
    Int32,
    Bool,
}

impl Dtype {
    /// Stable name used by rendering backends.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Dtype::Float32 => "Float32",
            Dtype::Int32 => "Int32",
            Dtype::Bool => "Bool",
        }
    }
}

/// A dense row-major tensor of `f32` values with a dtype tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
    dtype: Dtype,
}

impl Tensor {
    /// Create a float tensor from data and shape.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the product of the shape.
    #[must_use]
    pub fn new(data: Vec<f32>, shape: &[usize]) -> Self {
        Self::with_dtype(data, shape, Dtype::Float32)
    }

    /// Create a tensor with an explicit dtype tag.
    #[must_use]
    pub fn with_dtype(data: Vec<f32>, shape: &[usize], dtype: Dtype) -> Self {
        let expected: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected,
            "data length {} doesn't match shape {:?}",
            data.len(),
            shape
        );
        Self {
            data,
            shape: shape.to_vec(),
            dtype,
        }
    }

    /// A zero-dimensional (scalar) tensor.
    #[must_use]
    pub fn scalar(value: f32) -> Self {
        Self::new(vec![value], &[])
    }

    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    #[must_use]
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    #[must_use]
    pub fn full(shape: &[usize], value: f32) -> Self {
        let numel: usize = shape.iter().product();
        Self::new(vec![value; numel], shape)
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The single element of a scalar tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor holds more than one element.
    #[must_use]
    pub fn item(&self) -> f32 {
        assert_eq!(self.numel(), 1, "item() on tensor of shape {:?}", self.shape);
        self.data[0]
    }

    /// Row-major strides for the current shape.
    pub(crate) fn strides(&self) -> Vec<usize> {
        strides_for(&self.shape)
    }

    /// Same data, new shape.
    #[must_use]
    pub fn reshape(&self, shape: &[usize]) -> Tensor {
        Tensor::with_dtype(self.data.clone(), shape, self.dtype)
    }

    /// Collapse to one dimension.
    #[must_use]
    pub fn flatten(&self) -> Tensor {
        let n = self.numel();
        self.reshape(&[n])
    }

    /// Elementwise map producing a float tensor.
    #[must_use]
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor::new(self.data.iter().map(|&v| f(v)).collect(), &self.shape)
    }

    /// Elementwise map that keeps the receiver's dtype tag.
    #[must_use]
    pub fn map_same_dtype<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor::with_dtype(
            self.data.iter().map(|&v| f(v)).collect(),
            &self.shape,
            self.dtype,
        )
    }

    /// Broadcasting elementwise combination of two tensors.
    ///
    /// Shapes broadcast by the usual trailing-alignment rule; a dimension of
    /// one stretches against the other operand.
    ///
    /// # Panics
    ///
    /// Panics if the shapes are not broadcast-compatible.
    #[must_use]
    pub fn zip<F: Fn(f32, f32) -> f32>(&self, other: &Tensor, dtype: Dtype, f: F) -> Tensor {
        let shape = broadcast_shapes(&self.shape, &other.shape);
        let nd = shape.len();
        let out_strides = strides_for(&shape);
        let a_strides = broadcast_strides(&self.shape, nd);
        let b_strides = broadcast_strides(&other.shape, nd);
        let numel: usize = shape.iter().product();
        let mut data = Vec::with_capacity(numel);
        for idx in 0..numel {
            let mut rem = idx;
            let mut a_off = 0;
            let mut b_off = 0;
            for d in 0..nd {
                let coord = rem / out_strides[d];
                rem %= out_strides[d];
                a_off += coord * a_strides[d];
                b_off += coord * b_strides[d];
            }
            data.push(f(self.data[a_off], other.data[b_off]));
        }
        Tensor::with_dtype(data, &shape, dtype)
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Core reduction over a set of (already normalized) axes.
    fn reduce_with<F: Fn(f32, f32) -> f32>(
        &self,
        axes: &[usize],
        keepdims: bool,
        init: f32,
        f: F,
    ) -> Tensor {
        let nd = self.ndim();
        let reduced = |d: usize| axes.contains(&d);
        let out_shape: Vec<usize> = (0..nd)
            .filter_map(|d| {
                if reduced(d) {
                    if keepdims {
                        Some(1)
                    } else {
                        None
                    }
                } else {
                    Some(self.shape[d])
                }
            })
            .collect();
        let out_numel: usize = out_shape.iter().product();
        let mut out = vec![init; out_numel];
        let in_strides = self.strides();
        let out_strides = strides_for(&out_shape);
        for idx in 0..self.numel() {
            let mut rem = idx;
            let mut out_off = 0;
            let mut out_d = 0;
            for d in 0..nd {
                let coord = rem / in_strides[d];
                rem %= in_strides[d];
                if reduced(d) {
                    if keepdims {
                        out_d += 1;
                    }
                } else {
                    out_off += coord * out_strides[out_d];
                    out_d += 1;
                }
            }
            out[out_off] = f(out[out_off], self.data[idx]);
        }
        Tensor::with_dtype(out, &out_shape, self.dtype)
    }

    fn every_axis(&self) -> Vec<usize> {
        (0..self.ndim()).collect()
    }

    fn reduced_count(&self, axes: &[usize]) -> usize {
        axes.iter().map(|&d| self.shape[d]).product::<usize>().max(1)
    }

    pub(crate) fn sum_over(&self, axes: &[usize], keepdims: bool) -> Tensor {
        self.reduce_with(axes, keepdims, 0.0, |a, v| a + v)
    }

    /// Total sum, as a scalar tensor.
    #[must_use]
    pub fn sum(&self) -> Tensor {
        self.sum_over(&self.every_axis(), false)
    }

    #[must_use]
    pub fn sum_axis(&self, axis: isize) -> Tensor {
        self.sum_over(&[normalize_axis(axis, self.ndim())], false)
    }

    #[must_use]
    pub fn sum_axes(&self, axes: &[isize]) -> Tensor {
        self.sum_over(&normalize_axes(axes, self.ndim()), false)
    }

    pub(crate) fn mean_over(&self, axes: &[usize], keepdims: bool) -> Tensor {
        let count = self.reduced_count(axes) as f32;
        self.sum_over(axes, keepdims).map(|v| v / count)
    }

    /// Arithmetic mean over all elements, as a scalar tensor.
    #[must_use]
    pub fn mean(&self) -> Tensor {
        self.mean_over(&self.every_axis(), false)
    }

    #[must_use]
    pub fn mean_axis(&self, axis: isize) -> Tensor {
        self.mean_over(&[normalize_axis(axis, self.ndim())], false)
    }

    #[must_use]
    pub fn mean_axes(&self, axes: &[isize]) -> Tensor {
        self.mean_over(&normalize_axes(axes, self.ndim()), false)
    }

    pub(crate) fn max_over(&self, axes: &[usize], keepdims: bool) -> Tensor {
        self.reduce_with(axes, keepdims, f32::NEG_INFINITY, f32::max)
    }

    #[must_use]
    pub fn max(&self) -> Tensor {
        self.max_over(&self.every_axis(), false)
    }

    #[must_use]
    pub fn max_axis(&self, axis: isize) -> Tensor {
        self.max_over(&[normalize_axis(axis, self.ndim())], false)
    }

    #[must_use]
    pub fn max_axes(&self, axes: &[isize]) -> Tensor {
        self.max_over(&normalize_axes(axes, self.ndim()), false)
    }

    pub(crate) fn min_over(&self, axes: &[usize], keepdims: bool) -> Tensor {
        self.reduce_with(axes, keepdims, f32::INFINITY, f32::min)
    }

    #[must_use]
    pub fn min(&self) -> Tensor {
        self.min_over(&self.every_axis(), false)
    }

    #[must_use]
    pub fn min_axis(&self, axis: isize) -> Tensor {
        self.min_over(&[normalize_axis(axis, self.ndim())], false)
    }

    #[must_use]
    pub fn min_axes(&self, axes: &[isize]) -> Tensor {
        self.min_over(&normalize_axes(axes, self.ndim()), false)
    }

    pub(crate) fn prod_over(&self, axes: &[usize]) -> Tensor {
        self.reduce_with(axes, false, 1.0, |a, v| a * v)
    }

    #[must_use]
    pub fn prod(&self) -> Tensor {
        self.prod_over(&self.every_axis())
    }

    #[must_use]
    pub fn prod_axis(&self, axis: isize) -> Tensor {
        self.prod_over(&[normalize_axis(axis, self.ndim())])
    }

    #[must_use]
    pub fn prod_axes(&self, axes: &[isize]) -> Tensor {
        self.prod_over(&normalize_axes(axes, self.ndim()))
    }

    /// Population variance (ddof = 0).
    fn var_over(&self, axes: &[usize]) -> Tensor {
        let mean = self.mean_over(axes, true);
        let sq = self.zip(&mean, Dtype::Float32, |x, m| (x - m) * (x - m));
        sq.mean_over(axes, false)
    }

    #[must_use]
    pub fn var(&self) -> Tensor {
        self.var_over(&self.every_axis())
    }

    #[must_use]
    pub fn var_axis(&self, axis: isize) -> Tensor {
        self.var_over(&[normalize_axis(axis, self.ndim())])
    }

    #[must_use]
    pub fn var_axes(&self, axes: &[isize]) -> Tensor {
        self.var_over(&normalize_axes(axes, self.ndim()))
    }

    fn bool_over<F: Fn(f32, f32) -> f32>(&self, axes: &[usize], init: f32, f: F) -> Tensor {
        let mut t = self
            .map(|v| if v != 0.0 { 1.0 } else { 0.0 })
            .reduce_with(axes, false, init, f);
        t.dtype = Dtype::Bool;
        t
    }

    /// Total-AND reduction: true iff every element is nonzero.
    #[must_use]
    pub fn all(&self) -> Tensor {
        self.bool_over(&self.every_axis(), 1.0, |a, v| a * v)
    }

    #[must_use]
    pub fn all_axis(&self, axis: isize) -> Tensor {
        self.bool_over(&[normalize_axis(axis, self.ndim())], 1.0, |a, v| a * v)
    }

    #[must_use]
    pub fn all_axes(&self, axes: &[isize]) -> Tensor {
        self.bool_over(&normalize_axes(axes, self.ndim()), 1.0, |a, v| a * v)
    }

    /// Total-OR reduction: true iff any element is nonzero.
    #[must_use]
    pub fn any(&self) -> Tensor {
        self.bool_over(&self.every_axis(), 0.0, f32::max)
    }

    #[must_use]
    pub fn any_axis(&self, axis: isize) -> Tensor {
        self.bool_over(&[normalize_axis(axis, self.ndim())], 0.0, f32::max)
    }

    #[must_use]
    pub fn any_axes(&self, axes: &[isize]) -> Tensor {
        self.bool_over(&normalize_axes(axes, self.ndim()), 0.0, f32::max)
    }

    fn logsumexp_over(&self, axes: &[usize]) -> Tensor {
        let m = self.max_over(axes, true);
        let shifted = self.zip(&m, Dtype::Float32, |x, mx| (x - mx).exp());
        let s = shifted.sum_over(axes, false);
        let m_reduced = self.max_over(axes, false);
        s.zip(&m_reduced, Dtype::Float32, |sv, mv| sv.ln() + mv)
    }

    #[must_use]
    pub fn logsumexp(&self) -> Tensor {
        self.logsumexp_over(&self.every_axis())
    }

    #[must_use]
    pub fn logsumexp_axis(&self, axis: isize) -> Tensor {
        self.logsumexp_over(&[normalize_axis(axis, self.ndim())])
    }

    #[must_use]
    pub fn logsumexp_axes(&self, axes: &[isize]) -> Tensor {
        self.logsumexp_over(&normalize_axes(axes, self.ndim()))
    }

    fn softmax_over(&self, axes: &[usize]) -> Tensor {
        let m = self.max_over(axes, true);
        let e = self.zip(&m, Dtype::Float32, |x, mx| (x - mx).exp());
        let s = e.sum_over(axes, true);
        e.zip(&s, Dtype::Float32, |ev, sv| ev / sv)
    }

    /// Softmax over all elements (shape preserved, global normalization).
    #[must_use]
    pub fn softmax(&self) -> Tensor {
        self.softmax_over(&self.every_axis())
    }

    #[must_use]
    pub fn softmax_axis(&self, axis: isize) -> Tensor {
        self.softmax_over(&[normalize_axis(axis, self.ndim())])
    }

    #[must_use]
    pub fn softmax_axes(&self, axes: &[isize]) -> Tensor {
        self.softmax_over(&normalize_axes(axes, self.ndim()))
    }

    fn arg_over(&self, axis: usize, pick_max: bool) -> Tensor {
        let nd = self.ndim();
        let out_shape: Vec<usize> = (0..nd).filter(|&d| d != axis).map(|d| self.shape[d]).collect();
        let out_numel: usize = out_shape.iter().product();
        let mut best = vec![if pick_max { f32::NEG_INFINITY } else { f32::INFINITY }; out_numel];
        let mut arg = vec![0.0f32; out_numel];
        let in_strides = self.strides();
        let out_strides = strides_for(&out_shape);
        for idx in 0..self.numel() {
            let mut rem = idx;
            let mut out_off = 0;
            let mut out_d = 0;
            let mut along = 0;
            for d in 0..nd {
                let coord = rem / in_strides[d];
                rem %= in_strides[d];
                if d == axis {
                    along = coord;
                } else {
                    out_off += coord * out_strides[out_d];
                    out_d += 1;
                }
            }
            let v = self.data[idx];
            let better = if pick_max { v > best[out_off] } else { v < best[out_off] };
            if better {
                best[out_off] = v;
                arg[out_off] = along as f32;
            }
        }
        Tensor::with_dtype(arg, &out_shape, Dtype::Int32)
    }

    /// Index of the maximum element of the flattened tensor.
    #[must_use]
    pub fn argmax(&self) -> Tensor {
        self.flatten().arg_over(0, true)
    }

    #[must_use]
    pub fn argmax_axis(&self, axis: isize) -> Tensor {
        self.arg_over(normalize_axis(axis, self.ndim()), true)
    }

    #[must_use]
    pub fn argmin(&self) -> Tensor {
        self.flatten().arg_over(0, false)
    }

    #[must_use]
    pub fn argmin_axis(&self, axis: isize) -> Tensor {
        self.arg_over(normalize_axis(axis, self.ndim()), false)
    }

    // ------------------------------------------------------------------
    // Cumulative operations
    // ------------------------------------------------------------------

    fn cum_over<F: Fn(f32, f32) -> f32>(&self, axis: usize, f: F) -> Tensor {
        let nd = self.ndim();
        let len = self.shape[axis];
        let strides = self.strides();
        let stride = strides[axis];
        let mut data = self.data.clone();
        // Walk every lane along `axis` once.
        let lanes = self.numel() / len.max(1);
        for lane in 0..lanes {
            // Decompose lane index over the non-axis dims to find the base offset.
            let mut rem = lane;
            let mut base = 0;
            for d in 0..nd {
                if d == axis {
                    continue;
                }
                let extent: usize = (0..nd)
                    .filter(|&e| e != axis && e > d)
                    .map(|e| self.shape[e])
                    .product();
                let coord = rem / extent.max(1);
                rem %= extent.max(1);
                base += coord * strides[d];
            }
            for k in 1..len {
                let prev = data[base + (k - 1) * stride];
                let cur = data[base + k * stride];
                data[base + k * stride] = f(prev, cur);
            }
        }
        Tensor::with_dtype(data, &self.shape, self.dtype)
    }

    /// Cumulative sum of the flattened tensor.
    #[must_use]
    pub fn cumsum(&self) -> Tensor {
        self.flatten().cum_over(0, |a, v| a + v)
    }

    #[must_use]
    pub fn cumsum_axis(&self, axis: isize) -> Tensor {
        self.cum_over(normalize_axis(axis, self.ndim()), |a, v| a + v)
    }

    #[must_use]
    pub fn cumprod(&self) -> Tensor {
        self.flatten().cum_over(0, |a, v| a * v)
    }

    #[must_use]
    pub fn cumprod_axis(&self, axis: isize) -> Tensor {
        self.cum_over(normalize_axis(axis, self.ndim()), |a, v| a * v)
    }

    #[must_use]
    pub fn cummax(&self) -> Tensor {
        self.flatten().cum_over(0, f32::max)
    }

    #[must_use]
    pub fn cummax_axis(&self, axis: isize) -> Tensor {
        self.cum_over(normalize_axis(axis, self.ndim()), f32::max)
    }

    #[must_use]
    pub fn cummin(&self) -> Tensor {
        self.flatten().cum_over(0, f32::min)
    }

    #[must_use]
    pub fn cummin_axis(&self, axis: isize) -> Tensor {
        self.cum_over(normalize_axis(axis, self.ndim()), f32::min)
    }

    // ------------------------------------------------------------------
    // Shape manipulation and indexing
    // ------------------------------------------------------------------

    /// Insert a size-one dimension at `axis` (negative axes count from the
    /// end of the *output* shape).
    #[must_use]
    pub fn expand_dims_axis(&self, axis: isize) -> Tensor {
        self.expand_dims_axes(&[axis])
    }

    /// Insert size-one dimensions at each position in `axes`.
    #[must_use]
    pub fn expand_dims_axes(&self, axes: &[isize]) -> Tensor {
        let out_nd = self.ndim() + axes.len();
        let mut positions: Vec<usize> = axes.iter().map(|&a| normalize_axis(a, out_nd)).collect();
        positions.sort_unstable();
        let mut shape = Vec::with_capacity(out_nd);
        let mut src = self.shape.iter();
        for d in 0..out_nd {
            if positions.contains(&d) {
                shape.push(1);
            } else {
                shape.push(*src.next().expect("expand_dims axis out of range"));
            }
        }
        self.reshape(&shape)
    }

    /// Select one index along the last axis (`[..., i]`), dropping it.
    #[must_use]
    pub fn index_last(&self, i: usize) -> Tensor {
        let nd = self.ndim();
        assert!(nd > 0, "index_last on a scalar tensor");
        let last = self.shape[nd - 1];
        assert!(i < last, "index {} out of range for axis of size {}", i, last);
        let out_shape = &self.shape[..nd - 1];
        let data: Vec<f32> = self
            .data
            .chunks(last)
            .map(|lane| lane[i])
            .collect();
        Tensor::with_dtype(data, out_shape, self.dtype)
    }

    /// Index the leading axes (`[i, j, ...]`), keeping the remainder.
    #[must_use]
    pub fn index_prefix(&self, idx: &[usize]) -> Tensor {
        assert!(idx.len() <= self.ndim(), "too many indices for shape {:?}", self.shape);
        let strides = self.strides();
        let mut offset = 0;
        for (d, &i) in idx.iter().enumerate() {
            assert!(i < self.shape[d], "index {} out of range for axis {}", i, d);
            offset += i * strides[d];
        }
        let out_shape = &self.shape[idx.len()..];
        let numel: usize = out_shape.iter().product();
        let data = self.data[offset..offset + numel].to_vec();
        Tensor::with_dtype(data, out_shape, self.dtype)
    }
}

/// One operand value: either a tensor or a bare scalar.
#[derive(Debug, Clone)]
pub enum Value {
    Tensor(Tensor),
    Scalar(f32),
}

impl Value {
    #[must_use]
    pub fn is_tensor(&self) -> bool {
        matches!(self, Value::Tensor(_))
    }

    /// The tensor, if this operand is one.
    #[must_use]
    pub fn tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Tensor(t) => Some(t),
            Value::Scalar(_) => None,
        }
    }

    /// View the operand as a (possibly zero-dimensional) tensor for
    /// broadcasting against the other side of a binary operation.
    #[must_use]
    pub fn as_tensor(&self) -> Tensor {
        match self {
            Value::Tensor(t) => t.clone(),
            Value::Scalar(v) => Tensor::scalar(*v),
        }
    }
}

/// Resolve a possibly-negative axis against `ndim`.
///
/// # Panics
///
/// Panics if the axis is out of range.
pub(crate) fn normalize_axis(axis: isize, ndim: usize) -> usize {
    let resolved = if axis < 0 { ndim as isize + axis } else { axis };
    assert!(
        (0..ndim as isize).contains(&resolved),
        "axis {} out of range for {} dimensions",
        axis,
        ndim
    );
    resolved as usize
}

pub(crate) fn normalize_axes(axes: &[isize], ndim: usize) -> Vec<usize> {
    let resolved: Vec<usize> = axes.iter().map(|&a| normalize_axis(a, ndim)).collect();
    for (i, a) in resolved.iter().enumerate() {
        assert!(
            !resolved[..i].contains(a),
            "duplicate axis {} in reduction list",
            a
        );
    }
    resolved
}

pub(crate) fn strides_for(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Broadcast two shapes by the trailing-alignment rule.
pub(crate) fn broadcast_shapes(a: &[usize], b: &[usize]) -> Vec<usize> {
    let nd = a.len().max(b.len());
    let mut out = vec![0; nd];
    for d in 0..nd {
        let da = if d + a.len() >= nd { a[d + a.len() - nd] } else { 1 };
        let db = if d + b.len() >= nd { b[d + b.len() - nd] } else { 1 };
        assert!(
            da == db || da == 1 || db == 1,
            "shapes {:?} and {:?} are not broadcast-compatible",
            a,
            b
        );
        out[d] = da.max(db);
    }
    out
}

/// Per-dimension input strides for broadcasting into an `nd`-dim output;
/// stretched dimensions get stride zero.
fn broadcast_strides(shape: &[usize], nd: usize) -> Vec<usize> {
    let own = strides_for(shape);
    let mut out = vec![0; nd];
    for d in 0..shape.len() {
        let out_d = d + nd - shape.len();
        out[out_d] = if shape[d] == 1 { 0 } else { own[d] };
    }
    out
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
