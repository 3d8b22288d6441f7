//! The operation catalogue.
//!
//! Static tables describing every operator, unary function, binary function,
//! FFT transform, optimizer and layer the driver expands. Each entry holds
//! direct function pointers into the reference engine — evaluation never
//! dispatches through operation names. Operand ranges for domain-sensitive
//! functions (logarithms, inverse trigonometry, the inverse error function,
//! exponentiation) are bounded here so generation stays inside each
//! function's valid input domain.

use super::args::ArgSpec;
use super::render::{OpSpelling, Subset};
use crate::nn::{
    BatchNorm, Celu, Conv1d, Conv2d, Dropout, Dropout2d, Dropout3d, Embedding, Gelu, Glu,
    GroupNorm, HardSwish, InstanceNorm, LayerNorm, LeakyRelu, Linear, LogSigmoid, LogSoftmax,
    Mish, Module, PRelu, Relu, Relu6, RmsNorm, Rope, Selu, Sigmoid, Silu,
    SinusoidalPositionalEncoding, Softmax, Softplus, Softsign, Step, Tanh,
};
use crate::optim::{
    AdaDelta, AdaGrad, Adafactor, Adam, AdamW, Adamax, Lion, Optimizer, RmsProp, Sgd,
};
use crate::tensor::fft::{self, ComplexTensor, FftOutput};
use crate::tensor::{ops, Dtype, RandomStream, Tensor, Value};

/// Learning rate pinned into every optimizer case.
pub const LEARNING_RATE: f32 = 0.1;

/// Input shape for the axes-qualified variants.
pub const AXES_SHAPE: [usize; 4] = [2, 3, 4, 3];

/// Axis arguments used by the qualified variants.
pub const AXIS_ARG: isize = -1;
pub const AXES_ARG: [isize; 2] = [0, -1];

/// Default layer input shape.
pub const LAYER_SHAPE: [usize; 3] = [2, 8, 16];

// ---------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------

/// A binary operator exercised through the language-level operator form.
pub struct OperatorEntry {
    pub name: &'static str,
    pub spelling: OpSpelling,
    pub eval: fn(&Value, &Value) -> Tensor,
}

pub static ARITHMETIC_OPS: &[OperatorEntry] = &[
    OperatorEntry {
        name: "add_op",
        spelling: OpSpelling::Symbol("+"),
        eval: ops::add,
    },
    OperatorEntry {
        name: "sub_op",
        spelling: OpSpelling::Symbol("-"),
        eval: ops::subtract,
    },
    OperatorEntry {
        name: "mul_op",
        spelling: OpSpelling::Symbol("*"),
        eval: ops::multiply,
    },
    OperatorEntry {
        name: "div_op",
        spelling: OpSpelling::Symbol("/"),
        eval: ops::divide,
    },
    OperatorEntry {
        name: "mod_op",
        spelling: OpSpelling::Symbol("%"),
        eval: ops::remainder,
    },
];

/// Exponentiation has no infix spelling in the target and is restricted to
/// positive operands (fractional powers of negative bases are undefined).
pub static POW_OP: OperatorEntry = OperatorEntry {
    name: "pow_op",
    spelling: OpSpelling::Method("pow"),
    eval: ops::power,
};

pub const POW_OPERAND: ArgSpec = ArgSpec::RangedUniform {
    low: 0.1,
    high: 2.0,
};

pub static COMPARISON_OPS: &[OperatorEntry] = &[
    OperatorEntry {
        name: "equal_op",
        spelling: OpSpelling::Method("eq"),
        eval: ops::eq,
    },
    OperatorEntry {
        name: "not_equal_op",
        spelling: OpSpelling::Method("ne"),
        eval: ops::ne,
    },
    OperatorEntry {
        name: "less_than_op",
        spelling: OpSpelling::Method("lt"),
        eval: ops::lt,
    },
    OperatorEntry {
        name: "less_than_equal_op",
        spelling: OpSpelling::Method("le"),
        eval: ops::le,
    },
    OperatorEntry {
        name: "greater_than_op",
        spelling: OpSpelling::Method("gt"),
        eval: ops::gt,
    },
    OperatorEntry {
        name: "greater_than_equal_op",
        spelling: OpSpelling::Method("ge"),
        eval: ops::ge,
    },
];

// ---------------------------------------------------------------------
// Unary functions
// ---------------------------------------------------------------------

/// A one-operand function, exercised as an array method and/or a free
/// function, with optional axis and axes variants.
pub struct UnaryEntry {
    pub name: &'static str,
    pub eval: Option<fn(&Tensor) -> Tensor>,
    pub eval_axis: Option<fn(&Tensor, isize) -> Tensor>,
    pub eval_axes: Option<fn(&Tensor, &[isize]) -> Tensor>,
    pub axis: bool,
    pub axes: bool,
    pub free_only: bool,
    pub no_bare: bool,
    pub operand: Option<ArgSpec>,
}

const fn unary(name: &'static str) -> UnaryEntry {
    UnaryEntry {
        name,
        eval: None,
        eval_axis: None,
        eval_axes: None,
        axis: false,
        axes: false,
        free_only: false,
        no_bare: false,
        operand: None,
    }
}

impl UnaryEntry {
    const fn bare(mut self, f: fn(&Tensor) -> Tensor) -> Self {
        self.eval = Some(f);
        self
    }

    const fn axis(mut self, f: fn(&Tensor, isize) -> Tensor) -> Self {
        self.axis = true;
        self.eval_axis = Some(f);
        self
    }

    const fn axes(mut self, f: fn(&Tensor, &[isize]) -> Tensor) -> Self {
        self.axes = true;
        self.eval_axes = Some(f);
        self
    }

    const fn free_only(mut self) -> Self {
        self.free_only = true;
        self
    }

    const fn no_bare(mut self) -> Self {
        self.no_bare = true;
        self
    }

    const fn operand(mut self, spec: ArgSpec) -> Self {
        self.operand = Some(spec);
        self
    }
}

const POSITIVE: ArgSpec = ArgSpec::RangedUniform {
    low: 0.1,
    high: 2.0,
};
const UNIT: ArgSpec = ArgSpec::RangedUniform {
    low: 0.1,
    high: 1.0,
};
const ABOVE_ONE: ArgSpec = ArgSpec::RangedUniform {
    low: 1.0,
    high: 3.0,
};
const OPEN_UNIT: ArgSpec = ArgSpec::RangedUniform {
    low: 0.1,
    high: 0.9,
};

pub static UNARY_FUNCTIONS: &[UnaryEntry] = &[
    // Methods with free-function counterparts.
    unary("abs").bare(u_abs),
    unary("all").bare(u_all).axis(u_all_axis).axes(u_all_axes),
    unary("any").bare(u_any).axis(u_any_axis).axes(u_any_axes),
    unary("argmax").bare(u_argmax).axis(u_argmax_axis),
    unary("argmin").bare(u_argmin).axis(u_argmin_axis),
    unary("cummax").bare(u_cummax).axis(u_cummax_axis),
    unary("cummin").bare(u_cummin).axis(u_cummin_axis),
    unary("cumprod").bare(u_cumprod).axis(u_cumprod_axis),
    unary("cumsum").bare(u_cumsum).axis(u_cumsum_axis),
    unary("expand_dims")
        .axis(u_expand_axis)
        .axes(u_expand_axes)
        .no_bare()
        .free_only(),
    unary("floor").bare(u_floor).free_only(),
    unary("log").bare(u_log).operand(POSITIVE),
    unary("log2").bare(u_log2).operand(POSITIVE),
    unary("log10").bare(u_log10).operand(POSITIVE),
    unary("log1p").bare(u_log1p).operand(POSITIVE),
    unary("log_sum_exp")
        .bare(u_logsumexp)
        .axis(u_logsumexp_axis)
        .axes(u_logsumexp_axes),
    unary("max").bare(u_max).axis(u_max_axis).axes(u_max_axes),
    unary("mean").bare(u_mean).axis(u_mean_axis).axes(u_mean_axes),
    unary("min").bare(u_min).axis(u_min_axis).axes(u_min_axes),
    unary("product").bare(u_prod).axis(u_prod_axis).axes(u_prod_axes),
    unary("reciprocal").bare(u_reciprocal),
    unary("round").bare(u_round),
    unary("sin").bare(u_sin),
    unary("cos").bare(u_cos),
    unary("sqrt").bare(u_sqrt).operand(POSITIVE),
    unary("sum").bare(u_sum).axis(u_sum_axis).axes(u_sum_axes),
    unary("variance").bare(u_var).axis(u_var_axis).axes(u_var_axes),
    // Free functions only.
    unary("acos").bare(u_acos).free_only().operand(UNIT),
    unary("acosh").bare(u_acosh).free_only().operand(ABOVE_ONE),
    unary("asin").bare(u_asin).free_only().operand(UNIT),
    unary("asinh").bare(u_asinh).free_only().operand(ABOVE_ONE),
    unary("atan").bare(u_atan).free_only().operand(UNIT),
    unary("atanh").bare(u_atanh).free_only().operand(OPEN_UNIT),
    unary("ceil").bare(u_ceil).free_only(),
    unary("cosh").bare(u_cosh).free_only(),
    unary("erf").bare(u_erf).free_only(),
    unary("erf_inverse").bare(u_erfinv).free_only().operand(OPEN_UNIT),
    unary("logical_not").bare(u_logical_not).free_only(),
    unary("negative").bare(u_negative).free_only(),
    unary("sigmoid").bare(u_sigmoid).free_only(),
    unary("sign").bare(u_sign).free_only(),
    unary("sinh").bare(u_sinh).free_only(),
    unary("softmax")
        .bare(u_softmax)
        .axis(u_softmax_axis)
        .axes(u_softmax_axes)
        .free_only(),
    unary("tan").bare(u_tan).free_only(),
    unary("tanh").bare(u_tanh).free_only(),
];

fn u_abs(t: &Tensor) -> Tensor {
    t.map(f32::abs)
}
fn u_all(t: &Tensor) -> Tensor {
    t.all()
}
fn u_all_axis(t: &Tensor, axis: isize) -> Tensor {
    t.all_axis(axis)
}
fn u_all_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.all_axes(axes)
}
fn u_any(t: &Tensor) -> Tensor {
    t.any()
}
fn u_any_axis(t: &Tensor, axis: isize) -> Tensor {
    t.any_axis(axis)
}
fn u_any_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.any_axes(axes)
}
fn u_argmax(t: &Tensor) -> Tensor {
    t.argmax()
}
fn u_argmax_axis(t: &Tensor, axis: isize) -> Tensor {
    t.argmax_axis(axis)
}
fn u_argmin(t: &Tensor) -> Tensor {
    t.argmin()
}
fn u_argmin_axis(t: &Tensor, axis: isize) -> Tensor {
    t.argmin_axis(axis)
}
fn u_cummax(t: &Tensor) -> Tensor {
    t.cummax()
}
fn u_cummax_axis(t: &Tensor, axis: isize) -> Tensor {
    t.cummax_axis(axis)
}
fn u_cummin(t: &Tensor) -> Tensor {
    t.cummin()
}
fn u_cummin_axis(t: &Tensor, axis: isize) -> Tensor {
    t.cummin_axis(axis)
}
fn u_cumprod(t: &Tensor) -> Tensor {
    t.cumprod()
}
fn u_cumprod_axis(t: &Tensor, axis: isize) -> Tensor {
    t.cumprod_axis(axis)
}
fn u_cumsum(t: &Tensor) -> Tensor {
    t.cumsum()
}
fn u_cumsum_axis(t: &Tensor, axis: isize) -> Tensor {
    t.cumsum_axis(axis)
}
fn u_expand_axis(t: &Tensor, axis: isize) -> Tensor {
    t.expand_dims_axis(axis)
}
fn u_expand_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.expand_dims_axes(axes)
}
fn u_floor(t: &Tensor) -> Tensor {
    t.map(f32::floor)
}
fn u_log(t: &Tensor) -> Tensor {
    t.map(f32::ln)
}
fn u_log2(t: &Tensor) -> Tensor {
    t.map(f32::log2)
}
fn u_log10(t: &Tensor) -> Tensor {
    t.map(f32::log10)
}
fn u_log1p(t: &Tensor) -> Tensor {
    t.map(f32::ln_1p)
}
fn u_logsumexp(t: &Tensor) -> Tensor {
    t.logsumexp()
}
fn u_logsumexp_axis(t: &Tensor, axis: isize) -> Tensor {
    t.logsumexp_axis(axis)
}
fn u_logsumexp_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.logsumexp_axes(axes)
}
fn u_max(t: &Tensor) -> Tensor {
    t.max()
}
fn u_max_axis(t: &Tensor, axis: isize) -> Tensor {
    t.max_axis(axis)
}
fn u_max_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.max_axes(axes)
}
fn u_mean(t: &Tensor) -> Tensor {
    t.mean()
}
fn u_mean_axis(t: &Tensor, axis: isize) -> Tensor {
    t.mean_axis(axis)
}
fn u_mean_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.mean_axes(axes)
}
fn u_min(t: &Tensor) -> Tensor {
    t.min()
}
fn u_min_axis(t: &Tensor, axis: isize) -> Tensor {
    t.min_axis(axis)
}
fn u_min_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.min_axes(axes)
}
fn u_prod(t: &Tensor) -> Tensor {
    t.prod()
}
fn u_prod_axis(t: &Tensor, axis: isize) -> Tensor {
    t.prod_axis(axis)
}
fn u_prod_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.prod_axes(axes)
}
fn u_reciprocal(t: &Tensor) -> Tensor {
    t.map(f32::recip)
}
fn u_round(t: &Tensor) -> Tensor {
    t.map(f32::round)
}
fn u_sin(t: &Tensor) -> Tensor {
    t.map(f32::sin)
}
fn u_cos(t: &Tensor) -> Tensor {
    t.map(f32::cos)
}
fn u_sqrt(t: &Tensor) -> Tensor {
    t.map(f32::sqrt)
}
fn u_sum(t: &Tensor) -> Tensor {
    t.sum()
}
fn u_sum_axis(t: &Tensor, axis: isize) -> Tensor {
    t.sum_axis(axis)
}
fn u_sum_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.sum_axes(axes)
}
fn u_var(t: &Tensor) -> Tensor {
    t.var()
}
fn u_var_axis(t: &Tensor, axis: isize) -> Tensor {
    t.var_axis(axis)
}
fn u_var_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.var_axes(axes)
}
fn u_acos(t: &Tensor) -> Tensor {
    t.map(f32::acos)
}
fn u_acosh(t: &Tensor) -> Tensor {
    t.map(f32::acosh)
}
fn u_asin(t: &Tensor) -> Tensor {
    t.map(f32::asin)
}
fn u_asinh(t: &Tensor) -> Tensor {
    t.map(f32::asinh)
}
fn u_atan(t: &Tensor) -> Tensor {
    t.map(f32::atan)
}
fn u_atanh(t: &Tensor) -> Tensor {
    t.map(f32::atanh)
}
fn u_ceil(t: &Tensor) -> Tensor {
    t.map(f32::ceil)
}
fn u_cosh(t: &Tensor) -> Tensor {
    t.map(f32::cosh)
}
fn u_erf(t: &Tensor) -> Tensor {
    t.map(ops::erf)
}
fn u_erfinv(t: &Tensor) -> Tensor {
    t.map(ops::erfinv)
}
fn u_logical_not(t: &Tensor) -> Tensor {
    let flags = t.map(|v| if v == 0.0 { 1.0 } else { 0.0 });
    Tensor::with_dtype(flags.data().to_vec(), flags.shape(), Dtype::Bool)
}
fn u_negative(t: &Tensor) -> Tensor {
    t.map(|v| -v)
}
fn u_sigmoid(t: &Tensor) -> Tensor {
    t.map(ops::sigmoid)
}
fn u_sign(t: &Tensor) -> Tensor {
    t.map(|v| {
        if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            0.0
        }
    })
}
fn u_sinh(t: &Tensor) -> Tensor {
    t.map(f32::sinh)
}
fn u_softmax(t: &Tensor) -> Tensor {
    t.softmax()
}
fn u_softmax_axis(t: &Tensor, axis: isize) -> Tensor {
    t.softmax_axis(axis)
}
fn u_softmax_axes(t: &Tensor, axes: &[isize]) -> Tensor {
    t.softmax_axes(axes)
}
fn u_tan(t: &Tensor) -> Tensor {
    t.map(f32::tan)
}
fn u_tanh(t: &Tensor) -> Tensor {
    t.map(f32::tanh)
}

// ---------------------------------------------------------------------
// Binary functions
// ---------------------------------------------------------------------

/// A two-operand function, exercised as a method and/or a free function.
pub struct BinaryEntry {
    pub name: &'static str,
    pub eval: fn(&Tensor, &Tensor) -> Tensor,
    pub free_only: bool,
    pub lhs: Option<ArgSpec>,
    pub rhs: Option<ArgSpec>,
}

const fn binary(name: &'static str, eval: fn(&Tensor, &Tensor) -> Tensor) -> BinaryEntry {
    BinaryEntry {
        name,
        eval,
        free_only: false,
        lhs: None,
        rhs: None,
    }
}

impl BinaryEntry {
    const fn free_only(mut self) -> Self {
        self.free_only = true;
        self
    }

    const fn operands(mut self, lhs: ArgSpec, rhs: ArgSpec) -> Self {
        self.lhs = Some(lhs);
        self.rhs = Some(rhs);
        self
    }
}

pub static BINARY_FUNCTIONS: &[BinaryEntry] = &[
    binary("add", b_add).free_only(),
    binary("conv1d", b_conv1d).free_only().operands(
        ArgSpec::UniformShape(&[4, 10, 4]),
        ArgSpec::UniformShape(&[2, 10, 4]),
    ),
    binary("conv2d", b_conv2d).free_only().operands(
        ArgSpec::UniformShape(&[4, 10, 12, 4]),
        ArgSpec::UniformShape(&[2, 10, 12, 4]),
    ),
    binary("convolve", b_convolve)
        .free_only()
        .operands(ArgSpec::UniformShape(&[20]), ArgSpec::UniformShape(&[4])),
    binary("divide", b_divide).free_only(),
    binary("equal", b_equal).free_only(),
    binary("greater", b_greater).free_only(),
    binary("greater_equal", b_greater_equal).free_only(),
    binary("less", b_less).free_only(),
    binary("less_equal", b_less_equal).free_only(),
    binary("log_add_exp", b_logaddexp).free_only(),
    binary("matmul", b_matmul)
        .free_only()
        .operands(ArgSpec::UniformShape(&[10, 8]), ArgSpec::UniformShape(&[8, 13])),
    binary("maximum", b_maximum).free_only(),
    binary("minimum", b_minimum).free_only(),
    binary("multiply", b_multiply).free_only(),
    binary("not_equal", b_not_equal).free_only(),
    binary("remainder", b_remainder).free_only(),
    binary("subtract", b_subtract).free_only(),
];

fn b_add(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, |x, y| x + y)
}
fn b_subtract(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, |x, y| x - y)
}
fn b_multiply(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, |x, y| x * y)
}
fn b_divide(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, |x, y| x / y)
}
fn b_remainder(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, ops::floor_mod)
}
fn b_maximum(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, f32::max)
}
fn b_minimum(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, f32::min)
}
fn b_logaddexp(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Float32, ops::logaddexp_scalar)
}
fn b_equal(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x == y { 1.0 } else { 0.0 })
}
fn b_not_equal(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x != y { 1.0 } else { 0.0 })
}
fn b_greater(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x > y { 1.0 } else { 0.0 })
}
fn b_greater_equal(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x >= y { 1.0 } else { 0.0 })
}
fn b_less(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x < y { 1.0 } else { 0.0 })
}
fn b_less_equal(a: &Tensor, b: &Tensor) -> Tensor {
    a.zip(b, Dtype::Bool, |x, y| if x <= y { 1.0 } else { 0.0 })
}
fn b_matmul(a: &Tensor, b: &Tensor) -> Tensor {
    ops::matmul(a, b)
}
fn b_conv1d(a: &Tensor, b: &Tensor) -> Tensor {
    ops::conv1d(a, b)
}
fn b_conv2d(a: &Tensor, b: &Tensor) -> Tensor {
    ops::conv2d(a, b)
}
fn b_convolve(a: &Tensor, b: &Tensor) -> Tensor {
    ops::convolve(a, b)
}

// ---------------------------------------------------------------------
// FFT transforms
// ---------------------------------------------------------------------

/// Optional transform arguments of one FFT variant.
#[derive(Debug, Clone, Copy)]
pub struct FftSpec {
    pub n: Option<usize>,
    pub s: Option<&'static [usize]>,
    pub axis: Option<isize>,
    pub axes: Option<&'static [isize]>,
}

impl FftSpec {
    pub const fn none() -> Self {
        Self {
            n: None,
            s: None,
            axis: None,
            axes: None,
        }
    }

    pub const fn with_n(n: usize) -> Self {
        Self {
            n: Some(n),
            s: None,
            axis: None,
            axes: None,
        }
    }

    pub const fn with_axis(axis: isize) -> Self {
        Self {
            n: None,
            s: None,
            axis: Some(axis),
            axes: None,
        }
    }

    pub const fn with_s(s: &'static [usize]) -> Self {
        Self {
            n: None,
            s: Some(s),
            axis: None,
            axes: None,
        }
    }

    pub const fn with_axes(axes: &'static [isize]) -> Self {
        Self {
            n: None,
            s: None,
            axis: None,
            axes: Some(axes),
        }
    }

    pub const fn with_s_axes(s: &'static [usize], axes: &'static [isize]) -> Self {
        Self {
            n: None,
            s: Some(s),
            axis: None,
            axes: Some(axes),
        }
    }
}

/// One FFT transform with its operand shape and argument variants.
pub struct FftEntry {
    pub name: &'static str,
    pub eval: fn(&ComplexTensor, &FftSpec) -> FftOutput,
    pub value: ArgSpec,
    pub variants: &'static [FftSpec],
}

static FFT_1D_VARIANTS: &[FftSpec] = &[
    FftSpec::with_n(80),
    FftSpec::with_n(120),
    FftSpec::with_axis(0),
];

static FFT_ND_VARIANTS: &[FftSpec] = &[
    FftSpec::with_s(&[3, 4]),
    FftSpec::with_axes(&[0, 2]),
    FftSpec::with_s_axes(&[10, 5], &[2, 1]),
];

pub static FFT_FUNCTIONS: &[FftEntry] = &[
    FftEntry {
        name: "fft",
        eval: f_fft,
        value: ArgSpec::UniformShape(&[100, 100]),
        variants: FFT_1D_VARIANTS,
    },
    FftEntry {
        name: "ifft",
        eval: f_ifft,
        value: ArgSpec::UniformShape(&[100]),
        variants: FFT_1D_VARIANTS,
    },
    FftEntry {
        name: "rfft",
        eval: f_rfft,
        value: ArgSpec::UniformShape(&[100]),
        variants: FFT_1D_VARIANTS,
    },
    FftEntry {
        name: "irfft",
        eval: f_irfft,
        value: ArgSpec::UniformShape(&[100]),
        variants: FFT_1D_VARIANTS,
    },
    FftEntry {
        name: "fft2",
        eval: f_fft2,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "ifft2",
        eval: f_ifft2,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "fftn",
        eval: f_fftn,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "ifftn",
        eval: f_ifftn,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "rfft2",
        eval: f_rfft2,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "irfft2",
        eval: f_irfft2,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "rfftn",
        eval: f_rfftn,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
    FftEntry {
        name: "irfftn",
        eval: f_irfftn,
        value: ArgSpec::UniformShape(&[8, 8, 8]),
        variants: FFT_ND_VARIANTS,
    },
];

fn f_fft(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::fft(c, spec.n, spec.axis))
}
fn f_ifft(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::ifft(c, spec.n, spec.axis))
}
fn f_rfft(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::rfft(c, spec.n, spec.axis))
}
fn f_irfft(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Real(fft::irfft(c, spec.n, spec.axis))
}
fn f_fft2(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::fft2(c, spec.s, spec.axes))
}
fn f_ifft2(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::ifft2(c, spec.s, spec.axes))
}
fn f_fftn(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::fftn(c, spec.s, spec.axes))
}
fn f_ifftn(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::ifftn(c, spec.s, spec.axes))
}
fn f_rfft2(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::rfft2(c, spec.s, spec.axes))
}
fn f_irfft2(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Real(fft::irfft2(c, spec.s, spec.axes))
}
fn f_rfftn(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Complex(fft::rfftn(c, spec.s, spec.axes))
}
fn f_irfftn(c: &ComplexTensor, spec: &FftSpec) -> FftOutput {
    FftOutput::Real(fft::irfftn(c, spec.s, spec.axes))
}

// ---------------------------------------------------------------------
// Optimizers
// ---------------------------------------------------------------------

/// An extra-hyperparameter variant of an optimizer entry.
pub struct OptimizerVariant {
    /// Builder suffix appended to the target constructor.
    pub target_extra: &'static str,
    pub make: fn() -> Box<dyn Optimizer>,
}

/// One optimizer with its target constructor spelling and variants.
pub struct OptimizerEntry {
    pub name: &'static str,
    pub target_ctor: &'static str,
    pub make: fn() -> Box<dyn Optimizer>,
    pub variants: &'static [OptimizerVariant],
}

pub static OPTIMIZERS: &[OptimizerEntry] = &[
    OptimizerEntry {
        name: "sgd",
        target_ctor: "Sgd::new(0.1)",
        make: o_sgd,
        variants: &[
            OptimizerVariant {
                target_extra: ".with_momentum(0.1)",
                make: o_sgd_momentum,
            },
            OptimizerVariant {
                target_extra: ".with_momentum(0.1).with_dampening(0.1)",
                make: o_sgd_momentum_dampening,
            },
        ],
    },
    OptimizerEntry {
        name: "rms_prop",
        target_ctor: "RmsProp::new(0.1)",
        make: o_rms_prop,
        variants: &[],
    },
    OptimizerEntry {
        name: "ada_grad",
        target_ctor: "AdaGrad::new(0.1)",
        make: o_ada_grad,
        variants: &[],
    },
    OptimizerEntry {
        name: "ada_delta",
        target_ctor: "AdaDelta::new(0.1)",
        make: o_ada_delta,
        variants: &[],
    },
    OptimizerEntry {
        name: "adam",
        target_ctor: "Adam::new(0.1)",
        make: o_adam,
        variants: &[],
    },
    OptimizerEntry {
        name: "adam_w",
        target_ctor: "AdamW::new(0.1)",
        make: o_adam_w,
        variants: &[],
    },
    OptimizerEntry {
        name: "adamax",
        target_ctor: "Adamax::new(0.1)",
        make: o_adamax,
        variants: &[],
    },
    OptimizerEntry {
        name: "lion",
        target_ctor: "Lion::new(0.1)",
        make: o_lion,
        variants: &[OptimizerVariant {
            target_extra: ".with_weight_decay(0.1)",
            make: o_lion_weight_decay,
        }],
    },
    OptimizerEntry {
        name: "adafactor",
        target_ctor: "Adafactor::new(0.1)",
        make: o_adafactor,
        variants: &[OptimizerVariant {
            target_extra: ".with_beta1(0.1)",
            make: o_adafactor_beta1,
        }],
    },
];

/// Adafactor keeps a non-factored accumulator for vectors; exercised by one
/// extra case at this shape.
pub const ADAFACTOR_VECTOR_VALUE: ArgSpec = ArgSpec::UniformShape(&[10]);

fn o_sgd() -> Box<dyn Optimizer> {
    Box::new(Sgd::new(LEARNING_RATE))
}
fn o_sgd_momentum() -> Box<dyn Optimizer> {
    Box::new(Sgd::new(LEARNING_RATE).with_momentum(0.1))
}
fn o_sgd_momentum_dampening() -> Box<dyn Optimizer> {
    Box::new(Sgd::new(LEARNING_RATE).with_momentum(0.1).with_dampening(0.1))
}
fn o_rms_prop() -> Box<dyn Optimizer> {
    Box::new(RmsProp::new(LEARNING_RATE))
}
fn o_ada_grad() -> Box<dyn Optimizer> {
    Box::new(AdaGrad::new(LEARNING_RATE))
}
fn o_ada_delta() -> Box<dyn Optimizer> {
    Box::new(AdaDelta::new(LEARNING_RATE))
}
fn o_adam() -> Box<dyn Optimizer> {
    Box::new(Adam::new(LEARNING_RATE))
}
fn o_adam_w() -> Box<dyn Optimizer> {
    Box::new(AdamW::new(LEARNING_RATE))
}
fn o_adamax() -> Box<dyn Optimizer> {
    Box::new(Adamax::new(LEARNING_RATE))
}
fn o_lion() -> Box<dyn Optimizer> {
    Box::new(Lion::new(LEARNING_RATE))
}
fn o_lion_weight_decay() -> Box<dyn Optimizer> {
    Box::new(Lion::new(LEARNING_RATE).with_weight_decay(0.1))
}
fn o_adafactor() -> Box<dyn Optimizer> {
    Box::new(Adafactor::new(LEARNING_RATE))
}
fn o_adafactor_beta1() -> Box<dyn Optimizer> {
    Box::new(Adafactor::new(LEARNING_RATE).with_beta1(0.1))
}

// ---------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------

/// One constructor-parameter variant of a layer entry.
pub struct LayerVariant {
    /// Target constructor spelling, e.g. `Linear::new(&mut stream, 16, 5)`.
    pub target_ctor: &'static str,
    pub make: fn(&mut RandomStream) -> Box<dyn Module>,
}

/// One layer with its variants, output-subset policy and input override.
///
/// Entries whose constructors require parameters have no `bare` variant;
/// the driver skips the parameter-free case for them rather than inventing
/// defaults.
pub struct LayerEntry {
    pub name: &'static str,
    pub bare: Option<LayerVariant>,
    pub variants: &'static [LayerVariant],
    pub subset: Subset,
    pub value: Option<ArgSpec>,
}

const fn layer(name: &'static str, ctor: &'static str, make: fn(&mut RandomStream) -> Box<dyn Module>) -> LayerEntry {
    LayerEntry {
        name,
        bare: Some(LayerVariant { target_ctor: ctor, make }),
        variants: &[],
        subset: Subset::Full,
        value: None,
    }
}

macro_rules! param_layer {
    ($name:expr, $ctor:expr, $make:expr $(,)?) => {
        LayerEntry {
            name: $name,
            bare: None,
            variants: &[LayerVariant {
                target_ctor: $ctor,
                make: $make,
            }],
            subset: Subset::Full,
            value: None,
        }
    };
}

impl LayerEntry {
    const fn subset(mut self, subset: Subset) -> Self {
        self.subset = subset;
        self
    }

    const fn value(mut self, value: ArgSpec) -> Self {
        self.value = Some(value);
        self
    }
}

pub static LAYERS: &[LayerEntry] = &[
    layer("glu", "Glu::new()", l_glu),
    layer("sigmoid", "Sigmoid::new()", l_sigmoid),
    layer("mish", "Mish::new()", l_mish),
    layer("relu", "Relu::new()", l_relu),
    layer("leaky_relu", "LeakyRelu::new()", l_leaky_relu),
    layer("relu6", "Relu6::new()", l_relu6),
    layer("softmax", "Softmax::new()", l_softmax),
    layer("softplus", "Softplus::new()", l_softplus),
    layer("softsign", "Softsign::new()", l_softsign),
    layer("celu", "Celu::new()", l_celu),
    layer("silu", "Silu::new()", l_silu),
    layer("log_softmax", "LogSoftmax::new()", l_log_softmax),
    layer("log_sigmoid", "LogSigmoid::new()", l_log_sigmoid),
    layer("prelu", "PRelu::new()", l_prelu),
    layer("gelu", "Gelu::new()", l_gelu),
    layer("tanh", "Tanh::new()", l_tanh),
    layer("hard_swish", "HardSwish::new()", l_hard_swish),
    layer("step", "Step::new()", l_step),
    layer("selu", "Selu::new()", l_selu),
    param_layer!("linear", "Linear::new(&mut stream, 16, 5)", l_linear),
    param_layer!("conv1d", "Conv1d::new(&mut stream, 16, 2, 8)", l_conv1d),
    param_layer!("conv2d", "Conv2d::new(&mut stream, 4, 2, 8)", l_conv2d)
        .value(ArgSpec::UniformShape(&[2, 8, 8, 4])),
    layer("dropout", "Dropout::new()", l_dropout),
    layer("dropout2d", "Dropout2d::new()", l_dropout2d),
    layer("dropout3d", "Dropout3d::new()", l_dropout3d)
        .value(ArgSpec::UniformShape(&[2, 8, 8, 4])),
    // Integer inputs stay below the embedding count by construction.
    param_layer!("embedding", "Embedding::new(&mut stream, 10, 8)", l_embedding)
        .value(ArgSpec::RangedInt(&[2, 8, 8, 4])),
    param_layer!("instance_norm", "InstanceNorm::new(8)", l_instance_norm).subset(Subset::Element),
    param_layer!("layer_norm", "LayerNorm::new(16)", l_layer_norm).subset(Subset::Column),
    param_layer!("rms_norm", "RmsNorm::new(16)", l_rms_norm),
    param_layer!("group_norm", "GroupNorm::new(4, 16)", l_group_norm).subset(Subset::Element),
    param_layer!("batch_norm", "BatchNorm::new(16)", l_batch_norm).subset(Subset::Element),
    param_layer!("rope", "Rope::new(8)", l_rope),
    param_layer!(
        "sinusoidal_positional_encoding",
        "SinusoidalPositionalEncoding::new(8)",
        l_sinusoidal,
    ),
];

fn l_glu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Glu::new())
}
fn l_sigmoid(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Sigmoid::new())
}
fn l_mish(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Mish::new())
}
fn l_relu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Relu::new())
}
fn l_leaky_relu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(LeakyRelu::new())
}
fn l_relu6(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Relu6::new())
}
fn l_softmax(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Softmax::new())
}
fn l_softplus(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Softplus::new())
}
fn l_softsign(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Softsign::new())
}
fn l_celu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Celu::new())
}
fn l_silu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Silu::new())
}
fn l_log_softmax(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(LogSoftmax::new())
}
fn l_log_sigmoid(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(LogSigmoid::new())
}
fn l_prelu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(PRelu::new())
}
fn l_gelu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Gelu::new())
}
fn l_tanh(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Tanh::new())
}
fn l_hard_swish(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(HardSwish::new())
}
fn l_step(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Step::new())
}
fn l_selu(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Selu::new())
}
fn l_linear(rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Linear::new(rng, 16, 5))
}
fn l_conv1d(rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Conv1d::new(rng, 16, 2, 8))
}
fn l_conv2d(rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Conv2d::new(rng, 4, 2, 8))
}
fn l_dropout(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Dropout::new())
}
fn l_dropout2d(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Dropout2d::new())
}
fn l_dropout3d(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Dropout3d::new())
}
fn l_embedding(rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Embedding::new(rng, 10, 8))
}
fn l_instance_norm(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(InstanceNorm::new(8))
}
fn l_layer_norm(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(LayerNorm::new(16))
}
fn l_rms_norm(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(RmsNorm::new(16))
}
fn l_group_norm(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(GroupNorm::new(4, 16))
}
fn l_batch_norm(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(BatchNorm::new(16))
}
fn l_rope(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(Rope::new(8))
}
fn l_sinusoidal(_rng: &mut RandomStream) -> Box<dyn Module> {
    Box::new(SinusoidalPositionalEncoding::new(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_flags_match_evaluators() {
        for entry in UNARY_FUNCTIONS {
            assert_eq!(entry.axis, entry.eval_axis.is_some(), "{}", entry.name);
            assert_eq!(entry.axes, entry.eval_axes.is_some(), "{}", entry.name);
            assert_eq!(!entry.no_bare, entry.eval.is_some(), "{}", entry.name);
        }
    }

    #[test]
    fn test_layers_requiring_params_have_variants() {
        for entry in LAYERS {
            assert!(
                entry.bare.is_some() || !entry.variants.is_empty(),
                "layer `{}` has no constructible variant",
                entry.name
            );
        }
    }

    #[test]
    fn test_fft_tables_cover_all_argument_forms() {
        let has_n = FFT_1D_VARIANTS.iter().any(|v| v.n.is_some());
        let has_axis = FFT_1D_VARIANTS.iter().any(|v| v.axis.is_some());
        let has_s = FFT_ND_VARIANTS.iter().any(|v| v.s.is_some());
        let has_axes = FFT_ND_VARIANTS.iter().any(|v| v.axes.is_some());
        assert!(has_n && has_axis && has_s && has_axes);
    }

    #[test]
    fn test_domain_restricted_entries_have_bounded_operands() {
        for name in ["log", "log2", "log10", "log1p", "sqrt", "atanh", "erf_inverse"] {
            let entry = UNARY_FUNCTIONS
                .iter()
                .find(|e| e.name == name)
                .expect("entry present");
            assert!(
                matches!(entry.operand, Some(ArgSpec::RangedUniform { .. })),
                "`{name}` must bound its operand range"
            );
        }
    }
}
