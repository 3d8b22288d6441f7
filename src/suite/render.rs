//! Pluggable rendering of target-language test syntax.
//!
//! Emitters never format target syntax themselves: every declaration,
//! invocation and assertion goes through the [`Render`] trait, so a
//! different target test framework can be substituted without touching the
//! synthesis or evaluation logic. [`RustBackend`] is the shipped
//! implementation; it emits a self-contained Rust test module against a
//! target tensor crate's API.

use super::catalog::FftSpec;
use crate::tensor::Dtype;

/// Axis qualifier of an expanded catalogue variant.
#[derive(Debug, Clone, Copy)]
pub enum Qualifier {
    Bare,
    Axis(isize),
    Axes(&'static [isize]),
}

/// Subset applied to a layer output before verification.
///
/// Exists because some normalization layers produce outputs whose global
/// mean and sum are structurally near zero, making the relative-tolerance
/// check meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subset {
    /// Verify the entire output.
    Full,
    /// Verify the `[..., 0]` column.
    Column,
    /// Verify the `[0, 0]` element slice.
    Element,
}

/// Target spelling of a binary operator.
#[derive(Debug, Clone, Copy)]
pub enum OpSpelling {
    /// Rendered infix, e.g. `+`.
    Symbol(&'static str),
    /// Rendered as a method call, e.g. `.eq(...)`.
    Method(&'static str),
}

/// Rendering backend interface.
///
/// One method per snippet shape the emitters need; every method returns
/// fully indented text including the trailing newline.
pub trait Render {
    fn suite_open(&self) -> String;
    fn suite_close(&self) -> String;
    fn case_open(&self, name: &str) -> String;
    fn case_close(&self) -> String;
    fn seed_pin(&self, seed: u64) -> String;

    fn declare_normal(&self, name: &str, shape: &[usize]) -> String;
    fn declare_normal_scalar(&self, name: &str) -> String;
    fn declare_uniform(&self, name: &str, low: f32, high: f32, shape: &[usize]) -> String;
    fn declare_randint(&self, name: &str, low: i32, high: i32, shape: &[usize]) -> String;
    fn declare_literal(&self, name: &str, value: f32) -> String;

    fn assert_shape(&self, expr: &str, shape: &[usize]) -> String;
    fn assert_dtype(&self, expr: &str, dtype: Dtype) -> String;
    fn assert_all(&self, expr: &str, expected: bool) -> String;
    fn assert_any(&self, expr: &str, expected: bool) -> String;
    fn assert_mean(&self, expr: &str, value: f32, accuracy: f32) -> String;
    fn assert_sum(&self, expr: &str, value: f32, accuracy: f32) -> String;
    fn assert_scalar(&self, expr: &str, value: f32, accuracy: f32) -> String;

    fn invoke_operator(
        &self,
        result: &str,
        spelling: &OpSpelling,
        lhs: &str,
        lhs_is_tensor: bool,
        rhs: &str,
        rhs_is_tensor: bool,
    ) -> String;
    fn invoke_method(&self, result: &str, recv: &str, name: &str, qualifier: &Qualifier) -> String;
    fn invoke_method2(&self, result: &str, recv: &str, name: &str, arg: &str) -> String;
    fn invoke_free1(&self, result: &str, name: &str, arg: &str, qualifier: &Qualifier) -> String;
    fn invoke_free2(&self, result: &str, name: &str, lhs: &str, rhs: &str) -> String;

    fn combine_complex(&self, out: &str, re: &str, im: &str) -> String;
    fn invoke_fft(&self, result: &str, name: &str, arg: &str, spec: &FftSpec) -> String;
    fn split_complex(&self, result: &str, real_name: &str, imag_name: &str) -> String;

    fn invoke_optimizer(&self, result: &str, ctor: &str, param: &str, grad: &str) -> String;
    /// Spelling of a keyed parameter lookup, e.g. `result["a"]`.
    fn keyed(&self, map_expr: &str, key: &str) -> String;
    fn invoke_layer(&self, result: &str, ctor: &str, input: &str, subset: Subset) -> String;
    fn invoke_quantize(
        &self,
        outputs: (&str, &str, &str),
        input: &str,
        group_size: usize,
        bits: u32,
    ) -> String;
}

/// Backend emitting a Rust test module against a target tensor crate.
pub struct RustBackend {
    target: String,
}

/// Case-body indentation (inside `mod` + `fn`).
const BODY: &str = "        ";
/// Case-level indentation (inside `mod`).
const CASE: &str = "    ";

impl RustBackend {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new("trueno")
    }
}

/// Shortest-roundtrip float literal (`{:?}` is stable and re-parses to the
/// same `f32`).
fn lit(v: f32) -> String {
    if v.is_finite() {
        format!("{v:?}")
    } else if v.is_nan() {
        "f32::NAN".to_string()
    } else if v > 0.0 {
        "f32::INFINITY".to_string()
    } else {
        "f32::NEG_INFINITY".to_string()
    }
}

fn shape_lit(shape: &[usize]) -> String {
    let inner: Vec<String> = shape.iter().map(ToString::to_string).collect();
    format!("[{}]", inner.join(", "))
}

fn axes_lit(axes: &[isize]) -> String {
    let inner: Vec<String> = axes.iter().map(ToString::to_string).collect();
    format!("&[{}]", inner.join(", "))
}

/// Operand spelling: tensors are passed by reference, scalars by value.
fn operand(name: &str, is_tensor: bool) -> String {
    if is_tensor {
        format!("&{name}")
    } else {
        name.to_string()
    }
}

impl Render for RustBackend {
    fn suite_open(&self) -> String {
        format!(
            "// Generated by cotejar-gen. Do not edit by hand.\n\
             //\n\
             // Each case pins a random seed, rebuilds the same inputs through the\n\
             // target stream, and checks results against statistics computed by the\n\
             // reference engine. Tolerances are 2% of the reference magnitude.\n\
             \n\
             mod {}_parity {{\n\
             {CASE}use {}::prelude::*;\n\
             \n",
            self.target, self.target
        )
    }

    fn suite_close(&self) -> String {
        "}\n".to_string()
    }

    fn case_open(&self, name: &str) -> String {
        format!("{CASE}#[test]\n{CASE}fn {name}() {{\n")
    }

    fn case_close(&self) -> String {
        format!("{CASE}}}\n")
    }

    fn seed_pin(&self, seed: u64) -> String {
        format!("{BODY}let mut stream = Stream::seed({seed});\n")
    }

    fn declare_normal(&self, name: &str, shape: &[usize]) -> String {
        format!("{BODY}let {name} = stream.normal(&{});\n", shape_lit(shape))
    }

    fn declare_normal_scalar(&self, name: &str) -> String {
        format!("{BODY}let {name} = stream.normal_scalar();\n")
    }

    fn declare_uniform(&self, name: &str, low: f32, high: f32, shape: &[usize]) -> String {
        format!(
            "{BODY}let {name} = stream.uniform({}, {}, &{});\n",
            lit(low),
            lit(high),
            shape_lit(shape)
        )
    }

    fn declare_randint(&self, name: &str, low: i32, high: i32, shape: &[usize]) -> String {
        format!(
            "{BODY}let {name} = stream.randint({low}, {high}, &{});\n",
            shape_lit(shape)
        )
    }

    fn declare_literal(&self, name: &str, value: f32) -> String {
        format!("{BODY}let {name} = {}f32;\n", lit(value))
    }

    fn assert_shape(&self, expr: &str, shape: &[usize]) -> String {
        if shape.is_empty() {
            format!("{BODY}assert!({expr}.shape().is_empty());\n")
        } else {
            format!("{BODY}assert_eq!({expr}.shape(), {});\n", shape_lit(shape))
        }
    }

    fn assert_dtype(&self, expr: &str, dtype: Dtype) -> String {
        format!("{BODY}assert_eq!({expr}.dtype(), Dtype::{});\n", dtype.name())
    }

    fn assert_all(&self, expr: &str, expected: bool) -> String {
        format!("{BODY}assert_eq!({expr}.all(), {expected});\n")
    }

    fn assert_any(&self, expr: &str, expected: bool) -> String {
        format!("{BODY}assert_eq!({expr}.any(), {expected});\n")
    }

    fn assert_mean(&self, expr: &str, value: f32, accuracy: f32) -> String {
        format!(
            "{BODY}assert_close!({expr}.mean(), {}, {});\n",
            lit(value),
            lit(accuracy)
        )
    }

    fn assert_sum(&self, expr: &str, value: f32, accuracy: f32) -> String {
        format!(
            "{BODY}assert_close!({expr}.sum(), {}, {});\n",
            lit(value),
            lit(accuracy)
        )
    }

    fn assert_scalar(&self, expr: &str, value: f32, accuracy: f32) -> String {
        format!(
            "{BODY}assert_close!({expr}, {}, {});\n",
            lit(value),
            lit(accuracy)
        )
    }

    fn invoke_operator(
        &self,
        result: &str,
        spelling: &OpSpelling,
        lhs: &str,
        lhs_is_tensor: bool,
        rhs: &str,
        rhs_is_tensor: bool,
    ) -> String {
        match spelling {
            OpSpelling::Symbol(op) => format!(
                "{BODY}let {result} = {} {op} {};\n",
                operand(lhs, lhs_is_tensor),
                operand(rhs, rhs_is_tensor)
            ),
            OpSpelling::Method(m) => format!(
                "{BODY}let {result} = {lhs}.{m}({});\n",
                operand(rhs, rhs_is_tensor)
            ),
        }
    }

    fn invoke_method(&self, result: &str, recv: &str, name: &str, qualifier: &Qualifier) -> String {
        match qualifier {
            Qualifier::Bare => format!("{BODY}let {result} = {recv}.{name}();\n"),
            Qualifier::Axis(a) => format!("{BODY}let {result} = {recv}.{name}_axis({a});\n"),
            Qualifier::Axes(list) => format!(
                "{BODY}let {result} = {recv}.{name}_axes({});\n",
                axes_lit(list)
            ),
        }
    }

    fn invoke_method2(&self, result: &str, recv: &str, name: &str, arg: &str) -> String {
        format!("{BODY}let {result} = {recv}.{name}(&{arg});\n")
    }

    fn invoke_free1(&self, result: &str, name: &str, arg: &str, qualifier: &Qualifier) -> String {
        match qualifier {
            Qualifier::Bare => format!("{BODY}let {result} = {name}(&{arg});\n"),
            Qualifier::Axis(a) => format!("{BODY}let {result} = {name}_axis(&{arg}, {a});\n"),
            Qualifier::Axes(list) => format!(
                "{BODY}let {result} = {name}_axes(&{arg}, {});\n",
                axes_lit(list)
            ),
        }
    }

    fn invoke_free2(&self, result: &str, name: &str, lhs: &str, rhs: &str) -> String {
        format!("{BODY}let {result} = {name}(&{lhs}, &{rhs});\n")
    }

    fn combine_complex(&self, out: &str, re: &str, im: &str) -> String {
        format!("{BODY}let {out} = Tensor::complex(&{re}, &{im});\n")
    }

    fn invoke_fft(&self, result: &str, name: &str, arg: &str, spec: &FftSpec) -> String {
        let first = match (spec.n, spec.s) {
            (Some(n), _) => format!("Some({n})"),
            (None, Some(s)) => format!("Some({})", axes_lit_usize(s)),
            (None, None) => "None".to_string(),
        };
        let second = match (spec.axis, spec.axes) {
            (Some(a), _) => format!("Some({a})"),
            (None, Some(list)) => format!("Some({})", axes_lit(list)),
            (None, None) => "None".to_string(),
        };
        format!("{BODY}let {result} = {name}(&{arg}, {first}, {second});\n")
    }

    fn split_complex(&self, result: &str, real_name: &str, imag_name: &str) -> String {
        format!(
            "{BODY}let {real_name} = {result}.real();\n{BODY}let {imag_name} = {result}.imag();\n"
        )
    }

    fn invoke_optimizer(&self, result: &str, ctor: &str, param: &str, grad: &str) -> String {
        format!(
            "{BODY}let mut parameters = Parameters::new();\n\
             {BODY}parameters.insert(\"a\", {param}.clone());\n\
             {BODY}let mut gradients = Parameters::new();\n\
             {BODY}gradients.insert(\"a\", {grad}.clone());\n\
             {BODY}let {result} = {ctor}.apply(&gradients, &parameters);\n"
        )
    }

    fn keyed(&self, map_expr: &str, key: &str) -> String {
        format!("{map_expr}[\"{key}\"]")
    }

    fn invoke_layer(&self, result: &str, ctor: &str, input: &str, subset: Subset) -> String {
        let suffix = match subset {
            Subset::Full => String::new(),
            Subset::Column => ".index_last(0)".to_string(),
            Subset::Element => ".index_prefix(&[0, 0])".to_string(),
        };
        format!(
            "{BODY}let layer = {ctor};\n\
             {BODY}let {result} = layer.forward(&mut stream, &{input}){suffix};\n"
        )
    }

    fn invoke_quantize(
        &self,
        outputs: (&str, &str, &str),
        input: &str,
        group_size: usize,
        bits: u32,
    ) -> String {
        format!(
            "{BODY}let ({}, {}, {}) = quantize(&{input}, {group_size}, {bits});\n",
            outputs.0, outputs.1, outputs.2
        )
    }
}

fn axes_lit_usize(axes: &[usize]) -> String {
    let inner: Vec<String> = axes.iter().map(ToString::to_string).collect();
    format!("&[{}]", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_literal_for_mean_of_ten() {
        let b = RustBackend::default();
        let line = b.assert_mean("result", 10.0, (10.0f32 * 0.02).abs());
        assert!(line.contains("10.0"));
        assert!(line.contains("0.2"), "line was: {line}");
    }

    #[test]
    fn test_operator_reference_spelling() {
        let b = RustBackend::default();
        let both = b.invoke_operator("result", &OpSpelling::Symbol("+"), "a", true, "b", true);
        assert_eq!(both, "        let result = &a + &b;\n");
        let scalar_lhs = b.invoke_operator("result", &OpSpelling::Symbol("+"), "a", false, "b", true);
        assert_eq!(scalar_lhs, "        let result = a + &b;\n");
    }

    #[test]
    fn test_method_spelling_for_comparison() {
        let b = RustBackend::default();
        let line = b.invoke_operator("result", &OpSpelling::Method("eq"), "a", true, "b", true);
        assert_eq!(line, "        let result = a.eq(&b);\n");
    }

    #[test]
    fn test_axis_qualifiers_compose_names() {
        let b = RustBackend::default();
        assert!(b
            .invoke_method("result", "a", "sum", &Qualifier::Axis(-1))
            .contains("a.sum_axis(-1)"));
        assert!(b
            .invoke_free1("result", "softmax", "a", &Qualifier::Axes(&[0, -1]))
            .contains("softmax_axes(&a, &[0, -1])"));
    }

    #[test]
    fn test_scalar_shape_assertion() {
        let b = RustBackend::default();
        assert!(b.assert_shape("result", &[]).contains("is_empty"));
        assert!(b.assert_shape("result", &[4, 3]).contains("[4, 3]"));
    }

    #[test]
    fn test_suite_wrapper_brackets() {
        let b = RustBackend::new("trueno");
        assert!(b.suite_open().contains("mod trueno_parity {"));
        assert_eq!(b.suite_close(), "}\n");
    }

    #[test]
    fn test_fft_argument_forms() {
        let b = RustBackend::default();
        let spec = FftSpec {
            n: Some(80),
            s: None,
            axis: None,
            axes: None,
        };
        assert!(b
            .invoke_fft("result", "fft", "c", &spec)
            .contains("fft(&c, Some(80), None)"));
        let spec = FftSpec {
            n: None,
            s: Some(&[10, 5]),
            axis: None,
            axes: Some(&[2, 1]),
        };
        assert!(b
            .invoke_fft("result", "fft2", "c", &spec)
            .contains("fft2(&c, Some(&[10, 5]), Some(&[2, 1]))"));
    }
}
