//! Case emitters, one per operation shape.
//!
//! Every emitter follows the same protocol: reserve a unique name, draw one
//! seed, pin it, re-seed the engine stream, synthesize and declare operands
//! left to right, verify array-valued inputs, render the paired invocation,
//! evaluate the reference, verify the output, close the case. The seed draw
//! happens immediately before argument synthesis — reordering either side
//! breaks reproducibility.

use super::args::{synthesize, ArgSpec};
use super::catalog::{
    BinaryEntry, FftEntry, FftSpec, LayerVariant, OperatorEntry, UnaryEntry,
};
use super::render::{Qualifier, Render, Subset};
use super::verify::verify;
use super::Session;
use crate::error::{CotejarError, Result};
use crate::optim::{Optimizer, Parameters};
use crate::tensor::fft::{ComplexTensor, FftOutput};
use crate::tensor::Tensor;

/// Emitter 1: language-level binary operator.
pub fn operator_case(
    s: &mut Session,
    b: &dyn Render,
    entry: &OperatorEntry,
    lhs: &ArgSpec,
    rhs: &ArgSpec,
) -> String {
    let name = s.names.reserve(entry.name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let (lhs_decl, lhs_val) = synthesize(b, &mut s.stream, "a", lhs);
    let (rhs_decl, rhs_val) = synthesize(b, &mut s.stream, "b", rhs);

    out += &lhs_decl;
    if let Some(t) = lhs_val.tensor() {
        out += &verify(b, "a", t);
    }
    out += &rhs_decl;
    if let Some(t) = rhs_val.tensor() {
        out += &verify(b, "b", t);
    }

    out += &b.invoke_operator(
        "result",
        &entry.spelling,
        "a",
        lhs_val.is_tensor(),
        "b",
        rhs_val.is_tensor(),
    );
    let result = (entry.eval)(&lhs_val, &rhs_val);
    out += &verify(b, "result", &result);
    out += &b.case_close();
    out
}

fn unary_reference(entry: &UnaryEntry, input: &Tensor, qualifier: &Qualifier) -> Result<Tensor> {
    match qualifier {
        Qualifier::Bare => entry
            .eval
            .map(|f| f(input))
            .ok_or_else(|| CotejarError::catalogue(entry.name, "bare variant without an evaluator")),
        Qualifier::Axis(axis) => entry
            .eval_axis
            .map(|f| f(input, *axis))
            .ok_or_else(|| {
                CotejarError::catalogue(entry.name, "axis variant requested but no axis evaluator")
            }),
        Qualifier::Axes(axes) => entry
            .eval_axes
            .map(|f| f(input, axes))
            .ok_or_else(|| {
                CotejarError::catalogue(entry.name, "axes variant requested but no axes evaluator")
            }),
    }
}

fn unary_case(
    s: &mut Session,
    b: &dyn Render,
    entry: &UnaryEntry,
    qualifier: &Qualifier,
    operand: &ArgSpec,
    method_style: bool,
) -> Result<String> {
    let name = s.names.reserve(entry.name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let (decl, value) = synthesize(b, &mut s.stream, "a", operand);
    out += &decl;
    if let Some(t) = value.tensor() {
        out += &verify(b, "a", t);
    }

    let input = value.as_tensor();
    out += &if method_style {
        b.invoke_method("result", "a", entry.name, qualifier)
    } else {
        b.invoke_free1("result", entry.name, "a", qualifier)
    };
    let result = unary_reference(entry, &input, qualifier)?;
    out += &verify(b, "result", &result);
    out += &b.case_close();
    Ok(out)
}

/// Emitter 2: unary array method.
pub fn unary_method_case(
    s: &mut Session,
    b: &dyn Render,
    entry: &UnaryEntry,
    qualifier: &Qualifier,
    operand: &ArgSpec,
) -> Result<String> {
    unary_case(s, b, entry, qualifier, operand, true)
}

/// Emitter 3: unary free function.
pub fn unary_free_case(
    s: &mut Session,
    b: &dyn Render,
    entry: &UnaryEntry,
    qualifier: &Qualifier,
    operand: &ArgSpec,
) -> Result<String> {
    unary_case(s, b, entry, qualifier, operand, false)
}

fn binary_case(
    s: &mut Session,
    b: &dyn Render,
    entry: &BinaryEntry,
    method_style: bool,
) -> String {
    let name = s.names.reserve(entry.name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let lhs = entry.lhs.unwrap_or(ArgSpec::DefaultNormal);
    let rhs = entry.rhs.unwrap_or(ArgSpec::DefaultNormal);
    let (lhs_decl, lhs_val) = synthesize(b, &mut s.stream, "a", &lhs);
    let (rhs_decl, rhs_val) = synthesize(b, &mut s.stream, "b", &rhs);

    out += &lhs_decl;
    if let Some(t) = lhs_val.tensor() {
        out += &verify(b, "a", t);
    }
    out += &rhs_decl;
    if let Some(t) = rhs_val.tensor() {
        out += &verify(b, "b", t);
    }

    out += &if method_style {
        b.invoke_method2("result", "a", entry.name, "b")
    } else {
        b.invoke_free2("result", entry.name, "a", "b")
    };
    let result = (entry.eval)(&lhs_val.as_tensor(), &rhs_val.as_tensor());
    out += &verify(b, "result", &result);
    out += &b.case_close();
    out
}

/// Emitter 4: binary array method.
pub fn binary_method_case(s: &mut Session, b: &dyn Render, entry: &BinaryEntry) -> String {
    binary_case(s, b, entry, true)
}

/// Emitter 5: binary free function.
pub fn binary_free_case(s: &mut Session, b: &dyn Render, entry: &BinaryEntry) -> String {
    binary_case(s, b, entry, false)
}

/// Emitter 6: FFT transform.
///
/// Two real operands are combined into one complex operand; complex results
/// are split back into real and imaginary parts for separate verification.
pub fn fft_case(s: &mut Session, b: &dyn Render, entry: &FftEntry, spec: &FftSpec) -> String {
    let name = s.names.reserve(entry.name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let (r_decl, r_val) = synthesize(b, &mut s.stream, "r", &entry.value);
    let (i_decl, i_val) = synthesize(b, &mut s.stream, "i", &entry.value);

    out += &r_decl;
    if let Some(t) = r_val.tensor() {
        out += &verify(b, "r", t);
    }
    out += &i_decl;
    if let Some(t) = i_val.tensor() {
        out += &verify(b, "i", t);
    }

    out += &b.combine_complex("c", "r", "i");
    let c = ComplexTensor::from_parts(&r_val.as_tensor(), &i_val.as_tensor());

    out += &b.invoke_fft("result", entry.name, "c", spec);
    match (entry.eval)(&c, spec) {
        FftOutput::Complex(result) => {
            out += &b.split_complex("result", "result_real", "result_imag");
            out += &verify(b, "result_real", &result.real());
            out += &verify(b, "result_imag", &result.imag());
        }
        FftOutput::Real(result) => {
            out += &verify(b, "result", &result);
        }
    }
    out += &b.case_close();
    out
}

/// Emitter 7: one optimizer update step.
///
/// Parameter and gradient are wrapped in named containers under key `"a"`;
/// the updated parameter is verified under the same key.
pub fn optimizer_case(
    s: &mut Session,
    b: &dyn Render,
    base_name: &str,
    target_ctor: &str,
    make: fn() -> Box<dyn Optimizer>,
    value: &ArgSpec,
) -> String {
    let name = s.names.reserve(base_name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let (a_decl, a_val) = synthesize(b, &mut s.stream, "a", value);
    let (g_decl, g_val) = synthesize(b, &mut s.stream, "a_grad", value);

    out += &a_decl;
    if let Some(t) = a_val.tensor() {
        out += &verify(b, "a", t);
    }
    out += &g_decl;
    if let Some(t) = g_val.tensor() {
        out += &verify(b, "a_grad", t);
    }

    out += &b.invoke_optimizer("result", target_ctor, "a", "a_grad");

    let mut parameters = Parameters::new();
    parameters.insert("a", a_val.as_tensor());
    let mut gradients = Parameters::new();
    gradients.insert("a", g_val.as_tensor());
    let result = make().apply(&gradients, &parameters);

    out += &verify(b, &b.keyed("result", "a"), &result["a"]);
    out += &b.case_close();
    out
}

/// Emitter 8: layer application.
///
/// Layer construction happens after input synthesis, so parameter
/// initialization consumes the stream in the same position on both sides;
/// the output is optionally subset before verification.
pub fn layer_case(
    s: &mut Session,
    b: &dyn Render,
    base_name: &str,
    variant: &LayerVariant,
    subset: Subset,
    value: &ArgSpec,
) -> String {
    let name = s.names.reserve(base_name);
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);

    let (decl, input_val) = synthesize(b, &mut s.stream, "a", value);
    out += &decl;
    if let Some(t) = input_val.tensor() {
        out += &verify(b, "a", t);
    }

    out += &b.invoke_layer("result", variant.target_ctor, "a", subset);

    let layer = (variant.make)(&mut s.stream);
    let output = layer.forward(&mut s.stream, &input_val.as_tensor());
    let output = match subset {
        Subset::Full => output,
        Subset::Column => output.index_last(0),
        Subset::Element => output.index_prefix(&[0, 0]),
    };
    out += &verify(b, "result", &output);
    out += &b.case_close();
    out
}
