//! Catalogue expansion and suite assembly.
//!
//! Sections run in a fixed order; within each section, entries expand into
//! the cross-product of their applicable variants. Cases are streamed to the
//! writer as they are rendered — no in-memory suite document is kept.

use std::io::Write;

use super::args::{synthesize, ArgSpec};
use super::catalog::{
    ADAFACTOR_VECTOR_VALUE, ARITHMETIC_OPS, AXES_ARG, AXES_SHAPE, AXIS_ARG, BINARY_FUNCTIONS,
    COMPARISON_OPS, FFT_FUNCTIONS, LAYERS, OPTIMIZERS, POW_OP, POW_OPERAND, UNARY_FUNCTIONS,
};
use super::emit;
use super::render::{Qualifier, Render};
use super::verify::verify;
use super::{Session, Summary};
use crate::error::Result;
use crate::tensor::ops;

/// Shape of the quantization case's weight operand.
const QUANTIZE_SHAPE: [usize; 2] = [32, 256];
const QUANTIZE_GROUP_SIZE: usize = 64;
const QUANTIZE_BITS: u32 = 8;

/// Accuracy of the seed sanity case's single scalar assertion.
const SEED_SANITY_ACCURACY: f32 = 0.001;

pub(super) fn run(s: &mut Session, b: &dyn Render, out: &mut dyn Write) -> Result<Summary> {
    let mut summary = Summary::default();
    write!(out, "{}", b.suite_open())?;

    write_case(out, &seed_sanity_case(s, b))?;
    summary.adhoc_cases += 1;

    operator_section(s, b, out, &mut summary)?;
    unary_section(s, b, out, &mut summary)?;
    binary_section(s, b, out, &mut summary)?;

    write_case(out, &quantize_case(s, b))?;
    summary.adhoc_cases += 1;

    fft_section(s, b, out, &mut summary)?;
    optimizer_section(s, b, out, &mut summary)?;
    layer_section(s, b, out, &mut summary)?;

    write!(out, "{}", b.suite_close())?;
    Ok(summary)
}

fn write_case(out: &mut dyn Write, case: &str) -> Result<()> {
    writeln!(out, "{case}")?;
    Ok(())
}

/// One scalar draw asserted tightly: validates that the target stream agrees
/// with the reference stream at all before any operation is exercised.
fn seed_sanity_case(s: &mut Session, b: &dyn Render) -> String {
    let name = s.names.reserve("random_seed");
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);
    let (decl, value) = synthesize(b, &mut s.stream, "r", &ArgSpec::ScalarNormal);
    out += &decl;
    let scalar = match value {
        crate::tensor::Value::Scalar(v) => v,
        crate::tensor::Value::Tensor(t) => t.item(),
    };
    out += &b.assert_scalar("r", scalar, SEED_SANITY_ACCURACY);
    out += &b.case_close();
    out
}

/// Quantization of one uniform weight; the quantized values, scales and
/// biases each get a full verification block.
fn quantize_case(s: &mut Session, b: &dyn Render) -> String {
    let name = s.names.reserve("quantize");
    let seed = s.seeds.next_seed();
    let mut out = b.case_open(&name);
    out += &b.seed_pin(seed);
    s.stream.reseed(seed);
    let (decl, value) = synthesize(b, &mut s.stream, "w", &ArgSpec::UniformShape(&QUANTIZE_SHAPE));
    out += &decl;
    out += &b.invoke_quantize(
        ("wq", "scales", "biases"),
        "w",
        QUANTIZE_GROUP_SIZE,
        QUANTIZE_BITS,
    );
    let (q, scales, biases) =
        ops::quantize(&value.as_tensor(), QUANTIZE_GROUP_SIZE, QUANTIZE_BITS);
    out += &verify(b, "wq", &q);
    out += &verify(b, "scales", &scales);
    out += &verify(b, "biases", &biases);
    out += &b.case_close();
    out
}

fn operator_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    // Arithmetic: both operands array, then each side as a fixed scalar.
    let shapes = [
        (ArgSpec::DefaultNormal, ArgSpec::DefaultNormal),
        (ArgSpec::Literal(0.5), ArgSpec::DefaultNormal),
        (ArgSpec::DefaultNormal, ArgSpec::Literal(1.3)),
    ];
    for entry in ARITHMETIC_OPS {
        for (lhs, rhs) in &shapes {
            write_case(out, &emit::operator_case(s, b, entry, lhs, rhs))?;
            summary.operator_cases += 1;
        }
    }

    write_case(
        out,
        &emit::operator_case(s, b, &POW_OP, &POW_OPERAND, &POW_OPERAND),
    )?;
    write_case(
        out,
        &emit::operator_case(s, b, &POW_OP, &POW_OPERAND, &ArgSpec::Literal(1.3)),
    )?;
    summary.operator_cases += 2;

    for entry in COMPARISON_OPS {
        write_case(
            out,
            &emit::operator_case(s, b, entry, &ArgSpec::DefaultNormal, &ArgSpec::DefaultNormal),
        )?;
        write_case(
            out,
            &emit::operator_case(s, b, entry, &ArgSpec::DefaultNormal, &ArgSpec::Literal(1.3)),
        )?;
        summary.operator_cases += 2;
    }
    Ok(())
}

fn unary_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    for entry in UNARY_FUNCTIONS {
        let operand = entry.operand.unwrap_or(ArgSpec::DefaultNormal);

        if !entry.no_bare {
            if !entry.free_only {
                write_case(
                    out,
                    &emit::unary_method_case(s, b, entry, &Qualifier::Bare, &operand)?,
                )?;
                summary.unary_cases += 1;
            }
            write_case(
                out,
                &emit::unary_free_case(s, b, entry, &Qualifier::Bare, &operand)?,
            )?;
            summary.unary_cases += 1;
        }

        if entry.axis {
            let qualifier = Qualifier::Axis(AXIS_ARG);
            if !entry.free_only {
                write_case(out, &emit::unary_method_case(s, b, entry, &qualifier, &operand)?)?;
                summary.unary_cases += 1;
            }
            write_case(out, &emit::unary_free_case(s, b, entry, &qualifier, &operand)?)?;
            summary.unary_cases += 1;
        }

        if entry.axes {
            // Axes variants run on an enlarged four-dimensional input.
            let wide = ArgSpec::UniformShape(&AXES_SHAPE);
            let qualifier = Qualifier::Axes(&AXES_ARG);
            if !entry.free_only {
                write_case(out, &emit::unary_method_case(s, b, entry, &qualifier, &wide)?)?;
                summary.unary_cases += 1;
            }
            write_case(out, &emit::unary_free_case(s, b, entry, &qualifier, &wide)?)?;
            summary.unary_cases += 1;
        }
    }
    Ok(())
}

fn binary_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    for entry in BINARY_FUNCTIONS {
        if !entry.free_only {
            write_case(out, &emit::binary_method_case(s, b, entry))?;
            summary.binary_cases += 1;
        }
        write_case(out, &emit::binary_free_case(s, b, entry))?;
        summary.binary_cases += 1;
    }
    Ok(())
}

fn fft_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    for entry in FFT_FUNCTIONS {
        write_case(
            out,
            &emit::fft_case(s, b, entry, &super::catalog::FftSpec::none()),
        )?;
        summary.fft_cases += 1;
        for spec in entry.variants {
            write_case(out, &emit::fft_case(s, b, entry, spec))?;
            summary.fft_cases += 1;
        }
    }
    Ok(())
}

fn optimizer_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    for entry in OPTIMIZERS {
        write_case(
            out,
            &emit::optimizer_case(
                s,
                b,
                entry.name,
                entry.target_ctor,
                entry.make,
                &ArgSpec::DefaultNormal,
            ),
        )?;
        summary.optimizer_cases += 1;
        for variant in entry.variants {
            let ctor = format!("{}{}", entry.target_ctor, variant.target_extra);
            write_case(
                out,
                &emit::optimizer_case(s, b, entry.name, &ctor, variant.make, &ArgSpec::DefaultNormal),
            )?;
            summary.optimizer_cases += 1;
        }
    }

    // Adafactor switches to a non-factored accumulator for vectors.
    let adafactor = OPTIMIZERS
        .iter()
        .find(|e| e.name == "adafactor")
        .expect("adafactor entry present");
    write_case(
        out,
        &emit::optimizer_case(
            s,
            b,
            adafactor.name,
            adafactor.target_ctor,
            adafactor.make,
            &ADAFACTOR_VECTOR_VALUE,
        ),
    )?;
    summary.optimizer_cases += 1;
    Ok(())
}

fn layer_section(
    s: &mut Session,
    b: &dyn Render,
    out: &mut dyn Write,
    summary: &mut Summary,
) -> Result<()> {
    for entry in LAYERS {
        let value = entry
            .value
            .unwrap_or(ArgSpec::UniformShape(&super::catalog::LAYER_SHAPE));
        if let Some(bare) = &entry.bare {
            write_case(
                out,
                &emit::layer_case(s, b, entry.name, bare, entry.subset, &value),
            )?;
            summary.layer_cases += 1;
        }
        for variant in entry.variants {
            write_case(
                out,
                &emit::layer_case(s, b, entry.name, variant, entry.subset, &value),
            )?;
            summary.layer_cases += 1;
        }
    }
    Ok(())
}
