//! Argument specifications and synthesis.
//!
//! Each operand of a generated case is described by one [`ArgSpec`] variant;
//! synthesis realizes the concrete value from the engine stream and renders
//! its declaration through the backend. The caller re-seeds the stream
//! immediately beforehand, and synthesizes operands in a fixed left-to-right
//! order, so each operand consumes a well-defined sub-stream — the target
//! implementation must replay the same order for the statistics to line up.

use super::render::Render;
use crate::tensor::{RandomStream, Value};

/// Default operand shape for array-valued arguments.
pub const DEFAULT_SHAPE: [usize; 2] = [4, 3];

/// How to synthesize one operand.
#[derive(Debug, Clone, Copy)]
pub enum ArgSpec {
    /// Normally-distributed array of the default shape.
    DefaultNormal,
    /// One normally-distributed scalar.
    ScalarNormal,
    /// Uniform [0, 1) array of the given shape.
    UniformShape(&'static [usize]),
    /// Uniform [low, high) array at the default shape.
    RangedUniform { low: f32, high: f32 },
    /// Integers uniform in [0, 10) at the given shape. Lookup tables sized
    /// downstream must accept indices up to 9.
    RangedInt(&'static [usize]),
    /// A literal scalar, no array semantics.
    Literal(f32),
}

/// Bounds of the [`ArgSpec::RangedInt`] draw.
pub const INT_RANGE: (i32, i32) = (0, 10);

/// Realize `spec` as a declaration snippet plus a concrete value.
pub fn synthesize(
    backend: &dyn Render,
    stream: &mut RandomStream,
    name: &str,
    spec: &ArgSpec,
) -> (String, Value) {
    match *spec {
        ArgSpec::DefaultNormal => (
            backend.declare_normal(name, &DEFAULT_SHAPE),
            Value::Tensor(stream.normal(&DEFAULT_SHAPE)),
        ),
        ArgSpec::ScalarNormal => (
            backend.declare_normal_scalar(name),
            Value::Scalar(stream.normal_scalar()),
        ),
        ArgSpec::UniformShape(shape) => (
            backend.declare_uniform(name, 0.0, 1.0, shape),
            Value::Tensor(stream.uniform(0.0, 1.0, shape)),
        ),
        ArgSpec::RangedUniform { low, high } => (
            backend.declare_uniform(name, low, high, &DEFAULT_SHAPE),
            Value::Tensor(stream.uniform(low, high, &DEFAULT_SHAPE)),
        ),
        ArgSpec::RangedInt(shape) => (
            backend.declare_randint(name, INT_RANGE.0, INT_RANGE.1, shape),
            Value::Tensor(stream.randint(INT_RANGE.0, INT_RANGE.1, shape)),
        ),
        ArgSpec::Literal(value) => (backend.declare_literal(name, value), Value::Scalar(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::render::RustBackend;
    use crate::tensor::Dtype;

    #[test]
    fn test_default_normal_shape() {
        let backend = RustBackend::default();
        let mut stream = RandomStream::new(0);
        let (decl, value) = synthesize(&backend, &mut stream, "a", &ArgSpec::DefaultNormal);
        assert!(decl.contains("a"));
        assert_eq!(value.tensor().unwrap().shape(), [4, 3]);
    }

    #[test]
    fn test_ranged_int_bounds() {
        let backend = RustBackend::default();
        let mut stream = RandomStream::new(1);
        let spec = ArgSpec::RangedInt(&[2, 8, 8, 4]);
        let (_, value) = synthesize(&backend, &mut stream, "a", &spec);
        let t = value.tensor().unwrap();
        assert_eq!(t.shape(), [2, 8, 8, 4]);
        assert_eq!(t.dtype(), Dtype::Int32);
        assert!(t.data().iter().all(|&v| (0.0..10.0).contains(&v)));
    }

    #[test]
    fn test_literal_passes_through() {
        let backend = RustBackend::default();
        let mut stream = RandomStream::new(2);
        let (_, value) = synthesize(&backend, &mut stream, "b", &ArgSpec::Literal(1.3));
        match value {
            Value::Scalar(v) => assert_eq!(v, 1.3),
            Value::Tensor(_) => panic!("literal spec must stay scalar"),
        }
    }

    #[test]
    fn test_synthesis_order_is_deterministic() {
        let backend = RustBackend::default();
        let mut s1 = RandomStream::new(42);
        let mut s2 = RandomStream::new(42);
        let (_, a1) = synthesize(&backend, &mut s1, "a", &ArgSpec::DefaultNormal);
        let (_, b1) = synthesize(&backend, &mut s1, "b", &ArgSpec::DefaultNormal);
        let (_, a2) = synthesize(&backend, &mut s2, "a", &ArgSpec::DefaultNormal);
        let (_, b2) = synthesize(&backend, &mut s2, "b", &ArgSpec::DefaultNormal);
        assert_eq!(a1.tensor().unwrap(), a2.tensor().unwrap());
        assert_eq!(b1.tensor().unwrap(), b2.tensor().unwrap());
    }
}
