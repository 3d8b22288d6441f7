//! Layer transforms exercised by the layer catalogue.
//!
//! The module is organized around the [`Module`] trait. Unlike a training
//! framework, layers here exist to be applied exactly once to a synthesized
//! input: constructors that initialize parameters draw them from the
//! engine's seeded stream, and `forward` takes the same stream so dropout
//! masks consume the sub-stream the rendered case pins down.

mod activation;
mod conv;
mod dropout;
mod embedding;
mod linear;
mod normalization;
mod positional;

pub use activation::{
    Celu, Gelu, Glu, HardSwish, LeakyRelu, LogSigmoid, LogSoftmax, Mish, PRelu, Relu, Relu6, Selu,
    Sigmoid, Silu, Softmax, Softplus, Softsign, Step, Tanh,
};
pub use conv::{Conv1d, Conv2d};
pub use dropout::{Dropout, Dropout2d, Dropout3d};
pub use embedding::Embedding;
pub use linear::Linear;
pub use normalization::{BatchNorm, GroupNorm, InstanceNorm, LayerNorm, RmsNorm};
pub use positional::{Rope, SinusoidalPositionalEncoding};

use crate::tensor::{RandomStream, Tensor};

/// Interface for all layer transforms.
pub trait Module {
    /// Apply the layer to `input`.
    ///
    /// Layers with stochastic behavior (the dropout family) draw their masks
    /// from `rng`; all others ignore it.
    fn forward(&self, rng: &mut RandomStream, input: &Tensor) -> Tensor;
}
