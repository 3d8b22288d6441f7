//! Common imports for suite generation.
//!
//! ```
//! use cotejar::prelude::*;
//!
//! let mut out = Vec::new();
//! Session::new().generate(&RustBackend::default(), &mut out).unwrap();
//! ```

pub use crate::error::{CotejarError, Result};
pub use crate::nn::Module;
pub use crate::optim::{Optimizer, Parameters};
pub use crate::suite::{Render, RustBackend, Session, Summary};
pub use crate::tensor::{ComplexTensor, Dtype, RandomStream, Tensor, Value};
