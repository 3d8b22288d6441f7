//! Cotejar: deterministic cross-implementation conformance suite generation.
//!
//! Cotejar expands a catalogue of numeric array operations, optimizer update
//! rules and neural-network layer transforms into paired executable test
//! cases: each case constructs identical seeded random inputs, evaluates the
//! operation on the in-tree reference engine, and asserts that a target
//! implementation reproduces the outputs within a 2% tolerance of each
//! reduction statistic.
//!
//! # Quick Start
//!
//! ```
//! use cotejar::suite::{RustBackend, Session};
//!
//! let mut out = Vec::new();
//! let summary = Session::new()
//!     .generate(&RustBackend::default(), &mut out)
//!     .expect("catalogue is consistent");
//!
//! // Same seed, same catalogue: byte-identical output.
//! let mut again = Vec::new();
//! Session::new().generate(&RustBackend::default(), &mut again).unwrap();
//! assert_eq!(out, again);
//! assert!(summary.total() > 250);
//! ```
//!
//! # Modules
//!
//! - [`tensor`]: The reference engine — dense tensors, elementwise and
//!   reduction operations, the FFT family, seedable random synthesis
//! - [`nn`]: Layer transforms exercised by the layer catalogue
//! - [`optim`]: Single-step optimizer update rules
//! - [`suite`]: The generation engine — seeds, argument synthesis, the
//!   operation catalogue, case emitters, rendering backends
//! - [`error`]: Error type and `Result` alias

pub mod error;
pub mod nn;
pub mod optim;
pub mod prelude;
pub mod suite;
pub mod tensor;
