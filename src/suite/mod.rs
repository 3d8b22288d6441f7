//! The generation engine.
//!
//! A [`Session`] owns all run-long state — the per-case seed stream, the
//! engine's random stream, and the name registry — so multiple suites can be
//! generated independently and in isolation. Generation is a one-shot,
//! single-threaded batch pass: catalogue entry → variant expansion → case
//! emission → text, streamed straight to the output writer.
//!
//! ```
//! use cotejar::suite::{RustBackend, Session};
//!
//! let mut out = Vec::new();
//! let summary = Session::new()
//!     .generate(&RustBackend::default(), &mut out)
//!     .expect("catalogue is consistent");
//! assert!(summary.total() > 250);
//! ```

pub mod args;
pub mod catalog;
mod driver;
pub mod emit;
pub mod names;
pub mod render;
pub mod seeds;
pub mod verify;

pub use render::{OpSpelling, Qualifier, Render, RustBackend, Subset};

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::tensor::RandomStream;
use self::names::NameRegistry;
use self::seeds::SeedStream;

/// Master seed of the default session; every byte of output is a pure
/// function of this value and the catalogue.
pub const DEFAULT_MASTER_SEED: u64 = 0;

/// Case counts per catalogue section for one generation run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Summary {
    pub adhoc_cases: usize,
    pub operator_cases: usize,
    pub unary_cases: usize,
    pub binary_cases: usize,
    pub fft_cases: usize,
    pub optimizer_cases: usize,
    pub layer_cases: usize,
}

impl Summary {
    /// Total number of emitted cases.
    #[must_use]
    pub fn total(&self) -> usize {
        self.adhoc_cases
            + self.operator_cases
            + self.unary_cases
            + self.binary_cases
            + self.fft_cases
            + self.optimizer_cases
            + self.layer_cases
    }
}

/// One generation run's state: seed supply, engine stream, name registry.
pub struct Session {
    pub(crate) seeds: SeedStream,
    pub(crate) stream: RandomStream,
    pub(crate) names: NameRegistry,
}

impl Session {
    /// A session with the fixed default master seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_master_seed(DEFAULT_MASTER_SEED)
    }

    /// A session with an explicit master seed (useful for testing the
    /// generator itself).
    #[must_use]
    pub fn with_master_seed(master_seed: u64) -> Self {
        Self {
            seeds: SeedStream::new(master_seed),
            stream: RandomStream::new(master_seed),
            names: NameRegistry::new(),
        }
    }

    /// Expand the whole catalogue through `backend` into `out`.
    ///
    /// # Errors
    ///
    /// Fails on an internally inconsistent catalogue entry or a writer
    /// error; there is no partial-output recovery.
    pub fn generate(&mut self, backend: &dyn Render, out: &mut dyn Write) -> Result<Summary> {
        driver::run(self, backend, out)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests_suite_contract.rs"]
mod contract_tests;
