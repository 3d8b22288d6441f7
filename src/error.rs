//! Error types for suite generation.
//!
//! Generation has no recoverable-error taxonomy: a malformed catalogue entry
//! is a programming defect and aborts the run, because a half-emitted suite
//! is not a valid suite.

use std::fmt;

/// Main error type for cotejar operations.
///
/// # Examples
///
/// ```
/// use cotejar::error::CotejarError;
///
/// let err = CotejarError::catalogue("all", "axis variant requested but no axis evaluator");
/// assert!(err.to_string().contains("catalogue"));
/// ```
#[derive(Debug)]
pub enum CotejarError {
    /// A catalogue entry is internally inconsistent (e.g. requests an axis
    /// variant without providing an axis-capable evaluator).
    Catalogue {
        /// Base name of the offending entry
        entry: String,
        /// What is inconsistent about it
        reason: String,
    },

    /// Writing the rendered suite to the output stream failed.
    Io(std::io::Error),
}

impl CotejarError {
    /// Convenience constructor for catalogue-inconsistency errors.
    pub fn catalogue(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        CotejarError::Catalogue {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CotejarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CotejarError::Catalogue { entry, reason } => {
                write!(f, "inconsistent catalogue entry `{entry}`: {reason}")
            }
            CotejarError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CotejarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CotejarError::Io(e) => Some(e),
            CotejarError::Catalogue { .. } => None,
        }
    }
}

impl From<std::io::Error> for CotejarError {
    fn from(e: std::io::Error) -> Self {
        CotejarError::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CotejarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_display() {
        let err = CotejarError::catalogue("sum", "missing axes evaluator");
        let msg = err.to_string();
        assert!(msg.contains("sum"));
        assert!(msg.contains("missing axes evaluator"));
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = CotejarError::from(io_err);
        assert!(err.source().is_some());
    }
}
