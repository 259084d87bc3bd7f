use std::{
    error::Error as StdError,
    fmt::{self, Display},
};

use crate::train::diagnostic::Diagnostic;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a training run.
///
/// `InvalidConfig` is raised before any epoch starts, `ShapeMismatch` per
/// batch or per matrix operation. Failures coming out of a `Model`,
/// `LossFunction` or `Optimizer` are returned by the loop exactly as the
/// collaborator produced them, inside a `RunError` that also carries the
/// records produced so far.
#[derive(Debug)]
pub enum Error {
    /// A hyperparameter or constructor argument is out of range.
    InvalidConfig(String),
    /// Two things that must agree in size do not.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A class-index label is negative, fractional or not below the number
    /// of classes.
    InvalidLabel { row: usize, label: f64, classes: usize },
    /// A layer was asked for gradients without a cached forward pass.
    BackwardBeforeForward { layer: usize },
    /// A failure raised by a user-supplied collaborator.
    External(Box<dyn StdError + Send + Sync>),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    pub fn shape(what: &'static str, expected: usize, got: usize) -> Self {
        Error::ShapeMismatch {
            what,
            expected,
            got,
        }
    }

    /// Wraps an arbitrary collaborator failure.
    pub fn external<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error::External(err.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::ShapeMismatch {
                what,
                expected,
                got,
            } => write!(f, "shape mismatch in {what}: expected {expected}, got {got}"),
            Error::InvalidLabel { row, label, classes } => {
                write!(f, "label {label} at row {row} is not a class index below {classes}")
            }
            Error::BackwardBeforeForward { layer } => {
                write!(f, "layer {layer} has no cached forward pass to differentiate")
            }
            Error::External(e) => write!(f, "collaborator failed: {e}"),
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::External(e) => Some(e.as_ref()),
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// A failed training run together with the records it produced before
/// failing.
///
/// Records emitted for completed steps stay valid after a later failure, so
/// they are handed back alongside the cause instead of being dropped.
#[derive(Debug)]
pub struct RunError {
    pub diagnostics: Vec<Diagnostic>,
    pub source: Error,
}

impl RunError {
    pub fn new(diagnostics: Vec<Diagnostic>, source: Error) -> Self {
        RunError { diagnostics, source }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "training stopped after {} diagnostic records: {}",
            self.diagnostics.len(),
            self.source
        )
    }
}

impl StdError for RunError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

impl From<RunError> for Error {
    fn from(e: RunError) -> Self {
        e.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shape_mismatch() {
        let err = Error::shape("batch labels", 10, 9);
        assert_eq!(
            err.to_string(),
            "shape mismatch in batch labels: expected 10, got 9"
        );
    }

    #[test]
    fn test_external_keeps_source() {
        let err = Error::external("optimizer exploded");
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "collaborator failed: optimizer exploded");
    }

    #[test]
    fn test_run_error_keeps_records_and_cause() {
        let record = Diagnostic { epoch: 1, step: 2, average_loss: 0.5 };
        let err = RunError::new(vec![record], Error::shape("batch labels", 2, 1));
        assert_eq!(
            err.to_string(),
            "training stopped after 1 diagnostic records: shape mismatch in batch labels: expected 2, got 1"
        );
        assert!(StdError::source(&err).is_some());
        assert!(matches!(Error::from(err), Error::ShapeMismatch { expected: 2, got: 1, .. }));
    }
}
