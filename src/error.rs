//! Error taxonomy.
//!
//! Configuration problems (bad scalars, mismatched array shapes) are
//! reported before any work starts. Failures inside the evolutionary loop
//! are reported as [`LithoError::OptimizationFailure`] and abort the run.
//!
//! Numerical degeneracy in the simulator (NaN/Inf intensities, an
//! all-zero image) is never an error: it is sanitized in place.

use thiserror::Error;

/// Errors produced by the simulator and optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LithoError {
    /// A scalar parameter is non-finite or outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// A required key was absent from a parameter mapping.
    #[error("missing parameter `{name}`")]
    MissingParameter { name: &'static str },

    /// A parameter mapping contained a key that is not recognized.
    #[error("unknown parameter `{name}`")]
    UnknownParameter { name: String },

    /// An array does not have the square shape implied by `image_size`.
    #[error("shape mismatch for {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A generation step failed; the run produced no usable result.
    #[error("optimization failed at generation {generation}: {reason}")]
    OptimizationFailure { generation: usize, reason: String },
}

impl LithoError {
    /// Returns `true` for errors caused by invalid inputs rather than by
    /// the optimization itself.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, LithoError::OptimizationFailure { .. })
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LithoError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LithoError>;
