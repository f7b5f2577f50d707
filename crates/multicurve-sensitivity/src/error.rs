//! Error types for sensitivity operations.
//!
//! Failures are always reported synchronously by the call that violates the
//! contract. Nothing here is retried or downgraded.

use multicurve_core::CoreError;
use thiserror::Error;

/// Result type for sensitivity operations.
pub type SensitivityResult<T> = Result<T, SensitivityError>;

/// Errors that can occur while building or combining sensitivities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
    /// A required argument is missing or malformed.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// A forward period whose end is not after its start.
    #[error("Forward period end time {end_time} must be after start time {start_time}")]
    InvalidForwardPeriod {
        /// Start of the period.
        start_time: f64,
        /// End of the period.
        end_time: f64,
    },

    /// Two parameter vectors for the same key have different lengths.
    #[error("Sensitivity vector length mismatch for '{name}': expected {expected}, got {got}")]
    LengthMismatch {
        /// The curve (and currency, if any) the vectors belong to.
        name: String,
        /// Length of the stored vector.
        expected: usize,
        /// Length of the vector being added.
        got: usize,
    },

    /// No parameter sensitivity is stored under the requested key.
    #[error("No sensitivity found for '{key}'")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// An FX rate could not be obtained.
    #[error(transparent)]
    Fx(#[from] CoreError),
}

impl SensitivityError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            name: name.into(),
            expected,
            got,
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Returns true for every contract violation by the caller.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::InvalidForwardPeriod { .. }
                | Self::LengthMismatch { .. }
        )
    }
}
