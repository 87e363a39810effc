//! Errors for state-path segmentation and dwell-time statistics.
//!
//! ## Conventions
//! - State labels are 0-based; `max` is the largest admissible label.
//! - `trace` indexes into the caller's batch, in input order.
//! - Optimizer failures in the decay fit are normalized to
//!   [`DwellError::DecayFitFailed`] with a human-readable reason.
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for dwell-time operations that may produce [`DwellError`].
pub type DwellResult<T> = Result<T, DwellError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DwellError {
    // ---- Segmentation ----
    /// A path label exceeds the admissible maximum.
    OutOfRangeState { index: usize, state: usize, max: usize },

    // ---- Aggregation ----
    /// Per-state run counts differ between traces under strict aggregation.
    LengthMismatch { state: usize, trace: usize, expected: usize, actual: usize },

    /// No traces were supplied.
    EmptyBatch,

    /// Traces track different numbers of states.
    StateCountMismatch { trace: usize, expected: usize, actual: usize },

    // ---- Kinetics ----
    /// Summary or decay fit requested for an empty lifetime list.
    EmptyLifetimes,

    /// The exponential decay fit failed or did not converge.
    DecayFitFailed { reason: String },
}

impl std::error::Error for DwellError {}

impl std::fmt::Display for DwellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DwellError::OutOfRangeState { index, state, max } => {
                write!(f, "State {state} at index {index} exceeds the maximum state {max}")
            }
            DwellError::LengthMismatch { state, trace, expected, actual } => write!(
                f,
                "Trace {trace} has {actual} runs for state {state}, expected {expected}"
            ),
            DwellError::EmptyBatch => write!(f, "No traces supplied for aggregation"),
            DwellError::StateCountMismatch { trace, expected, actual } => write!(
                f,
                "Trace {trace} tracks {actual} states, expected {expected}"
            ),
            DwellError::EmptyLifetimes => write!(f, "No dwell events supplied"),
            DwellError::DecayFitFailed { reason } => {
                write!(f, "Dwell-time decay fit failed: {reason}")
            }
        }
    }
}

impl From<OptError> for DwellError {
    fn from(err: OptError) -> DwellError {
        DwellError::DecayFitFailed { reason: err.to_string() }
    }
}

impl From<DwellError> for OptError {
    fn from(err: DwellError) -> OptError {
        OptError::InvalidProblem { reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<DwellError> for PyErr {
    fn from(err: DwellError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
