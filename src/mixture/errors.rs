//! Errors for Gaussian-mixture state discovery (parameter layout, data
//! validation, fitting, degeneracy expansion and HMM seeding).
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Optimizer/backend errors are normalized to
//!   [`MixtureError::FitFailure`] with a human-readable reason.
//! - With the `python-bindings` feature, every variant converts to a Python
//!   `ValueError`.
use crate::mixture::core::component::Mode;
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for mixture operations that may produce [`MixtureError`].
pub type MixtureResult<T> = Result<T, MixtureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MixtureError {
    // ---- Parameter layout ----
    /// Flat parameter length is not a multiple of the per-component arity.
    MalformedParameters { len: usize, arity: usize },

    /// A component, coordinate set or state does not match the requested mode.
    ModeMismatch { expected: Mode, found: Mode },

    // ---- Data validation ----
    /// No observations were supplied.
    EmptyData,

    /// Coordinate and value arrays differ in length.
    DataLengthMismatch { coords: usize, values: usize },

    /// An observation or coordinate is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Histogram bin count must be positive.
    InvalidBins { bins: usize },

    /// Histogram range must be finite with `lo < hi`.
    InvalidRange { lo: f64, hi: f64 },

    // ---- Fitting ----
    /// The optimizer failed or did not converge.
    FitFailure { reason: String },

    // ---- Degeneracy / HMM seeding ----
    /// Degeneracy vector length differs from the number of fitted components.
    DegeneracyMismatch { components: usize, degeneracy: usize },

    /// Fewer than two HMM states after expansion.
    InsufficientStates { n: usize },

    /// A start-probability weight is negative or non-finite.
    InvalidWeight { state: usize, value: f64 },

    /// Every start-probability weight is zero.
    DegenerateInitialization,

    /// Self-transition probability must lie in `[0, 1]`.
    InvalidSelfTransition { value: f64 },
}

impl std::error::Error for MixtureError {}

impl std::fmt::Display for MixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameter layout ----
            MixtureError::MalformedParameters { len, arity } => {
                write!(f, "Parameter length {len} is not a multiple of the component arity {arity}")
            }
            MixtureError::ModeMismatch { expected, found } => {
                write!(f, "Mode mismatch: expected {expected:?}, found {found:?}")
            }
            // ---- Data validation ----
            MixtureError::EmptyData => write!(f, "No observations supplied"),
            MixtureError::DataLengthMismatch { coords, values } => {
                write!(f, "Coordinate count {coords} does not match value count {values}")
            }
            MixtureError::NonFiniteData { index, value } => {
                write!(f, "Non-finite observation at index {index}: {value}")
            }
            MixtureError::InvalidBins { bins } => {
                write!(f, "Invalid bin count {bins}: must be greater than zero")
            }
            MixtureError::InvalidRange { lo, hi } => {
                write!(f, "Invalid histogram range [{lo}, {hi}]: must be finite with lo < hi")
            }
            // ---- Fitting ----
            MixtureError::FitFailure { reason } => write!(f, "Mixture fit failed: {reason}"),
            // ---- Degeneracy / HMM seeding ----
            MixtureError::DegeneracyMismatch { components, degeneracy } => {
                write!(
                    f,
                    "Degeneracy vector has {degeneracy} entries but {components} components were fitted"
                )
            }
            MixtureError::InsufficientStates { n } => {
                write!(f, "An HMM needs at least 2 states, got {n}")
            }
            MixtureError::InvalidWeight { state, value } => {
                write!(f, "Invalid start weight for state {state}: {value}")
            }
            MixtureError::DegenerateInitialization => {
                write!(f, "All start-probability weights are zero")
            }
            MixtureError::InvalidSelfTransition { value } => {
                write!(f, "Invalid self-transition probability {value}: must be in [0, 1]")
            }
        }
    }
}

impl From<OptError> for MixtureError {
    fn from(err: OptError) -> MixtureError {
        MixtureError::FitFailure { reason: err.to_string() }
    }
}

/// Model errors raised inside residual evaluation travel through the
/// optimizer as `InvalidProblem`.
impl From<MixtureError> for OptError {
    fn from(err: MixtureError) -> OptError {
        OptError::InvalidProblem { reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<MixtureError> for PyErr {
    fn from(err: MixtureError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
