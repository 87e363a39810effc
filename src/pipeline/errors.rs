//! Errors for the end-to-end analysis pipeline.
//!
//! [`PipelineError`] wraps the layer errors it composes so `?` works across
//! fitting, segmentation, and trace views, and adds the failures that only
//! exist at this level (decoder errors, inconsistent decoded paths).
use crate::{dwell::DwellError, mixture::MixtureError, trace::TraceError};
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for pipeline operations that may produce [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    // ---- Wrapped layers ----
    Mixture(MixtureError),
    Dwell(DwellError),
    Trace(TraceError),

    // ---- Decoding ----
    /// The external decoder reported a failure.
    DecoderFailed { reason: String },

    /// Decoded path length differs from the observation count.
    PathLengthMismatch { expected: usize, actual: usize },

    // ---- Model shape ----
    /// HMM parameters have no states.
    EmptyModel,

    /// HMM emission dimensionality is neither 1 nor 2.
    UnsupportedDims { dims: usize },
}

impl std::error::Error for PipelineError {}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Mixture(err) => write!(f, "{err}"),
            PipelineError::Dwell(err) => write!(f, "{err}"),
            PipelineError::Trace(err) => write!(f, "{err}"),
            PipelineError::DecoderFailed { reason } => write!(f, "State decoding failed: {reason}"),
            PipelineError::PathLengthMismatch { expected, actual } => {
                write!(f, "Decoder returned {actual} states for {expected} observations")
            }
            PipelineError::EmptyModel => write!(f, "HMM parameters contain no states"),
            PipelineError::UnsupportedDims { dims } => {
                write!(f, "Unsupported emission dimensionality {dims}: expected 1 or 2")
            }
        }
    }
}

impl From<MixtureError> for PipelineError {
    fn from(err: MixtureError) -> PipelineError {
        PipelineError::Mixture(err)
    }
}

impl From<DwellError> for PipelineError {
    fn from(err: DwellError) -> PipelineError {
        PipelineError::Dwell(err)
    }
}

impl From<TraceError> for PipelineError {
    fn from(err: TraceError) -> PipelineError {
        PipelineError::Trace(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<PipelineError> for PyErr {
    fn from(err: PipelineError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
