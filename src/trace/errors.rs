//! Errors for trace construction and trace-aligned views.
use crate::trace::Channel;
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for trace operations that may produce [`TraceError`].
pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    // ---- Construction ----
    /// A series differs in length from the time axis.
    LengthMismatch { series: &'static str, expected: usize, actual: usize },

    /// A sample is NaN/±inf.
    NonFiniteValue { series: &'static str, index: usize, value: f64 },

    /// An intensity sample is negative.
    NegativeIntensity { channel: Channel, index: usize, value: f64 },

    /// `time[index]` does not exceed `time[index - 1]`.
    NonMonotonicTime { index: usize },

    // ---- Views ----
    /// The requested channel was not recorded, or the model has no mean
    /// for it.
    MissingChannel { channel: Channel },

    /// Decoded path length differs from the number of samples.
    PathLengthMismatch { expected: usize, actual: usize },

    /// A decoded state has no row in the model.
    OutOfRangeState { index: usize, state: usize, n_states: usize },
}

impl std::error::Error for TraceError {}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::LengthMismatch { series, expected, actual } => {
                write!(f, "Series '{series}' has {actual} samples, expected {expected}")
            }
            TraceError::NonFiniteValue { series, index, value } => {
                write!(f, "Non-finite value in '{series}' at index {index}: {value}")
            }
            TraceError::NegativeIntensity { channel, index, value } => {
                write!(f, "Negative intensity in '{}' at index {index}: {value}", channel.name())
            }
            TraceError::NonMonotonicTime { index } => {
                write!(f, "Time axis is not strictly increasing at index {index}")
            }
            TraceError::MissingChannel { channel } => {
                write!(f, "Channel '{}' is not available", channel.name())
            }
            TraceError::PathLengthMismatch { expected, actual } => {
                write!(f, "Decoded path has {actual} states, expected {expected}")
            }
            TraceError::OutOfRangeState { index, state, n_states } => write!(
                f,
                "Decoded state {state} at index {index} is outside a {n_states}-state model"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<TraceError> for PyErr {
    fn from(err: TraceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
