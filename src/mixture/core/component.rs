//! Mixture components and their flat optimizer layout.
//!
//! A fitted Gaussian sum is carried in two forms:
//! - a flat `Array1<f64>` (the optimizer's θ), laid out per component as
//!   `(A, μ, σ)` in 1-D or `(A, μ_A, σ_A, μ_B, σ_B)` in 2-D;
//! - a `Vec<MixtureComponent>`, the typed view used everywhere else.
use crate::mixture::errors::{MixtureError, MixtureResult};
use ndarray::Array1;
use std::str::FromStr;

/// Dimensionality of the state model.
///
/// - `OneD`: a single observable (e.g. FRET ratio).
/// - `TwoD`: two observables (donor and acceptor intensity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    OneD,
    TwoD,
}

impl Mode {
    /// Number of flat parameters per component (3 or 5).
    pub const fn arity(self) -> usize {
        match self {
            Mode::OneD => 3,
            Mode::TwoD => 5,
        }
    }

    /// Number of observation axes (1 or 2).
    pub const fn dims(self) -> usize {
        match self {
            Mode::OneD => 1,
            Mode::TwoD => 2,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Accepts `"1d"`/`"oned"` and `"2d"`/`"twod"`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" | "oned" => Ok(Mode::OneD),
            "2d" | "twod" => Ok(Mode::TwoD),
            _ => Err(format!("unknown mode '{s}': expected '1d' or '2d'")),
        }
    }
}

/// One Gaussian term of a fitted mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixtureComponent {
    OneD { amplitude: f64, mean: f64, std: f64 },
    TwoD { amplitude: f64, mean_a: f64, std_a: f64, mean_b: f64, std_b: f64 },
}

impl MixtureComponent {
    pub fn mode(&self) -> Mode {
        match self {
            MixtureComponent::OneD { .. } => Mode::OneD,
            MixtureComponent::TwoD { .. } => Mode::TwoD,
        }
    }

    /// Build a component from exactly `mode.arity()` flat values.
    ///
    /// # Errors
    /// [`MixtureError::MalformedParameters`] on a length mismatch.
    pub fn from_slice(mode: Mode, values: &[f64]) -> MixtureResult<Self> {
        if values.len() != mode.arity() {
            return Err(MixtureError::MalformedParameters {
                len: values.len(),
                arity: mode.arity(),
            });
        }
        Ok(match mode {
            Mode::OneD => {
                MixtureComponent::OneD { amplitude: values[0], mean: values[1], std: values[2] }
            }
            Mode::TwoD => MixtureComponent::TwoD {
                amplitude: values[0],
                mean_a: values[1],
                std_a: values[2],
                mean_b: values[3],
                std_b: values[4],
            },
        })
    }

    /// Append this component's flat values to `out`.
    pub fn extend_flat(&self, out: &mut Vec<f64>) {
        match *self {
            MixtureComponent::OneD { amplitude, mean, std } => {
                out.extend_from_slice(&[amplitude, mean, std])
            }
            MixtureComponent::TwoD { amplitude, mean_a, std_a, mean_b, std_b } => {
                out.extend_from_slice(&[amplitude, mean_a, std_a, mean_b, std_b])
            }
        }
    }

    pub fn amplitude(&self) -> f64 {
        match *self {
            MixtureComponent::OneD { amplitude, .. } | MixtureComponent::TwoD { amplitude, .. } => {
                amplitude
            }
        }
    }

    /// Means per axis, length `mode().dims()`.
    pub fn means(&self) -> Vec<f64> {
        match *self {
            MixtureComponent::OneD { mean, .. } => vec![mean],
            MixtureComponent::TwoD { mean_a, mean_b, .. } => vec![mean_a, mean_b],
        }
    }

    /// Standard deviations per axis, length `mode().dims()`.
    pub fn stds(&self) -> Vec<f64> {
        match *self {
            MixtureComponent::OneD { std, .. } => vec![std],
            MixtureComponent::TwoD { std_a, std_b, .. } => vec![std_a, std_b],
        }
    }

    /// Relative population weight: `A·|σ|` (1-D) or `A·|σ_A|·|σ_B|` (2-D).
    ///
    /// Proportional to the integrated area of the unnormalized Gaussian.
    /// Widths enter the model only as `σ²`, so their sign is dropped; the
    /// amplitude keeps its sign.
    pub fn weight(&self) -> f64 {
        match *self {
            MixtureComponent::OneD { amplitude, std, .. } => amplitude * std.abs(),
            MixtureComponent::TwoD { amplitude, std_a, std_b, .. } => {
                amplitude * std_a.abs() * std_b.abs()
            }
        }
    }
}

/// Concatenate components into the flat optimizer layout.
pub fn flatten_components(components: &[MixtureComponent]) -> Array1<f64> {
    let mut flat = Vec::with_capacity(components.iter().map(|c| c.mode().arity()).sum());
    for c in components {
        c.extend_flat(&mut flat);
    }
    Array1::from(flat)
}
